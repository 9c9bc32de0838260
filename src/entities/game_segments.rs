use crate::models::PrizeKind;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品槽位实体
/// weight 无需归一化, 抽取时按总和归一; NoPrize 槽位即 "谢谢参与"
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_segments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub game_id: i64,
    pub label: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub weight: f64,
    pub color: Option<String>,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// f64 weight 列使得 Model 无法 derive Eq, 与其它实体不同属预期
impl Model {
    pub fn is_winning(&self) -> bool {
        self.prize_kind.is_win()
    }
}

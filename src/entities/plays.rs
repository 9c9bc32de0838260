use crate::models::{PlayResult, PrizeKind};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽奖记录实体
/// 说明:
/// - 每次成功 play 恰好产生一条, 永不修改或删除 (审计轨迹)
/// - prize_* 字段是槽位在抽奖时刻的快照 (槽位后续被改动仍可回溯)
/// - 冷却窗口计数按 (visitor_id, game_id, played_at) 查询
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "plays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub visitor_id: i64,
    pub game_id: i64,
    pub segment_id: i64,
    pub result: PlayResult,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub prize_label: String,
    pub discount_id: Option<i64>,
    pub played_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 按天汇总实体, 键为 (shop_id, game_id 或 NULL = 全局, day)
/// 计数只增不减, 写入走原子 UPDATE ... SET c = c + n
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "analytics_daily")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub game_id: Option<i64>,
    pub day: Date,
    pub views: i64,
    pub plays: i64,
    pub wins: i64,
    pub claims: i64,
    pub redemptions: i64,
    pub revenue_cents: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

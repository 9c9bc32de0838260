use crate::models::VisitorTypeFilter;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 投放规则实体
/// 集合类字段存 JSON 字符串数组, NULL/空数组 = 不限制该维度
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "targeting_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub priority: i32,
    pub is_active: bool,
    pub target_game_id: i64,
    pub page_types: Option<Json>,
    pub devices: Option<Json>,
    pub visitor_type: VisitorTypeFilter,
    pub traffic_sources: Option<Json>,
    pub utm_sources: Option<Json>,
    pub schedule_enabled: bool,
    pub schedule_days: Option<Json>,
    pub start_hour: Option<i16>,
    pub end_hour: Option<i16>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

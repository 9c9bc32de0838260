use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 折扣规则实体
/// game_id 为 NULL 时是店铺默认规则; 每个活动取最新的专属规则, 否则取最新默认
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "discount_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub game_id: Option<i64>,
    pub is_active: bool,
    pub max_plays_per_visitor: i32,
    pub cooldown_hours: i32,
    pub require_email: bool,
    pub validity_days: i32,
    pub max_redemptions: i32,
    pub min_order_cents: Option<i64>,
    pub combines_with_products: bool,
    pub combines_with_shipping: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use crate::models::{DiscountStatus, PrizeKind};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 折扣实体
/// - code 店铺内唯一
/// - external_id 为商城平台侧的折扣标识 (集成未启用时为 NULL)
/// - 状态只单向流转: created -> used / created -> expired
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub visitor_id: i64,
    pub rule_id: i64,
    pub code: String,
    pub external_id: Option<String>,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub status: DiscountStatus,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub order_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 是否已过期 (严格晚于 expires_at; 仅展示层判定, 无后台清扫)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

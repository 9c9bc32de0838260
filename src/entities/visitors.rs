use crate::models::DeviceType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 访客实体
/// 说明:
/// - fingerprint 在店铺内唯一, 是匿名访客的稳定标识
/// - external_customer_id 为商城平台的顾客引用 (登录态), 订单回填
/// - total_plays / total_wins 为生命周期计数, 在 play 事务内原子自增
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "visitors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: i64,
    pub fingerprint: String,
    pub email: Option<String>,
    pub external_customer_id: Option<String>,
    pub device_type: DeviceType,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
    pub first_seen_at: Option<DateTime<Utc>>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub total_plays: i64,
    pub total_wins: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

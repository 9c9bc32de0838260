use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 活动类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    #[sea_orm(string_value = "spin_wheel")]
    SpinWheel,
    #[sea_orm(string_value = "scratch_card")]
    ScratchCard,
    #[sea_orm(string_value = "popup")]
    Popup,
}

/// 奖品类型 (NoPrize 代表谢谢参与, 即 LOSE)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrizeKind {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed_amount")]
    FixedAmount,
    #[sea_orm(string_value = "free_shipping")]
    FreeShipping,
    #[sea_orm(string_value = "no_prize")]
    NoPrize,
}

impl PrizeKind {
    pub fn is_win(&self) -> bool {
        !matches!(self, PrizeKind::NoPrize)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayResult {
    #[sea_orm(string_value = "win")]
    Win,
    #[sea_orm(string_value = "lose")]
    Lose,
}

/// 折扣状态机: Created -> Used (订单回调) / Created -> Expired (过期, 仅展示层判定)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountStatus {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "used")]
    Used,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// 设备分类 (从 User-Agent 归类)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[sea_orm(string_value = "desktop")]
    Desktop,
    #[sea_orm(string_value = "mobile")]
    Mobile,
    #[sea_orm(string_value = "tablet")]
    Tablet,
}

/// 投放规则的访客类型筛选
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorTypeFilter {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "returning")]
    Returning,
    #[sea_orm(string_value = "customers")]
    Customers,
    #[sea_orm(string_value = "non_customers")]
    NonCustomers,
    #[sea_orm(string_value = "logged_in")]
    LoggedIn,
    #[sea_orm(string_value = "not_logged_in")]
    NotLoggedIn,
}

impl std::fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeKind::Percentage => write!(f, "percentage"),
            PrizeKind::FixedAmount => write!(f, "fixed_amount"),
            PrizeKind::FreeShipping => write!(f, "free_shipping"),
            PrizeKind::NoPrize => write!(f, "no_prize"),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Desktop => write!(f, "desktop"),
            DeviceType::Mobile => write!(f, "mobile"),
            DeviceType::Tablet => write!(f, "tablet"),
        }
    }
}

use crate::entities::discount_entity;
use crate::models::{DiscountStatus, PrizeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountResponse {
    pub code: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub status: DiscountStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<discount_entity::Model> for DiscountResponse {
    fn from(m: discount_entity::Model) -> Self {
        DiscountResponse {
            code: m.code,
            prize_kind: m.prize_kind,
            prize_value: m.prize_value,
            status: m.status,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }
    }
}

/// 只读校验接口的查询参数 (结账流程用)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyQuery {
    pub code: String,
    pub shop: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    /// 无效原因: not_found / used / expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

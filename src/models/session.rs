use crate::entities::visitor_entity;
use crate::models::{
    ActiveGameResponse, DeviceType, DiscountResponse, PlayRecordResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// init 请求: 挂件加载时调用一次
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct InitRequest {
    /// 店铺域名
    pub shop: String,
    /// 客户端指纹 (可选, 缺省则服务端从请求信号推导)
    pub fingerprint: Option<String>,
    /// 当前页面路径
    pub page: String,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InitResponse {
    pub session_token: String,
    pub visitor_id: i64,
    pub is_new_visitor: bool,
    pub can_play: bool,
    /// 不可玩时距可玩的剩余毫秒 (可玩时为 0)
    pub cooldown_remaining_ms: i64,
    /// 本次访问命中的活动 (无可投放活动时为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_game: Option<ActiveGameResponse>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusQuery {
    pub token: String,
}

/// 访客概要 (status 查询用, 不含指纹)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitorSummary {
    pub id: i64,
    pub email: Option<String>,
    pub device_type: DeviceType,
    pub country: Option<String>,
    pub total_plays: i64,
    pub total_wins: i64,
    pub first_seen_at: Option<DateTime<Utc>>,
}

impl From<visitor_entity::Model> for VisitorSummary {
    fn from(m: visitor_entity::Model) -> Self {
        VisitorSummary {
            id: m.id,
            email: m.email,
            device_type: m.device_type,
            country: m.country,
            total_plays: m.total_plays,
            total_wins: m.total_wins,
            first_seen_at: m.first_seen_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub session_active: bool,
    pub visitor: VisitorSummary,
    pub can_play: bool,
    pub cooldown_remaining_ms: i64,
    /// 最近 10 次抽奖
    pub recent_plays: Vec<PlayRecordResponse>,
    /// 尚未使用且未过期的折扣
    pub active_discounts: Vec<DiscountResponse>,
}

/// 客户端埋点: 挂件曝光 (view) 与奖品领取 (claim)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrackRequest {
    pub session_token: String,
    /// "view" | "claim"
    pub event: String,
    pub game_id: Option<i64>,
}

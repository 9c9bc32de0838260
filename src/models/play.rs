use crate::entities::play_entity;
use crate::models::{DiscountResponse, PlayResult, PrizeKind, SegmentResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PlayRequest {
    pub session_token: String,
    pub game_id: i64,
    /// 规则要求邮箱时必填 (同时回填到访客档案)
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayResponse {
    pub result: PlayResult,
    /// 命中的槽位
    pub segment: SegmentResponse,
    /// 中奖时的折扣信息, LOSE 时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountResponse>,
}

/// 历史抽奖记录 (status 查询用, 奖品字段为当时快照)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayRecordResponse {
    pub id: i64,
    pub game_id: i64,
    pub result: PlayResult,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub prize_label: String,
    pub played_at: Option<DateTime<Utc>>,
}

impl From<play_entity::Model> for PlayRecordResponse {
    fn from(m: play_entity::Model) -> Self {
        PlayRecordResponse {
            id: m.id,
            game_id: m.game_id,
            result: m.result,
            prize_kind: m.prize_kind,
            prize_value: m.prize_value,
            prize_label: m.prize_label,
            played_at: m.played_at,
        }
    }
}

use crate::entities::{game_entity, segment_entity};
use crate::models::{GameType, PrizeKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 下发给挂件的活动信息 (不含概率权重, 不向客户端泄露中奖率)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveGameResponse {
    pub id: i64,
    pub game_type: GameType,
    pub name: String,
    pub trigger_kind: String,
    pub trigger_value: Option<i32>,
    pub display_config: Option<serde_json::Value>,
    pub segments: Vec<SegmentResponse>,
}

/// 奖品槽位的展示信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SegmentResponse {
    pub id: i64,
    pub label: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub color: Option<String>,
    pub position: i32,
}

impl From<segment_entity::Model> for SegmentResponse {
    fn from(m: segment_entity::Model) -> Self {
        SegmentResponse {
            id: m.id,
            label: m.label,
            prize_kind: m.prize_kind,
            prize_value: m.prize_value,
            color: m.color,
            position: m.position,
        }
    }
}

impl ActiveGameResponse {
    pub fn from_game(game: game_entity::Model, segments: Vec<segment_entity::Model>) -> Self {
        ActiveGameResponse {
            id: game.id,
            game_type: game.game_type,
            name: game.name,
            trigger_kind: game.trigger_kind,
            trigger_value: game.trigger_value,
            display_config: game.display_config,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }
}

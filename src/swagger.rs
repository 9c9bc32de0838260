use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::session::init,
        handlers::session::status,
        handlers::session::track,
        handlers::play::play,
        handlers::discount::verify,
        handlers::webhook::order_paid,
    ),
    components(
        schemas(
            InitRequest,
            InitResponse,
            StatusQuery,
            StatusResponse,
            TrackRequest,
            VisitorSummary,
            PlayRequest,
            PlayResponse,
            PlayRecordResponse,
            ActiveGameResponse,
            SegmentResponse,
            DiscountResponse,
            VerifyQuery,
            VerifyResponse,
            OrderPaidPayload,
            GameType,
            PrizeKind,
            PlayResult,
            DiscountStatus,
            DeviceType,
            VisitorTypeFilter,
            ApiError,
        )
    ),
    tags(
        (name = "session", description = "会话与访客"),
        (name = "play", description = "抽奖"),
        (name = "discount", description = "折扣校验"),
        (name = "webhook", description = "平台事件")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

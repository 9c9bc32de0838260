use crate::models::{InitRequest, InitResponse, StatusQuery, StatusResponse, TrackRequest};
use crate::services::{RequestSignals, SessionService};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

fn header_str(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// 从请求头拆出被动信号 (指纹推导与 UA 归类的输入)
pub fn extract_signals(req: &HttpRequest) -> RequestSignals {
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or_default()
        .to_string();
    let country = {
        // CDN 地理头, Cloudflare 的与通用的都认
        let v = header_str(req, "cf-ipcountry");
        let v = if v.is_empty() {
            header_str(req, "x-geo-country")
        } else {
            v
        };
        if v.is_empty() { None } else { Some(v) }
    };
    RequestSignals {
        user_agent: header_str(req, "user-agent"),
        accept_language: header_str(req, "accept-language"),
        ip,
        country,
    }
}

#[utoipa::path(
    post,
    path = "/session/init",
    tag = "session",
    request_body = InitRequest,
    responses(
        (status = 200, description = "会话建立, 返回 token 与本次命中的活动", body = InitResponse),
        (status = 404, description = "店铺不存在")
    )
)]
/// 挂件加载时调用: 识别访客, 发会话 token, 返回可投放活动与冷却预判
pub async fn init(
    service: web::Data<SessionService>,
    req: HttpRequest,
    body: web::Json<InitRequest>,
) -> Result<HttpResponse> {
    let signals = extract_signals(&req);
    match service.init(&body.into_inner(), &signals).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/session/status",
    tag = "session",
    params(
        ("token" = String, Query, description = "会话 token")
    ),
    responses(
        (status = 200, description = "当前会话状态", body = StatusResponse),
        (status = 401, description = "无效会话")
    )
)]
/// 查询 "现在能不能玩 / 我赢过什么", 不重放抽奖逻辑
pub async fn status(
    service: web::Data<SessionService>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse> {
    match service.status(&query.token).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/session/track",
    tag = "session",
    request_body = TrackRequest,
    responses(
        (status = 200, description = "事件已计入"),
        (status = 400, description = "未知事件类型"),
        (status = 401, description = "无效或失活会话")
    )
)]
/// 挂件曝光 (view) / 奖品领取 (claim) 埋点
pub async fn track(
    service: web::Data<SessionService>,
    body: web::Json<TrackRequest>,
) -> Result<HttpResponse> {
    match service.track(&body.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn session_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/session")
            .route("/init", web::post().to(init))
            .route("/status", web::get().to(status))
            .route("/track", web::post().to(track)),
    );
}

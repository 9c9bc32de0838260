use crate::models::{PlayRequest, PlayResponse};
use crate::services::PlayService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/play",
    tag = "play",
    request_body = PlayRequest,
    responses(
        (status = 200, description = "抽奖完成", body = PlayResponse),
        (status = 400, description = "缺少必填邮箱"),
        (status = 401, description = "无效或失活会话"),
        (status = 404, description = "活动不存在/未投放/无折扣规则"),
        (status = 429, description = "冷却中, 返回剩余等待毫秒")
    )
)]
/// 进行一次抽奖:
/// 1. 事务内重查冷却计数 (并发双击只会成功一次)
/// 2. 按权重抽槽位
/// 3. 中奖先在商城平台发码, 成功后落本地折扣
pub async fn play(
    service: web::Data<PlayService>,
    body: web::Json<PlayRequest>,
) -> Result<HttpResponse> {
    match service.play(&body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn play_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/play", web::post().to(play));
}

use crate::models::{VerifyQuery, VerifyResponse};
use crate::services::DiscountService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/discounts/verify",
    tag = "discount",
    params(
        ("code" = String, Query, description = "折扣码"),
        ("shop" = String, Query, description = "店铺域名")
    ),
    responses(
        (status = 200, description = "校验结果 (valid/reason)", body = VerifyResponse)
    )
)]
/// 结账流程的只读校验: 码是否存在/已用/已过期
pub async fn verify(
    service: web::Data<DiscountService>,
    query: web::Query<VerifyQuery>,
) -> Result<HttpResponse> {
    match service.verify(&query.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn discount_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/discounts").route("/verify", web::get().to(verify)));
}

use crate::models::OrderPaidPayload;
use crate::services::DiscountService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use log::info;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/webhooks/orders/paid",
    tag = "webhook",
    request_body = OrderPaidPayload,
    responses(
        (status = 200, description = "事件处理完成, 返回命中的码数量"),
        (status = 404, description = "店铺不存在")
    )
)]
/// 订单支付事件 (商城平台异步推送)
///
/// 命中的折扣码 created -> used, 回填顾客引用, 累计 redemptions/营收
/// 平台至少一次投递, 重复事件靠条件更新幂等
pub async fn order_paid(
    service: web::Data<DiscountService>,
    body: web::Json<OrderPaidPayload>,
) -> Result<HttpResponse> {
    let payload = body.into_inner();
    info!(
        "Received order-paid event: shop={} order={} codes={}",
        payload.shop,
        payload.order_id,
        payload.discount_codes.len()
    );

    match service.handle_order_paid(&payload).await {
        Ok(matched) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "matched_codes": matched }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (webhook 挂在顶层, 不进 /api/v1)
pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhooks").route("/orders/paid", web::post().to(order_paid)));
}

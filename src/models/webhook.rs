use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 订单支付事件 (商城平台异步推送)
/// 命中折扣码时驱动 created -> used 流转并累计营收
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OrderPaidPayload {
    pub shop: String,
    pub order_id: String,
    pub total_cents: i64,
    #[serde(default)]
    pub discount_codes: Vec<String>,
    pub customer_id: Option<String>,
}

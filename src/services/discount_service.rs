use crate::entities::{
    discount_entity as discounts, shop_entity as shops, visitor_entity as visitors,
};
use crate::error::{AppError, AppResult};
use crate::models::{DiscountStatus, OrderPaidPayload, VerifyQuery, VerifyResponse};
use crate::services::analytics_service::{self, AnalyticsDelta};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct DiscountService {
    pool: DatabaseConnection,
}

impl DiscountService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 只读校验: 结账流程查询某个码当前是否可用
    /// 过期判定是严格晚于 expires_at, 不依赖后台扫描
    pub async fn verify(&self, query: &VerifyQuery) -> AppResult<VerifyResponse> {
        let invalid = |reason: &str| VerifyResponse {
            valid: false,
            reason: Some(reason.to_string()),
        };

        let shop = shops::Entity::find()
            .filter(shops::Column::Domain.eq(&query.shop))
            .one(&self.pool)
            .await?;
        let Some(shop) = shop else {
            return Ok(invalid("not_found"));
        };

        let discount = discounts::Entity::find()
            .filter(discounts::Column::ShopId.eq(shop.id))
            .filter(discounts::Column::Code.eq(&query.code))
            .one(&self.pool)
            .await?;
        let Some(discount) = discount else {
            return Ok(invalid("not_found"));
        };

        let response = match discount.status {
            DiscountStatus::Used => invalid("used"),
            DiscountStatus::Expired => invalid("expired"),
            DiscountStatus::Created if discount.is_expired(Utc::now()) => invalid("expired"),
            DiscountStatus::Created => VerifyResponse {
                valid: true,
                reason: None,
            },
        };
        Ok(response)
    }

    /// 订单支付事件: 命中的码 created -> used (恰好一次), 记营收
    ///
    /// 逻辑:
    /// 1. 按 (shop, code, status=created) 条件更新, 并发重复投递只有一次生效
    /// 2. 回填访客的平台顾客引用 (之后的 CUSTOMERS 投放会命中)
    /// 3. 每个命中码 redemptions +1, 营收整单只记一次
    /// 未知码只告警不报错, 事件流里混入别家码是常态
    pub async fn handle_order_paid(&self, payload: &OrderPaidPayload) -> AppResult<usize> {
        let shop = shops::Entity::find()
            .filter(shops::Column::Domain.eq(&payload.shop))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

        let now = Utc::now();
        let mut matched = 0usize;

        for code in &payload.discount_codes {
            let discount = discounts::Entity::find()
                .filter(discounts::Column::ShopId.eq(shop.id))
                .filter(discounts::Column::Code.eq(code))
                .one(&self.pool)
                .await?;

            let Some(discount) = discount else {
                log::warn!("Order {} carries unknown code {}", payload.order_id, code);
                continue;
            };

            let update = discounts::Entity::update_many()
                .set(discounts::ActiveModel {
                    status: Set(DiscountStatus::Used),
                    used_at: Set(Some(now)),
                    order_id: Set(Some(payload.order_id.clone())),
                    ..Default::default()
                })
                .filter(discounts::Column::Id.eq(discount.id))
                .filter(discounts::Column::Status.eq(DiscountStatus::Created))
                .exec(&self.pool)
                .await?;

            if update.rows_affected == 0 {
                // 已被并发事件消费, 状态流转只允许一次
                log::info!("Code {} already consumed, skipping", code);
                continue;
            }

            if let Some(customer_id) = payload.customer_id.as_deref() {
                visitors::Entity::update_many()
                    .set(visitors::ActiveModel {
                        external_customer_id: Set(Some(customer_id.to_string())),
                        ..Default::default()
                    })
                    .filter(visitors::Column::Id.eq(discount.visitor_id))
                    .filter(visitors::Column::ExternalCustomerId.is_null())
                    .exec(&self.pool)
                    .await?;
            }

            let revenue = if matched == 0 { payload.total_cents } else { 0 };
            analytics_service::bump(
                &self.pool,
                shop.id,
                None,
                analytics_service::today(),
                AnalyticsDelta::redemption(revenue),
            )
            .await?;

            matched += 1;
        }

        Ok(matched)
    }
}

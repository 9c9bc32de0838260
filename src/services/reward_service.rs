use crate::entities::{
    discount_entity as discounts, discount_rule_entity as rules, segment_entity as segments,
    shop_entity as shops,
};
use crate::error::{AppError, AppResult};
use crate::external::{CommerceApi, DiscountSpec};
use crate::models::DiscountStatus;
use crate::utils::generate_discount_code;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;

const CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct RewardService {
    commerce: Arc<dyn CommerceApi>,
}

impl RewardService {
    pub fn new(commerce: Arc<dyn CommerceApi>) -> Self {
        Self { commerce }
    }

    /// 为中奖槽位发放折扣, 在传入的 play 事务内执行
    ///
    /// 两阶段:
    /// 1. 生成店铺内唯一的码 (碰撞重试, 唯一索引兜底)
    /// 2. 先请商城平台创建促销码, 确认成功后才落本地 Discount 行;
    ///    外部失败返回错误, 事务整体回滚, 不留半提交状态
    ///    (集成未启用时平台侧跳过, external_id 落 NULL)
    pub async fn issue<C: ConnectionTrait>(
        &self,
        txn: &C,
        shop: &shops::Model,
        visitor_id: i64,
        rule: &rules::Model,
        segment: &segments::Model,
        now: DateTime<Utc>,
    ) -> AppResult<discounts::Model> {
        let code = self.unique_code(txn, shop.id, segment).await?;
        let expires_at = now + Duration::days(rule.validity_days as i64);

        let spec = DiscountSpec {
            title: format!("{} - {}", shop.name, segment.label),
            code: code.clone(),
            prize_kind: segment.prize_kind,
            prize_value: segment.prize_value,
            starts_at: now,
            ends_at: expires_at,
            usage_limit: rule.max_redemptions,
            once_per_customer: true,
            min_order_cents: rule.min_order_cents,
            combines_with_products: rule.combines_with_products,
            combines_with_shipping: rule.combines_with_shipping,
        };

        let external_id = self.commerce.create_discount(&spec).await?;

        let discount = discounts::ActiveModel {
            shop_id: Set(shop.id),
            visitor_id: Set(visitor_id),
            rule_id: Set(rule.id),
            code: Set(code),
            external_id: Set(external_id),
            prize_kind: Set(segment.prize_kind),
            prize_value: Set(segment.prize_value),
            status: Set(DiscountStatus::Created),
            expires_at: Set(expires_at),
            created_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(discount)
    }

    /// 生成店铺内未占用的码, 重试数次后放弃
    async fn unique_code<C: ConnectionTrait>(
        &self,
        txn: &C,
        shop_id: i64,
        segment: &segments::Model,
    ) -> AppResult<String> {
        for _ in 0..CODE_ATTEMPTS {
            let candidate = generate_discount_code(segment.prize_kind, segment.prize_value);
            let taken = discounts::Entity::find()
                .filter(discounts::Column::ShopId.eq(shop_id))
                .filter(discounts::Column::Code.eq(&candidate))
                .one(txn)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
            log::warn!("Discount code collision for shop {shop_id}: {candidate}");
        }
        Err(AppError::InternalError(
            "Failed to generate a unique discount code".to_string(),
        ))
    }
}

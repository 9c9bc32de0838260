use crate::entities::{shop_entity as shops, visitor_entity as visitors};
use crate::error::{AppError, AppResult};
use crate::utils::{classify_user_agent, derive_fingerprint, fingerprint::FingerprintSignals};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

/// 请求侧被动信号 (入口 handler 从 HTTP 头拆出来)
#[derive(Debug, Clone, Default)]
pub struct RequestSignals {
    pub user_agent: String,
    pub accept_language: String,
    pub ip: String,
    /// 地理头 (CDN 注入, 如 CF-IPCountry)
    pub country: Option<String>,
}

#[derive(Clone)]
pub struct VisitorService {
    pool: DatabaseConnection,
}

impl VisitorService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_shop(&self, domain: &str) -> AppResult<shops::Model> {
        shops::Entity::find()
            .filter(shops::Column::Domain.eq(domain))
            .filter(shops::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))
    }

    /// 识别访客: 指纹命中则回访 (last_seen 只 bump 一次), 未命中则建档
    /// 并发首访同一指纹靠唯一索引去重, 冲突方重读即可
    pub async fn resolve(
        &self,
        shop: &shops::Model,
        client_fingerprint: Option<&str>,
        signals: &RequestSignals,
    ) -> AppResult<(visitors::Model, bool)> {
        let fingerprint = derive_fingerprint(
            client_fingerprint,
            &FingerprintSignals {
                shop_domain: &shop.domain,
                user_agent: &signals.user_agent,
                accept_language: &signals.accept_language,
                ip: &signals.ip,
            },
        );

        if let Some(existing) = self.find_by_fingerprint(shop.id, &fingerprint).await? {
            let mut am = existing.clone().into_active_model();
            am.last_seen_at = Set(Some(Utc::now()));
            let updated = am.update(&self.pool).await?;
            return Ok((updated, false));
        }

        let ua = classify_user_agent(&signals.user_agent);
        let insert = visitors::ActiveModel {
            shop_id: Set(shop.id),
            fingerprint: Set(fingerprint.clone()),
            device_type: Set(ua.device),
            browser: Set(ua.browser),
            os: Set(ua.os),
            country: Set(signals.country.clone()),
            first_seen_at: Set(Some(Utc::now())),
            last_seen_at: Set(Some(Utc::now())),
            total_plays: Set(0),
            total_wins: Set(0),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match insert {
            Ok(created) => Ok((created, true)),
            // 唯一索引冲突: 另一请求刚建了同一指纹, 按回访处理
            Err(e) => {
                if let Some(existing) = self.find_by_fingerprint(shop.id, &fingerprint).await? {
                    log::debug!(
                        "Visitor insert raced for fingerprint {fingerprint}, reusing row"
                    );
                    Ok((existing, false))
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn find_by_fingerprint(
        &self,
        shop_id: i64,
        fingerprint: &str,
    ) -> AppResult<Option<visitors::Model>> {
        Ok(visitors::Entity::find()
            .filter(visitors::Column::ShopId.eq(shop_id))
            .filter(visitors::Column::Fingerprint.eq(fingerprint))
            .one(&self.pool)
            .await?)
    }
}

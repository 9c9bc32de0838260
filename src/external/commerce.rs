use crate::config::CommerceConfig;
use crate::error::{AppError, AppResult};
use crate::models::PrizeKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// 请商城平台创建促销码的完整描述
#[derive(Debug, Clone, Serialize)]
pub struct DiscountSpec {
    pub title: String,
    pub code: String,
    pub prize_kind: PrizeKind,
    pub prize_value: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub usage_limit: i32,
    pub once_per_customer: bool,
    pub min_order_cents: Option<i64>,
    pub combines_with_products: bool,
    pub combines_with_shipping: bool,
}

/// 商城平台折扣 API 的窄接口
/// 返回 Ok(Some(id)) = 平台侧创建成功; Ok(None) = 集成未启用, 跳过外部创建
/// 引擎本身不关心平台细节, 单测用 mock 替换
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn create_discount(&self, spec: &DiscountSpec) -> AppResult<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct PlatformResponse {
    success: bool,
    message: Option<String>,
    data: Option<PlatformDiscount>,
}

#[derive(Debug, Deserialize)]
struct PlatformDiscount {
    id: String,
}

/// 默认的 HTTP 实现
pub struct CommercePlatformClient {
    client: Client,
    config: CommerceConfig,
}

impl CommercePlatformClient {
    pub fn new(config: CommerceConfig) -> Self {
        // 外部调用必须有界超时, 失败会整体中止本次 play
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl CommerceApi for CommercePlatformClient {
    async fn create_discount(&self, spec: &DiscountSpec) -> AppResult<Option<String>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let url = format!("{}/admin/api/discounts", self.config.base_url);
        let payload = serde_json::json!({
            "title": spec.title,
            "code": spec.code,
            "value_type": spec.prize_kind.to_string(),
            "value": spec.prize_value,
            "starts_at": spec.starts_at.to_rfc3339(),
            "ends_at": spec.ends_at.to_rfc3339(),
            "usage_limit": spec.usage_limit,
            "once_per_customer": spec.once_per_customer,
            "min_order_cents": spec.min_order_cents,
            "combines_with_products": spec.combines_with_products,
            "combines_with_shipping": spec.combines_with_shipping,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Discount creation returned HTTP {}",
                response.status()
            )));
        }

        let result: PlatformResponse = response.json().await?;
        if !result.success {
            return Err(AppError::ExternalApiError(format!(
                "Discount creation rejected: {}",
                result.message.unwrap_or_else(|| "no message".to_string())
            )));
        }

        let discount = result.data.ok_or_else(|| {
            AppError::ExternalApiError("Discount creation response missing data".to_string())
        })?;

        log::info!("Platform discount created: code={} id={}", spec.code, discount.id);

        Ok(Some(discount.id))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 单测用: 记录调用次数, 可配置成功/失败
    pub struct MockCommerceApi {
        pub calls: AtomicUsize,
        pub fail: bool,
    }

    impl MockCommerceApi {
        pub fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CommerceApi for MockCommerceApi {
        async fn create_discount(&self, spec: &DiscountSpec) -> AppResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::ExternalApiError("mock failure".to_string()));
            }
            Ok(Some(format!("ext_{}", spec.code)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCommerceApi;
    use super::*;

    fn spec() -> DiscountSpec {
        let now = Utc::now();
        DiscountSpec {
            title: "Test - 10% OFF".to_string(),
            code: "SPIN10-ABC234".to_string(),
            prize_kind: PrizeKind::Percentage,
            prize_value: 10,
            starts_at: now,
            ends_at: now + chrono::Duration::days(7),
            usage_limit: 1,
            once_per_customer: true,
            min_order_cents: None,
            combines_with_products: false,
            combines_with_shipping: false,
        }
    }

    #[tokio::test]
    async fn test_mock_commerce_api() {
        let api = MockCommerceApi::succeeding();
        let id = api.create_discount(&spec()).await.unwrap();
        assert_eq!(id, Some("ext_SPIN10-ABC234".to_string()));
        assert_eq!(api.call_count(), 1);

        let failing = MockCommerceApi::failing();
        assert!(failing.create_discount(&spec()).await.is_err());
        assert_eq!(failing.call_count(), 1);
    }

    #[tokio::test]
    async fn test_disabled_integration_skips_platform() {
        let client = CommercePlatformClient::new(CommerceConfig {
            enabled: false,
            base_url: "http://localhost:1".to_string(),
            api_token: String::new(),
            timeout_secs: 1,
        });
        let id = client.create_discount(&spec()).await.unwrap();
        assert_eq!(id, None);
    }
}

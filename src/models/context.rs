use crate::models::{DeviceType, VisitorTypeFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 页面类型 (由路径推导)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Index,
    Product,
    Collection,
    Cart,
    Page,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Index => "index",
            PageType::Product => "product",
            PageType::Collection => "collection",
            PageType::Cart => "cart",
            PageType::Page => "page",
        }
    }
}

/// 流量来源 (UTM 优先, 否则按 referrer 粗分)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    Paid,
    Organic,
    Social,
    Direct,
    Referral,
}

impl TrafficSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficSource::Paid => "paid",
            TrafficSource::Organic => "organic",
            TrafficSource::Social => "social",
            TrafficSource::Direct => "direct",
            TrafficSource::Referral => "referral",
        }
    }
}

/// 一次访问的完整上下文, 投放规则的匹配输入
/// 纯数据结构, 由 init/play 入口一次性组装, 规则评估不再查库
#[derive(Debug, Clone)]
pub struct VisitContext {
    pub page_type: PageType,
    pub device: DeviceType,
    pub is_new_visitor: bool,
    pub has_customer_ref: bool,
    pub has_email: bool,
    pub traffic_source: TrafficSource,
    pub utm_source: Option<String>,
    /// 0 = 周一 ... 6 = 周日 (chrono num_days_from_monday)
    pub weekday: u8,
    pub hour: u8,
}

impl VisitContext {
    /// 访客类型筛选: 新客按本次调用是否首见, 顾客按有无平台顾客引用, 登录按有无邮箱
    pub fn matches_visitor_type(&self, filter: VisitorTypeFilter) -> bool {
        match filter {
            VisitorTypeFilter::All => true,
            VisitorTypeFilter::New => self.is_new_visitor,
            VisitorTypeFilter::Returning => !self.is_new_visitor,
            VisitorTypeFilter::Customers => self.has_customer_ref,
            VisitorTypeFilter::NonCustomers => !self.has_customer_ref,
            VisitorTypeFilter::LoggedIn => self.has_email,
            VisitorTypeFilter::NotLoggedIn => !self.has_email,
        }
    }
}

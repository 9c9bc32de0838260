use crate::models::{PageType, TrafficSource};

/// 从路径推导页面类型
pub fn derive_page_type(path: &str) -> PageType {
    let path = path.split('?').next().unwrap_or(path);
    if path == "/" || path.is_empty() {
        PageType::Index
    } else if path.contains("/products/") {
        PageType::Product
    } else if path.contains("/collections/") {
        PageType::Collection
    } else if path.contains("/cart") {
        PageType::Cart
    } else {
        PageType::Page
    }
}

const SEARCH_ENGINES: &[&str] = &["google.", "bing.", "yahoo.", "duckduckgo.", "baidu."];
const SOCIAL_HOSTS: &[&str] = &[
    "facebook.",
    "instagram.",
    "twitter.",
    "x.com",
    "t.co",
    "tiktok.",
    "pinterest.",
    "reddit.",
    "linkedin.",
    "youtube.",
];

/// 粗粒度流量来源:
/// - 带 utm_source -> paid
/// - 无 referrer -> direct
/// - 搜索引擎 -> organic, 社交域名 -> social, 其余 -> referral
pub fn derive_traffic_source(referrer: Option<&str>, utm_source: Option<&str>) -> TrafficSource {
    if utm_source.map(|s| !s.trim().is_empty()).unwrap_or(false) {
        return TrafficSource::Paid;
    }
    let referrer = match referrer {
        Some(r) if !r.trim().is_empty() => r.to_ascii_lowercase(),
        _ => return TrafficSource::Direct,
    };
    if SEARCH_ENGINES.iter().any(|h| referrer.contains(h)) {
        TrafficSource::Organic
    } else if SOCIAL_HOSTS.iter().any(|h| referrer.contains(h)) {
        TrafficSource::Social
    } else {
        TrafficSource::Referral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_type_from_path() {
        assert_eq!(derive_page_type("/"), PageType::Index);
        assert_eq!(derive_page_type("/products/blue-shirt"), PageType::Product);
        assert_eq!(derive_page_type("/collections/summer"), PageType::Collection);
        assert_eq!(derive_page_type("/cart"), PageType::Cart);
        assert_eq!(derive_page_type("/pages/about-us"), PageType::Page);
    }

    #[test]
    fn test_page_type_ignores_query() {
        assert_eq!(derive_page_type("/?ref=x"), PageType::Index);
        assert_eq!(
            derive_page_type("/products/hat?variant=1"),
            PageType::Product
        );
    }

    #[test]
    fn test_utm_wins_over_referrer() {
        assert_eq!(
            derive_traffic_source(Some("https://www.google.com/"), Some("adwords")),
            TrafficSource::Paid
        );
    }

    #[test]
    fn test_referrer_heuristics() {
        assert_eq!(
            derive_traffic_source(Some("https://www.google.com/search?q=x"), None),
            TrafficSource::Organic
        );
        assert_eq!(
            derive_traffic_source(Some("https://m.facebook.com/"), None),
            TrafficSource::Social
        );
        assert_eq!(
            derive_traffic_source(Some("https://someblog.example.com/post"), None),
            TrafficSource::Referral
        );
        assert_eq!(derive_traffic_source(None, None), TrafficSource::Direct);
        assert_eq!(derive_traffic_source(Some("  "), None), TrafficSource::Direct);
    }
}

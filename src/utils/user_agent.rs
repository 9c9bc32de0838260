use crate::models::DeviceType;
use regex::Regex;
use std::sync::OnceLock;

/// User-Agent 归类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UaClassification {
    pub device: DeviceType,
    pub browser: String,
    pub os: String,
}

fn tablet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)ipad|tablet|kindle|silk|playbook").unwrap())
}

fn mobile_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)mobile|iphone|ipod|android.*mobile|windows phone").unwrap())
}

/// 粗粒度 UA 归类, 投放规则只区分 desktop/mobile/tablet 和主流浏览器/系统
/// 判定顺序: 先平板后手机 (Android 平板 UA 同时含 android 与 tablet)
pub fn classify_user_agent(ua: &str) -> UaClassification {
    let device = if tablet_re().is_match(ua) {
        DeviceType::Tablet
    } else if mobile_re().is_match(ua) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    };

    let lower = ua.to_ascii_lowercase();

    // Edg/OPR 要先于 Chrome 判断, Chrome 要先于 Safari
    let browser = if lower.contains("edg/") || lower.contains("edge/") {
        "edge"
    } else if lower.contains("opr/") || lower.contains("opera") {
        "opera"
    } else if lower.contains("firefox/") {
        "firefox"
    } else if lower.contains("chrome/") || lower.contains("crios/") {
        "chrome"
    } else if lower.contains("safari/") {
        "safari"
    } else {
        "unknown"
    };

    let os = if lower.contains("windows") {
        "windows"
    } else if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ios") {
        "ios"
    } else if lower.contains("mac os") || lower.contains("macintosh") {
        "macos"
    } else if lower.contains("android") {
        "android"
    } else if lower.contains("linux") {
        "linux"
    } else {
        "unknown"
    };

    UaClassification {
        device,
        browser: browser.to_string(),
        os: os.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

    #[test]
    fn test_desktop_chrome() {
        let c = classify_user_agent(DESKTOP_CHROME);
        assert_eq!(c.device, DeviceType::Desktop);
        assert_eq!(c.browser, "chrome");
        assert_eq!(c.os, "windows");
    }

    #[test]
    fn test_iphone_safari() {
        let c = classify_user_agent(IPHONE_SAFARI);
        assert_eq!(c.device, DeviceType::Mobile);
        assert_eq!(c.browser, "safari");
        assert_eq!(c.os, "ios");
    }

    #[test]
    fn test_ipad_is_tablet() {
        let c = classify_user_agent(IPAD);
        assert_eq!(c.device, DeviceType::Tablet);
    }

    #[test]
    fn test_android_mobile() {
        let c = classify_user_agent(ANDROID_CHROME);
        assert_eq!(c.device, DeviceType::Mobile);
        assert_eq!(c.browser, "chrome");
        assert_eq!(c.os, "android");
    }

    #[test]
    fn test_empty_ua_defaults() {
        let c = classify_user_agent("");
        assert_eq!(c.device, DeviceType::Desktop);
        assert_eq!(c.browser, "unknown");
        assert_eq!(c.os, "unknown");
    }
}

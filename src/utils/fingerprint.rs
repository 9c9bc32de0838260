/// 请求侧可得的被动信号, 用于在客户端未提供指纹时做确定性推导
pub struct FingerprintSignals<'a> {
    pub shop_domain: &'a str,
    pub user_agent: &'a str,
    pub accept_language: &'a str,
    pub ip: &'a str,
}

/// 推导访客指纹: 客户端传了就原样用, 否则对信号做 md5
/// 同一浏览器在同一店铺重复访问会得到同一指纹
pub fn derive_fingerprint(client_supplied: Option<&str>, signals: &FingerprintSignals) -> String {
    if let Some(fp) = client_supplied {
        let fp = fp.trim();
        if !fp.is_empty() {
            return fp.to_string();
        }
    }
    let raw = format!(
        "{}|{}|{}|{}",
        signals.shop_domain, signals.user_agent, signals.accept_language, signals.ip
    );
    format!("{:x}", md5::compute(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> FingerprintSignals<'static> {
        FingerprintSignals {
            shop_domain: "demo.myshop.com",
            user_agent: "Mozilla/5.0",
            accept_language: "en-US",
            ip: "203.0.113.9",
        }
    }

    #[test]
    fn test_client_fingerprint_used_verbatim() {
        let fp = derive_fingerprint(Some("fp_abc123"), &signals());
        assert_eq!(fp, "fp_abc123");
    }

    #[test]
    fn test_derived_fingerprint_is_stable() {
        let a = derive_fingerprint(None, &signals());
        let b = derive_fingerprint(None, &signals());
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_blank_client_fingerprint_falls_back() {
        let a = derive_fingerprint(Some("   "), &signals());
        let b = derive_fingerprint(None, &signals());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_ip_changes_fingerprint() {
        let a = derive_fingerprint(None, &signals());
        let other = FingerprintSignals {
            ip: "198.51.100.1",
            ..signals()
        };
        let b = derive_fingerprint(None, &other);
        assert_ne!(a, b);
    }
}

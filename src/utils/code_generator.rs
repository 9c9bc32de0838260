use crate::models::PrizeKind;
use rand::Rng;

const SUFFIX_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const SUFFIX_LEN: usize = 6;

/// 按奖品形状生成可读前缀:
/// - 10% 折扣 -> "SPIN10"
/// - $5 固定金额 -> "SAVE5"
/// - 包邮 -> "FREESHIP"
pub fn code_prefix(kind: PrizeKind, value: i64) -> String {
    match kind {
        PrizeKind::Percentage => format!("SPIN{value}"),
        PrizeKind::FixedAmount => format!("SAVE{value}"),
        PrizeKind::FreeShipping => "FREESHIP".to_string(),
        // NoPrize 不该走到发码, 调用方负责过滤
        PrizeKind::NoPrize => "SPIN".to_string(),
    }
}

/// 生成 "前缀-随机后缀" 折扣码 (去掉易混淆的 0/O/1/I)
/// 唯一性由店铺内唯一索引兜底, 调用方碰撞时重试
pub fn generate_discount_code(kind: PrizeKind, value: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect();
    format!("{}-{}", code_prefix(kind, value), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_per_prize_kind() {
        assert_eq!(code_prefix(PrizeKind::Percentage, 10), "SPIN10");
        assert_eq!(code_prefix(PrizeKind::FixedAmount, 5), "SAVE5");
        assert_eq!(code_prefix(PrizeKind::FreeShipping, 0), "FREESHIP");
    }

    #[test]
    fn test_generated_code_shape() {
        let code = generate_discount_code(PrizeKind::Percentage, 15);
        let (prefix, suffix) = code.split_once('-').expect("code has a dash");
        assert_eq!(prefix, "SPIN15");
        assert_eq!(suffix.len(), 6);
        assert!(suffix
            .bytes()
            .all(|b| SUFFIX_CHARS.contains(&b)));
    }

    #[test]
    fn test_codes_vary() {
        let a = generate_discount_code(PrizeKind::FreeShipping, 0);
        let b = generate_discount_code(PrizeKind::FreeShipping, 0);
        // 理论上可能相同, 概率 32^-6, 测试里足够稳定
        assert_ne!(a, b);
    }
}

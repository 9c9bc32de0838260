use rand::distributions::Alphanumeric;
use rand::Rng;

/// 会话 token 长度 (48 个字母数字字符 ≈ 285 bit 熵, 远超 128 bit 下限)
const SESSION_TOKEN_LEN: usize = 48;

/// 生成不可猜测的会话 token (唯一查找键, 不做枚举防护以外的含义)
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_distinct() {
        // 熵足够时两个 token 碰撞概率可忽略
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}

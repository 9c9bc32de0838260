use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub commerce: CommerceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 商城平台折扣 API 集成配置
/// enabled = false 时不调用外部接口, 折扣仅落本地 (external_id = NULL)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_commerce_timeout")]
    pub timeout_secs: u64,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        CommerceConfig {
            enabled: false,
            base_url: String::new(),
            api_token: String::new(),
            timeout_secs: default_commerce_timeout(),
        }
    }
}

fn default_commerce_timeout() -> u64 {
    10
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件, 不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量, 且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    commerce: CommerceConfig {
                        enabled: get_env_parse("COMMERCE_API_ENABLED", false),
                        base_url: get_env("COMMERCE_API_BASE_URL").unwrap_or_default(),
                        api_token: get_env("COMMERCE_API_TOKEN").unwrap_or_default(),
                        timeout_secs: get_env_parse("COMMERCE_API_TIMEOUT_SECS", 10u64),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖 (即便文件存在时也覆盖)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(p) = v.parse() {
                config.server.port = p;
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(mc) = v.parse() {
                config.database.max_connections = mc;
            }
        }
        if let Ok(v) = env::var("COMMERCE_API_ENABLED") {
            if let Ok(b) = v.parse() {
                config.commerce.enabled = b;
            }
        }
        if let Ok(v) = env::var("COMMERCE_API_BASE_URL") {
            config.commerce.base_url = v;
        }
        if let Ok(v) = env::var("COMMERCE_API_TOKEN") {
            config.commerce.api_token = v;
        }
        if let Ok(v) = env::var("COMMERCE_API_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                config.commerce.timeout_secs = n;
            }
        }

        Ok(config)
    }
}

use std::env;
use std::net::SocketAddr;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// 服务运行配置，来源于环境变量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `CMDAPI_LISTEN`
    pub listen_addr: SocketAddr,
    /// `DATABASE_URL`；为空时使用内存仓储
    pub database_url: Option<String>,
    /// `CMDAPI_LOG_JSON`
    pub log_json: bool,
    /// `CMDAPI_DB_MAX_CONNECTIONS`
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_url: None,
            log_json: false,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            value: other.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意键值来源构造配置，未设置或空白的键取默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(raw) = get("CMDAPI_LISTEN") {
            cfg.listen_addr = raw.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: "CMDAPI_LISTEN",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        cfg.database_url = get("DATABASE_URL");

        if let Some(raw) = get("CMDAPI_LOG_JSON") {
            cfg.log_json = parse_bool("CMDAPI_LOG_JSON", &raw)?;
        }

        if let Some(raw) = get("CMDAPI_DB_MAX_CONNECTIONS") {
            cfg.db_max_connections = match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: "CMDAPI_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "CMDAPI_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            };
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.listen_addr.to_string(), DEFAULT_LISTEN);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = from_pairs(&[
            ("CMDAPI_LISTEN", "0.0.0.0:8080"),
            ("DATABASE_URL", "postgres://localhost/commands"),
            ("CMDAPI_LOG_JSON", "yes"),
            ("CMDAPI_DB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(
            cfg.database_url.as_deref(),
            Some("postgres://localhost/commands")
        );
        assert!(cfg.log_json);
        assert_eq!(cfg.db_max_connections, 12);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let cfg = from_pairs(&[("DATABASE_URL", "   ")]).unwrap();
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = from_pairs(&[("CMDAPI_LISTEN", "not-an-addr")]).unwrap_err();
        assert!(err.to_string().contains("CMDAPI_LISTEN"));

        let err = from_pairs(&[("CMDAPI_LOG_JSON", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("boolean"));

        let err = from_pairs(&[("CMDAPI_DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}

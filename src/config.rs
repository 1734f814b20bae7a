//! Process configuration from the environment (and an optional `.env` file).

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/subscriptions";
pub const DEFAULT_LOG_FILTER: &str = "subscriptions=info,tower_http=info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub http_host: String,
    pub http_port: u16,
    pub http_body_limit: usize,
    pub log_filter: String,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset and empty keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            http_host: get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: parse_or(&get, "HTTP_PORT", 8080)?,
            http_body_limit: parse_or(&get, "HTTP_BODY_LIMIT", 64 * 1024)?,
            log_filter: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.db_acquire_timeout, Duration::from_secs(5));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.http_body_limit, 65536);
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn overrides_and_blank_values() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://db:5432/subs"),
            ("HTTP_PORT", " 9000 "),
            ("HTTP_HOST", ""),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db:5432/subs");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = config_from(&[("DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        match err {
            ConfigError::Invalid { var, value } => {
                assert_eq!(var, "DB_MAX_CONNECTIONS");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

/*
 * Responsibility
 * - Read configuration from the environment (DATABASE_URL, CORS allow-list, identity service, cache)
 * - Validate values (missing required keys abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8081";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity service connection settings.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    // 0 disables the validation cache.
    pub cache_ttl_seconds: u64,
    pub valkey_url: Option<String>,
}

impl AuthServiceConfig {
    pub fn cache_enabled(&self) -> bool {
        self.cache_ttl_seconds > 0
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthServiceConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = get("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let run_migrations = get("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let app_env = AppEnv::parse(get("APP_ENV"));

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let base_url = get("AUTH_SERVICE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_SERVICE_URL.to_string());

        let request_timeout = timeout_seconds(&get, "AUTH_SERVICE_TIMEOUT_SECONDS", 10)?;
        let connect_timeout = timeout_seconds(&get, "AUTH_SERVICE_CONNECT_TIMEOUT_SECONDS", 3)?;

        let cache_ttl_seconds = get("IDENTITY_CACHE_TTL_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let valkey_url = get("VALKEY_URL").filter(|s| !s.trim().is_empty());
        if cache_ttl_seconds > 0 && valkey_url.is_none() {
            return Err(ConfigError::Missing("VALKEY_URL"));
        }

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            run_migrations,
            app_env,
            cors_allowed_origins,
            auth: AuthServiceConfig {
                base_url,
                connect_timeout: Duration::from_secs(connect_timeout),
                request_timeout: Duration::from_secs(request_timeout),
                cache_ttl_seconds,
                valkey_url,
            },
        })
    }
}

// A zero timeout would fail every identity check, so it is refused at startup.
fn timeout_seconds(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match get(key).and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(0) => Err(ConfigError::Invalid(key)),
        Some(seconds) => Ok(seconds),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/materials")]).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth.base_url, DEFAULT_AUTH_SERVICE_URL);
        assert_eq!(config.auth.request_timeout, Duration::from_secs(10));
        assert!(!config.auth.cache_enabled());
        assert!(config.run_migrations);
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn enabled_cache_needs_valkey() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("IDENTITY_CACHE_TTL_SECONDS", "30"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("VALKEY_URL"));

        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("IDENTITY_CACHE_TTL_SECONDS", "30"),
            ("VALKEY_URL", "redis://localhost:6379"),
        ])
        .unwrap();
        assert!(config.auth.cache_enabled());
    }

    #[test]
    fn production_origins_are_split_and_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example "),
            ("AUTH_SERVICE_URL", "http://identity:8081"),
        ])
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.auth.base_url, "http://identity:8081");
    }

    #[test]
    fn zero_identity_timeouts_are_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("AUTH_SERVICE_TIMEOUT_SECONDS", "0"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_SERVICE_TIMEOUT_SECONDS"));

        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("AUTH_SERVICE_CONNECT_TIMEOUT_SECONDS", " 0 "),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_SERVICE_CONNECT_TIMEOUT_SECONDS"));

        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("AUTH_SERVICE_TIMEOUT_SECONDS", "4"),
            ("AUTH_SERVICE_CONNECT_TIMEOUT_SECONDS", "soon"),
        ])
        .unwrap();
        assert_eq!(config.auth.request_timeout, Duration::from_secs(4));
        assert_eq!(config.auth.connect_timeout, Duration::from_secs(3));
    }
}

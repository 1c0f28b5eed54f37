/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, AUTH_SERVICE_URL, audit backend など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

const DEFAULT_AUTHORITY_URL: &str = "http://localhost:8080";
const DEFAULT_AUDIT_REMOTE_URL: &str = "http://localhost:8081/api/logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
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

/// What every service needs to mount the gate: secret and authority address.
#[derive(Clone)]
pub struct GuardConfig {
    pub jwt_secret: String,
    pub authority_base_url: Url,
    pub authority_timeout: Duration,
}

impl fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("GuardConfig")
            .field("authority_base_url", &self.authority_base_url.as_str())
            .field("authority_timeout", &self.authority_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditBackend {
    Postgres { database_url: String },
    Memory,
    Remote { url: Url },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub guard: GuardConfig,
    pub audit_backend: AuditBackend,
    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(8085);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        // No secret, no service: running without authentication is never an option.
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let authority_base_url = Url::parse(
            &lookup("AUTH_SERVICE_URL").unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
        )
        .map_err(|_| ConfigError::Invalid("AUTH_SERVICE_URL"))?;

        let authority_timeout = Duration::from_secs(
            lookup("AUTH_SERVICE_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(3),
        );

        let audit_backend = match lookup("AUDIT_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => AuditBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => AuditBackend::Memory,
            "remote" => AuditBackend::Remote {
                url: Url::parse(
                    &lookup("AUDIT_REMOTE_URL")
                        .unwrap_or_else(|| DEFAULT_AUDIT_REMOTE_URL.to_string()),
                )
                .map_err(|_| ConfigError::Invalid("AUDIT_REMOTE_URL"))?,
            },
            _ => return Err(ConfigError::Invalid("AUDIT_BACKEND")),
        };

        let request_timeout = Duration::from_secs(
            lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let request_body_limit_bytes = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            guard: GuardConfig {
                jwt_secret,
                authority_base_url,
                authority_timeout,
            },
            audit_backend,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

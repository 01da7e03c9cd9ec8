//! Application configuration, read once from the environment at startup.
//!
//! Environment variables must be set by the runtime environment:
//! - Docker: via `env_file` or `docker run --env-file`
//! - Local dev: source an env file manually (e.g. `set -a; . ./app.env; set +a`)
//!
//! The resulting [`AppConfig`] is immutable and shared through `AppState`.

pub mod db;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

pub use db::DbConfig;

use crate::error::AppError;

/// Deployment environment the service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Local,
    Development,
    Staging,
    Production,
}

impl RuntimeEnv {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RuntimeEnv::Local => "LOCAL",
            RuntimeEnv::Development => "DEVELOPMENT",
            RuntimeEnv::Staging => "STAGING",
            RuntimeEnv::Production => "PRODUCTION",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RuntimeEnv::Local)
    }
}

impl fmt::Display for RuntimeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(RuntimeEnv::Local),
            "DEVELOPMENT" => Ok(RuntimeEnv::Development),
            "STAGING" => Ok(RuntimeEnv::Staging),
            "PRODUCTION" => Ok(RuntimeEnv::Production),
            other => Err(AppError::config(format!(
                "APPLICATION_ENV must be one of LOCAL, DEVELOPMENT, STAGING, PRODUCTION, got: '{other}'"
            ))),
        }
    }
}

/// HTTP server behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_url: String,
    pub rate_limit: bool,
    pub log_request: bool,
    pub default_timeout: Duration,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
    pub log_file: Option<PathBuf>,
}

/// Token signing and verification settings.
#[derive(Clone, PartialEq)]
pub struct JwtConfig {
    pub algorithm: Algorithm,
    pub default_expiration: Duration,
    /// PEM public key for asymmetric algorithms, shared secret for HS*.
    pub public_key: String,
    /// PEM private key or shared secret; absent on verify-only deployments.
    pub private_key: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("default_expiration", &self.default_expiration)
            .field("public_key", &"<redacted>")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub env: RuntimeEnv,
    pub server: ServerConfig,
    pub db: DbConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::load(&Env::process())
    }

    /// Load from an explicit variable map (tests, tooling).
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, AppError> {
        Self::load(&Env::from_map(vars))
    }

    fn load(env: &Env<'_>) -> Result<Self, AppError> {
        let runtime_env = match env.get("APPLICATION_ENV") {
            Some(raw) => raw.parse()?,
            None => RuntimeEnv::Local,
        };

        let server = ServerConfig {
            host: env.get_or("APPLICATION_HOST", "0.0.0.0"),
            port: env.port("APPLICATION_PORT", 8080)?,
            public_url: env.get_or("APPLICATION_URL", ""),
            rate_limit: env.flag("APPLICATION_RATE_LIMIT", false)?,
            log_request: env.flag("APPLICATION_LOG_REQUEST", true)?,
            default_timeout: env.duration("APPLICATION_DEFAULT_TIMEOUT", Duration::from_secs(30))?,
            cors_allowed_origins: env
                .get("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            log_file: env.get("APPLICATION_LOG_FILE").map(PathBuf::from),
        };

        let algorithm = match env.get("JWT_ALGO") {
            Some(raw) => Algorithm::from_str(raw.trim()).map_err(|_| {
                AppError::config(format!("JWT_ALGO is not a supported algorithm: '{raw}'"))
            })?,
            None => Algorithm::RS256,
        };

        let jwt = JwtConfig {
            algorithm,
            default_expiration: env
                .duration("JWT_DEFAULT_EXPIRATION", Duration::from_secs(15 * 60))?,
            public_key: env.must("JWT_PUBLIC_KEY")?,
            private_key: env.get("JWT_PRIVATE_KEY"),
        };

        Ok(Self {
            env: runtime_env,
            server,
            db: DbConfig::load(env)?,
            jwt,
        })
    }
}

/// Variable source for config loading. Set-but-empty variables count as
/// unset.
pub(crate) struct Env<'a> {
    lookup: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> Env<'a> {
    pub(crate) fn process() -> Env<'static> {
        Env {
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    pub(crate) fn from_map(vars: &'a HashMap<String, String>) -> Self {
        Env {
            lookup: Box::new(move |key| vars.get(key).cloned()),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Required variable or a config error naming it.
    pub(crate) fn must(&self, key: &str) -> Result<String, AppError> {
        self.get(key).ok_or_else(|| {
            AppError::config(format!("Required environment variable '{key}' is not set"))
        })
    }

    pub(crate) fn port(&self, key: &str, default: u16) -> Result<u16, AppError> {
        match self.get(key) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("{key} must be a valid port number, got: '{raw}'"))
            }),
            None => Ok(default),
        }
    }

    pub(crate) fn flag(&self, key: &str, default: bool) -> Result<bool, AppError> {
        match self.get(key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::config(format!("{key} must be true or false, got: '{raw}'"))
            }),
            None => Ok(default),
        }
    }

    pub(crate) fn duration(&self, key: &str, default: Duration) -> Result<Duration, AppError> {
        match self.get(key) {
            Some(raw) => parse_duration(&raw).ok_or_else(|| {
                AppError::config(format!(
                    "{key} must be a duration like 30s, 500ms, 15m or 1h, got: '{raw}'"
                ))
            }),
            None => Ok(default),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `500ms`, `30s`, `15m`, `1h`, compound forms like `1h30m`, or bare
/// seconds.
pub(crate) fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = raw;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .filter(|&idx| idx > 0)?;
        let amount: u64 = rest[..digits_end].parse().ok()?;
        rest = &rest[digits_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let part = match &rest[..unit_end] {
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "m" => Duration::from_secs(amount.checked_mul(60)?),
            "h" => Duration::from_secs(amount.checked_mul(3600)?),
            _ => return None,
        };
        total = total.checked_add(part)?;
        rest = &rest[unit_end..];
    }
    Some(total)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

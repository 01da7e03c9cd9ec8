use std::time::Duration;

use super::Env;
use crate::error::AppError;

/// Connection settings for the Postgres database.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub ssl_mode: String,
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub(crate) fn load(env: &Env<'_>) -> Result<Self, AppError> {
        let timeout_secs = match env.get("DATABASE_TIMEOUT") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "DATABASE_TIMEOUT must be a whole number of seconds, got: '{raw}'"
                ))
            })?,
            None => 5,
        };

        Ok(Self {
            name: env.must("DATABASE_NAME")?,
            host: env.get_or("DATABASE_HOST", "localhost"),
            port: env.port("DATABASE_PORT", 5432)?,
            username: env.must("DATABASE_USERNAME")?,
            password: env.must("DATABASE_PASSWORD")?,
            ssl_mode: env.get_or("DATABASE_SSL_MODE", "disable"),
            connect_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Postgres connection URL for these settings.
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode={}&connect_timeout={}",
            self.username,
            self.password,
            self.host,
            self.port,
            self.name,
            self.ssl_mode,
            self.connect_timeout.as_secs()
        )
    }
}

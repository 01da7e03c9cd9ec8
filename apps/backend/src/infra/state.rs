use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    config: Option<Arc<AppConfig>>,
    connect: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            config: None,
            connect: false,
        }
    }

    /// Take keys from `config` and attach it to the built state.
    pub fn with_config(mut self, config: Arc<AppConfig>) -> Result<Self, AppError> {
        self.security_config = SecurityConfig::from_config(&config.jwt)?;
        self.config = Some(config);
        Ok(self)
    }

    /// Connect to the database configured via [`with_config`](Self::with_config).
    pub fn with_db(mut self) -> Self {
        self.connect = true;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = if self.connect {
            let config = self.config.as_ref().ok_or_else(|| {
                AppError::config("database requested without application config")
            })?;
            let conn = connect_db(&config.db).await?;
            AppState::new(conn, self.security_config)
        } else {
            AppState::without_db(self.security_config)
        };

        Ok(match self.config {
            Some(config) => state.with_config(config),
            None => state,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

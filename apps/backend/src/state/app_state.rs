use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::AppConfig;
use crate::metrics::RequestMetrics;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Token keys and defaults
    pub security: SecurityConfig,
    /// Loaded configuration; absent for states assembled by hand in tests
    pub config: Option<Arc<AppConfig>>,
    /// Request counters served by `/metrics`
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            config: None,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }

    /// State without a database connection (for testing)
    pub fn without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            config: None,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }

    pub fn with_config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// Name of the runtime environment, `LOCAL` when no config is attached.
    pub fn env_name(&self) -> &'static str {
        self.config
            .as_ref()
            .map(|config| config.env.as_str())
            .unwrap_or("LOCAL")
    }
}

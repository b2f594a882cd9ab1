use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgres://... or sqlite://...)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pool connections
    #[serde(default = "default_database_max_connections")]
    pub max_connections: u32,
    /// Minimum pool connections
    #[serde(default = "default_database_min_connections")]
    pub min_connections: u32,
    /// Connect timeout in seconds
    #[serde(default = "default_database_connect_timeout")]
    pub connect_timeout: u64,
    /// Run pending migrations on startup
    #[serde(default = "default_database_run_migrations")]
    pub run_migrations: bool,
    /// Log SQL statements at debug level
    #[serde(default = "default_database_log_queries")]
    pub log_queries: bool,
}

fn default_database_url() -> String {
    "sqlite://hearth.sqlite?mode=rwc".to_string()
}

fn default_database_max_connections() -> u32 {
    10
}

fn default_database_min_connections() -> u32 {
    1
}

fn default_database_connect_timeout() -> u64 {
    10
}

fn default_database_run_migrations() -> bool {
    true
}

fn default_database_log_queries() -> bool {
    false
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_database_max_connections(),
            min_connections: default_database_min_connections(),
            connect_timeout: default_database_connect_timeout(),
            run_migrations: default_database_run_migrations(),
            log_queries: default_database_log_queries(),
        }
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url cannot be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be > 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError(
                "database.min_connections cannot exceed database.max_connections".to_string(),
            ));
        }
        if self.connect_timeout == 0 {
            return Err(ConfigError::ValidationError(
                "database.connect_timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

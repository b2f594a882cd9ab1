use serde::{Deserialize, Serialize};

use super::{
    AuthConfig, CacheConfig, ConfigError, DatabaseConfig, SecurityConfig, ServerConfig, Validate,
};

/// Top-level application configuration that aggregates all config modules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    #[serde(default)]
    pub app: AppMetadata,
    /// Server configuration (bind address, workers)
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration (connection pool, migrations)
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration (sessions, CSRF, password policy, Argon2)
    #[serde(default)]
    pub auth: AuthConfig,
    /// Security configuration (response headers)
    #[serde(default)]
    pub security: SecurityConfig,
    /// Session cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Metrics configuration (Prometheus endpoint)
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Observability configuration (tracing filter)
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
    /// Application environment (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Collect per-request HTTP metrics
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

// Default functions for AppMetadata
fn default_app_name() -> String {
    "hearth-accounts".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

// Default functions for MetricsConfig
fn default_metrics_enabled() -> bool {
    true
}

// Default functions for ObservabilityConfig
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: default_environment(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

impl Validate for AppMetadata {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "app.name cannot be empty".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(ConfigError::ValidationError(
                "app.version cannot be empty".to_string(),
            ));
        }
        if self.environment.is_empty() {
            return Err(ConfigError::ValidationError(
                "app.environment cannot be empty".to_string(),
            ));
        }
        if self.shutdown_timeout == 0 {
            return Err(ConfigError::ValidationError(
                "app.shutdown_timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.is_empty() {
            return Err(ConfigError::ValidationError(
                "observability.log_filter cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.app.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.security.validate()?;
        self.cache.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

/// Load configuration from files and environment variables
///
/// Configuration loading follows this precedence (highest to lowest):
/// 1. Environment variables: HEARTH__SERVER__PORT=8080
/// 2. config/local.toml (git-ignored, developer overrides)
/// 3. config/{APP_ENV}.toml (development/staging/production)
/// 4. config/default.toml (base defaults)
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};

    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", env)).required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(Environment::with_prefix("HEARTH").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate()?;

    Ok(app_config)
}

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod security;
pub mod server;

pub use app::{AppConfig, AppMetadata, MetricsConfig, ObservabilityConfig, load_config};
pub use auth::{Argon2Config, AuthConfig, CsrfConfig, PasswordPolicyConfig, SessionConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use security::{SecurityConfig, SecurityHeadersConfig};
pub use server::ServerConfig;

use thiserror::Error;

/// Configuration errors, either from the loader or from validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Validation hook implemented by every configuration section
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Load the application configuration from files and environment variables
pub fn load() -> Result<AppConfig, ConfigError> {
    app::load_config()
}

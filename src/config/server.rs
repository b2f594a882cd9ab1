use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Number of worker threads (0 = one per core)
    #[serde(default = "default_server_workers")]
    pub workers: usize,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_workers() -> usize {
    0
}

impl ServerConfig {
    pub fn address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_server_workers(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Security configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Security headers configuration
    #[serde(default = "SecurityHeadersConfig::default")]
    pub headers: SecurityHeadersConfig,
}

/// Security headers configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Enable security headers
    #[serde(default = "default_headers_enabled")]
    pub enabled: bool,
    /// Content Security Policy
    #[serde(default = "default_headers_csp")]
    pub csp: String,
    /// HSTS max age in seconds
    #[serde(default = "default_headers_hsts_max_age")]
    pub hsts_max_age: u64,
    /// X-Frame-Options
    #[serde(default = "default_headers_x_frame_options")]
    pub x_frame_options: String,
    /// X-Content-Type-Options
    #[serde(default = "default_headers_x_content_type_options")]
    pub x_content_type_options: String,
    /// Referrer-Policy
    #[serde(default = "default_headers_referrer_policy")]
    pub referrer_policy: String,
}

// Default functions for SecurityHeadersConfig
fn default_headers_enabled() -> bool {
    true
}

fn default_headers_csp() -> String {
    "default-src 'self'".to_string()
}

fn default_headers_hsts_max_age() -> u64 {
    31536000 // 1 year
}

fn default_headers_x_frame_options() -> String {
    "DENY".to_string()
}

fn default_headers_x_content_type_options() -> String {
    "nosniff".to_string()
}

fn default_headers_referrer_policy() -> String {
    "strict-origin-when-cross-origin".to_string()
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: default_headers_enabled(),
            csp: default_headers_csp(),
            hsts_max_age: default_headers_hsts_max_age(),
            x_frame_options: default_headers_x_frame_options(),
            x_content_type_options: default_headers_x_content_type_options(),
            referrer_policy: default_headers_referrer_policy(),
        }
    }
}

impl Validate for SecurityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.headers.validate()?;
        Ok(())
    }
}

impl Validate for SecurityHeadersConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.csp.is_empty() {
            return Err(ConfigError::ValidationError(
                "security.headers.csp cannot be empty when security headers are enabled"
                    .to_string(),
            ));
        }
        if self.hsts_max_age == 0 {
            return Err(ConfigError::ValidationError(
                "security.headers.hsts_max_age must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session configuration
    #[serde(default = "SessionConfig::default")]
    pub session: SessionConfig,
    /// CSRF protection configuration
    #[serde(default = "CsrfConfig::default")]
    pub csrf: CsrfConfig,
    /// Password policy applied at signup and password change
    #[serde(default = "PasswordPolicyConfig::default")]
    pub password: PasswordPolicyConfig,
    /// Argon2 configuration
    #[serde(default = "Argon2Config::default")]
    pub argon2: Argon2Config,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    #[serde(default = "default_session_lifetime")]
    pub lifetime: u64,
    /// Name of the session cookie
    #[serde(default = "default_session_cookie_name")]
    pub cookie_name: String,
    /// Session cache TTL in seconds
    #[serde(default = "default_session_cache_ttl")]
    pub cache_ttl: u64,
    /// Expired-session cleanup interval in seconds
    #[serde(default = "default_session_cleanup_interval")]
    pub cleanup_interval: u64,
}

/// CSRF protection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    /// Reject form posts whose token does not match the cookie
    #[serde(default = "default_csrf_enforce")]
    pub enforce: bool,
    /// Name of the CSRF cookie
    #[serde(default = "default_csrf_cookie_name")]
    pub cookie_name: String,
    /// Token length in characters
    #[serde(default = "default_csrf_token_length")]
    pub token_length: usize,
}

/// Password policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Minimum password length
    #[serde(default = "default_password_min_length")]
    pub min_length: usize,
    /// Reject passwords made up entirely of digits
    #[serde(default = "default_password_reject_numeric")]
    pub reject_numeric: bool,
}

/// Argon2 password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Memory cost in KB (64MB = 65536 KB)
    #[serde(default = "default_argon2_memory_cost")]
    pub memory_cost: u32,
    /// Time cost (iterations)
    #[serde(default = "default_argon2_time_cost")]
    pub time_cost: u32,
    /// Parallelism (number of threads)
    #[serde(default = "default_argon2_parallelism")]
    pub parallelism: u32,
    /// Hash length in bytes
    #[serde(default = "default_argon2_hash_length")]
    pub hash_length: u32,
}

// Default functions for SessionConfig
fn default_session_lifetime() -> u64 {
    1209600 // 2 weeks
}

fn default_session_cookie_name() -> String {
    "sessionid".to_string()
}

fn default_session_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_session_cleanup_interval() -> u64 {
    900 // 15 minutes
}

// Default functions for CsrfConfig
fn default_csrf_enforce() -> bool {
    true
}

fn default_csrf_cookie_name() -> String {
    "csrftoken".to_string()
}

fn default_csrf_token_length() -> usize {
    64
}

// Default functions for PasswordPolicyConfig
fn default_password_min_length() -> usize {
    8
}

fn default_password_reject_numeric() -> bool {
    true
}

// Default functions for Argon2Config
fn default_argon2_memory_cost() -> u32 {
    65536 // 64 MB
}

fn default_argon2_time_cost() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_argon2_hash_length() -> u32 {
    32
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime: default_session_lifetime(),
            cookie_name: default_session_cookie_name(),
            cache_ttl: default_session_cache_ttl(),
            cleanup_interval: default_session_cleanup_interval(),
        }
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enforce: default_csrf_enforce(),
            cookie_name: default_csrf_cookie_name(),
            token_length: default_csrf_token_length(),
        }
    }
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_password_min_length(),
            reject_numeric: default_password_reject_numeric(),
        }
    }
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: default_argon2_memory_cost(),
            time_cost: default_argon2_time_cost(),
            parallelism: default_argon2_parallelism(),
            hash_length: default_argon2_hash_length(),
        }
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        self.csrf.validate()?;
        self.password.validate()?;
        self.argon2.validate()?;
        Ok(())
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lifetime == 0 {
            return Err(ConfigError::ValidationError(
                "auth.session.lifetime must be > 0".to_string(),
            ));
        }
        if self.cookie_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.session.cookie_name cannot be empty".to_string(),
            ));
        }
        if self.cache_ttl == 0 {
            return Err(ConfigError::ValidationError(
                "auth.session.cache_ttl must be > 0".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(ConfigError::ValidationError(
                "auth.session.cleanup_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for CsrfConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.csrf.cookie_name cannot be empty".to_string(),
            ));
        }
        if self.token_length < 32 {
            return Err(ConfigError::ValidationError(
                "auth.csrf.token_length must be >= 32".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for PasswordPolicyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(ConfigError::ValidationError(
                "auth.password.min_length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for Argon2Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_cost == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.memory_cost must be > 0".to_string(),
            ));
        }
        if self.time_cost == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.time_cost must be > 0".to_string(),
            ));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.parallelism must be > 0".to_string(),
            ));
        }
        if self.hash_length == 0 {
            return Err(ConfigError::ValidationError(
                "auth.argon2.hash_length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

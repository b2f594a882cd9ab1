use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use crate::config::{AuthConfig, PasswordPolicyConfig};

/// Argon2id password hasher.
///
/// Produces PHC-formatted strings
/// (`$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`) with a unique salt
/// per call. Parameters come from [`AuthConfig`]; the test harness dials
/// them down so hashing does not dominate the suite.
///
/// # Example
/// ```no_run
/// use hearth_accounts::config::AuthConfig;
/// use hearth_accounts::security::PasswordHasher;
///
/// let hasher = PasswordHasher::from_config(&AuthConfig::default()).unwrap();
/// let hash = hasher.hash("abcdef123456").unwrap();
/// assert!(hasher.verify("abcdef123456", &hash).unwrap());
/// ```
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher from the auth config section.
    ///
    /// Fails when the Argon2 parameters are out of range.
    #[tracing::instrument(skip(config))]
    pub fn from_config(config: &AuthConfig) -> Result<Self, argon2::password_hash::Error> {
        let params = Params::new(
            config.argon2.memory_cost,
            config.argon2.time_cost,
            config.argon2.parallelism,
            Some(config.argon2.hash_length as usize),
        )?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self { argon2 })
    }

    /// Hash a password with a freshly generated salt.
    #[tracing::instrument(skip(self, password))]
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a password against a PHC hash string.
    ///
    /// A wrong password is `Ok(false)`; `Err` means the stored hash
    /// itself is unusable.
    #[tracing::instrument(skip(self, password, hash))]
    pub fn verify(
        &self,
        password: &str,
        hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether a stored hash predates the current parameters.
    ///
    /// Checked on successful login so old hashes get upgraded in place.
    #[tracing::instrument(skip(self, hash))]
    pub fn needs_rehash(&self, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;

        if parsed_hash.algorithm.as_str() != "argon2id" {
            return Ok(true);
        }

        // Missing params force a rehash
        let m_cost = parsed_hash.params.get_decimal("m").unwrap_or(0);
        let t_cost = parsed_hash.params.get_decimal("t").unwrap_or(0);
        let p_cost = parsed_hash.params.get_decimal("p").unwrap_or(0);

        let current = self.argon2.params();

        if m_cost != current.m_cost() || t_cost != current.t_cost() || p_cost != current.p_cost() {
            return Ok(true);
        }

        Ok(false)
    }
}

/// Policy violations for a candidate password, as user-facing messages.
///
/// An empty vec means the password is acceptable. Required-field checks
/// live in the forms; this only judges the password itself.
pub fn policy_violations(policy: &PasswordPolicyConfig, password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < policy.min_length {
        violations.push(format!(
            "This password is too short. It must contain at least {} characters.",
            policy.min_length
        ));
    }

    if policy.reject_numeric && !password.is_empty() && password.chars().all(|c| c.is_ascii_digit())
    {
        violations.push("This password is entirely numeric.".to_string());
    }

    violations
}

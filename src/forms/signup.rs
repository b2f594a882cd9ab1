use serde::Deserialize;

use crate::config::PasswordPolicyConfig;
use crate::router::paths;
use crate::security::password;

use super::{EMAIL_REGEX, FormErrors, MISMATCH, REQUIRED, USERNAME_REGEX, errorlist, field, hidden_csrf};

/// Signup payload. Every field defaults so an empty POST still
/// deserializes and re-renders with per-field errors instead of a 400.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignUpForm {
    /// Field-level checks. Username uniqueness needs the database and
    /// is layered on by the signup service.
    pub fn validate(&self, policy: &PasswordPolicyConfig) -> FormErrors {
        let mut errors = FormErrors::new();
        let username = self.username();
        let email = self.email();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else {
            if username.chars().count() > 150 {
                errors.add("username", "Ensure this value has at most 150 characters.");
            }

            if !USERNAME_REGEX.is_match(username) {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, \
                     numbers, and @/./+/-/_ characters.",
                );
            }
        }

        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !EMAIL_REGEX.is_match(email) {
            errors.add("email", "Enter a valid email address.");
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }

        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add("password2", MISMATCH);
        } else {
            for violation in password::policy_violations(policy, &self.password2) {
                errors.add("password2", violation);
            }
        }

        errors
    }

    pub fn username(&self) -> &str {
        self.username.trim()
    }

    pub fn email(&self) -> &str {
        self.email.trim()
    }

    pub fn render(&self, csrf_token: &str, errors: &FormErrors) -> String {
        format!(
            "<form method=\"post\" action=\"{action}\">\n\
             {csrf}\n\
             {non_field}\
             {username}\n\
             {email}\n\
             {password1}\n\
             {password2}\n\
             <button type=\"submit\">Sign up</button>\n\
             </form>",
            action = paths::SIGNUP,
            csrf = hidden_csrf(csrf_token),
            non_field = errorlist(errors.non_field()),
            username = field("username", "Username", "text", self.username(), Some(150), errors),
            email = field("email", "Email", "email", self.email(), None, errors),
            password1 = field("password1", "Password", "password", "", None, errors),
            password2 = field("password2", "Password confirmation", "password", "", None, errors),
        )
    }
}

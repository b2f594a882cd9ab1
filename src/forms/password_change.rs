use serde::Deserialize;

use crate::config::PasswordPolicyConfig;
use crate::router::paths;
use crate::security::password;

use super::{FormErrors, MISMATCH, REQUIRED, errorlist, field, hidden_csrf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PasswordChangeForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password1: String,
    #[serde(default)]
    pub new_password2: String,
}

impl PasswordChangeForm {
    /// Field-level checks. Whether `old_password` actually matches the
    /// stored hash is verified by the password-change service.
    pub fn validate(&self, policy: &PasswordPolicyConfig) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.old_password.is_empty() {
            errors.add("old_password", REQUIRED);
        }

        if self.new_password1.is_empty() {
            errors.add("new_password1", REQUIRED);
        }

        if self.new_password2.is_empty() {
            errors.add("new_password2", REQUIRED);
        } else if !self.new_password1.is_empty() && self.new_password1 != self.new_password2 {
            errors.add("new_password2", MISMATCH);
        } else {
            for violation in password::policy_violations(policy, &self.new_password2) {
                errors.add("new_password2", violation);
            }
        }

        errors
    }

    pub fn render(&self, csrf_token: &str, errors: &FormErrors) -> String {
        format!(
            "<form method=\"post\" action=\"{action}\">\n\
             {csrf}\n\
             {non_field}\
             {old}\n\
             {new1}\n\
             {new2}\n\
             <button type=\"submit\">Change my password</button>\n\
             </form>",
            action = paths::PASSWORD_CHANGE,
            csrf = hidden_csrf(csrf_token),
            non_field = errorlist(errors.non_field()),
            old = field("old_password", "Old password", "password", "", None, errors),
            new1 = field("new_password1", "New password", "password", "", None, errors),
            new2 = field(
                "new_password2",
                "New password confirmation",
                "password",
                "",
                None,
                errors
            ),
        )
    }
}

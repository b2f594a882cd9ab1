use serde::Deserialize;

use crate::router::paths;
use crate::templates::escape;

use super::{FormErrors, REQUIRED, errorlist, field, hidden_csrf};

/// Login payload. `next` rides along as a hidden input so the
/// post-login redirect can return to the page that demanded auth.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

impl LoginForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if self.username().is_empty() {
            errors.add("username", REQUIRED);
        }

        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }

        errors
    }

    pub fn username(&self) -> &str {
        self.username.trim()
    }

    pub fn render(&self, csrf_token: &str, errors: &FormErrors) -> String {
        let next_input = if self.next.is_empty() {
            String::new()
        } else {
            format!(
                "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
                escape(&self.next)
            )
        };

        format!(
            "<form method=\"post\" action=\"{action}\">\n\
             {csrf}\n\
             {next_input}\
             {non_field}\
             {username}\n\
             {password}\n\
             <button type=\"submit\">Log in</button>\n\
             </form>",
            action = paths::LOGIN,
            csrf = hidden_csrf(csrf_token),
            non_field = errorlist(errors.non_field()),
            username = field("username", "Username", "text", self.username(), Some(150), errors),
            password = field("password", "Password", "password", "", None, errors),
        )
    }
}

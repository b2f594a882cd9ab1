//! Typed POST payloads for the HTML forms, their validation rules, and
//! the markup they render.
//!
//! Validation failures never abort a request; the page re-renders with
//! an `errorlist` per offending field and the submitted text fields
//! echoed back (escaped). Password fields are never echoed.

pub mod login;
pub mod password_change;
pub mod signup;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

pub use login::LoginForm;
pub use password_change::PasswordChangeForm;
pub use signup::SignUpForm;

use crate::templates::escape;

/// Word characters plus @ . + - and a 150-char cap checked separately.
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

/// Shape check only; deliverability is not our problem.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const MISMATCH: &str = "The two password fields must match.";

/// Per-field error messages in submission order, plus form-wide ones.
#[derive(Clone, Debug, Default)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Into<String>>(&mut self, field: &str, message: M) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field<M: Into<String>>(&mut self, message: M) {
        self.non_field.push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty) && self.non_field.is_empty()
    }
}

pub(crate) fn errorlist(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul class=\"errorlist\">");

    for message in messages {
        out.push_str("<li>");
        out.push_str(&escape(message));
        out.push_str("</li>");
    }

    out.push_str("</ul>");
    out
}

pub(crate) fn hidden_csrf(token: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"csrf_token\" value=\"{}\">",
        escape(token)
    )
}

/// One labelled input with its errorlist, in the markup shape the page
/// tests count on: `id_<name>` ids, `required` attributes, the value
/// attribute only when there is a value to echo.
pub(crate) fn field(
    name: &str,
    label: &str,
    input_type: &str,
    value: &str,
    maxlength: Option<usize>,
    errors: &FormErrors,
) -> String {
    let value_attr = if value.is_empty() {
        String::new()
    } else {
        format!(" value=\"{}\"", escape(value))
    };
    let maxlength_attr = maxlength
        .map(|max| format!(" maxlength=\"{max}\""))
        .unwrap_or_default();

    format!(
        "{errors}<p><label for=\"id_{name}\">{label}:</label> \
         <input type=\"{input_type}\" name=\"{name}\"{value_attr}{maxlength_attr} \
         required id=\"id_{name}\"></p>",
        errors = errorlist(errors.field(name)),
    )
}

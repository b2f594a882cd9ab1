use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::entities::users;
use crate::errors::HttpError;
use crate::forms::FormErrors;
use crate::forms::login::LoginForm;
use crate::middlewares::auth::{SessionCache, SessionUser};
use crate::router::paths;
use crate::security::PasswordHasher;

const FAILED: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// What a login attempt produced.
pub enum LoginOutcome {
    /// Credentials accepted; a fresh session exists.
    LoggedIn(SessionUser),
    /// Form rejected; re-render with these errors.
    Invalid(FormErrors),
}

/// The rejection never says whether the username or the password was the
/// problem.
fn failed() -> LoginOutcome {
    let mut errors = FormErrors::new();
    errors.add_non_field(FAILED);

    LoginOutcome::Invalid(errors)
}

#[::tracing::instrument(skip(db, cache, hasher, config, form), fields(username = %form.username()))]
pub async fn login(
    db: &DatabaseConnection,
    cache: &SessionCache,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    form: &LoginForm,
) -> Result<LoginOutcome, HttpError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(LoginOutcome::Invalid(errors));
    }

    let user = match users::Model::find_by_username(db, form.username()).await {
        Some(user) => user,
        None => {
            metrics::counter!("login_failures_total").increment(1);
            ::tracing::info!("login rejected: unknown username");

            return Ok(failed());
        }
    };

    let verified = match hasher.verify(&form.password, &user.password) {
        Ok(verified) => verified,
        Err(e) => {
            ::tracing::error!("Failed to verify stored password hash");
            ::tracing::error!("Error: {}", e);

            false
        }
    };

    if !verified {
        metrics::counter!("login_failures_total").increment(1);
        ::tracing::info!("login rejected: wrong password");

        return Ok(failed());
    }

    // Hashes minted under older parameters get upgraded in place while
    // the plaintext is at hand.
    let user = if hasher.needs_rehash(&user.password).unwrap_or(false) {
        let upgraded = hasher
            .hash(&form.password)
            .map_err(|e| HttpError::PasswordHash(e.to_string()))?;

        user.update_password(db, upgraded).await?
    } else {
        user
    };

    let user = user.record_login(db).await?;
    let session = user.start_session(db, config.session.lifetime).await?;

    let session_user = SessionUser {
        session_id: session.id,
        user,
    };

    cache.set(session.id, &session_user).await;

    metrics::counter!("logins_total").increment(1);
    ::tracing::info!(user_id = %session_user.user.id, "login successful");

    Ok(LoginOutcome::LoggedIn(session_user))
}

/// Where to send the user after login. Only site-local paths are honored;
/// anything that could leave the site falls back to the home page.
pub fn safe_next(next: &str) -> &str {
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(|c| c.is_control());

    if local { next } else { paths::HOME }
}

use sea_orm::DatabaseConnection;
use sea_orm::prelude::Uuid;

use crate::config::AuthConfig;
use crate::entities::users;
use crate::errors::HttpError;
use crate::forms::FormErrors;
use crate::forms::signup::SignUpForm;
use crate::middlewares::auth::{SessionCache, SessionUser};
use crate::models::now;
use crate::security::PasswordHasher;

/// What a signup attempt produced.
pub enum SignupOutcome {
    /// Account created and logged in.
    Created(SessionUser),
    /// Form rejected; re-render with these errors.
    Invalid(FormErrors),
}

#[::tracing::instrument(skip(db, cache, hasher, config, form), fields(username = %form.username()))]
pub async fn signup(
    db: &DatabaseConnection,
    cache: &SessionCache,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    form: &SignUpForm,
) -> Result<SignupOutcome, HttpError> {
    let mut errors = form.validate(&config.password);

    let username = form.username();

    // Uniqueness only matters once the field itself is valid.
    if errors.field("username").is_empty() && users::Model::username_exists(db, &username).await {
        errors.add("username", "A user with that username already exists.");
    }

    if !errors.is_empty() {
        return Ok(SignupOutcome::Invalid(errors));
    }

    let password = hasher
        .hash(&form.password1)
        .map_err(|e| HttpError::PasswordHash(e.to_string()))?;

    let user = users::Model {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: form.email().to_string(),
        password,
        last_login: None,
        created_at: now(),
        updated_at: now(),
    };

    let user = user.store(db).await?;
    let user = user.record_login(db).await?;
    let session = user.start_session(db, config.session.lifetime).await?;

    let session_user = SessionUser {
        session_id: session.id,
        user,
    };

    cache.set(session.id, &session_user).await;

    metrics::counter!("signups_total").increment(1);
    ::tracing::info!(user_id = %session_user.user.id, "account created");

    Ok(SignupOutcome::Created(session_user))
}

use sea_orm::DatabaseConnection;
use sea_orm::prelude::Uuid;

use crate::config::AuthConfig;
use crate::entities::sessions;
use crate::errors::HttpError;
use crate::forms::FormErrors;
use crate::forms::password_change::PasswordChangeForm;
use crate::middlewares::auth::{SessionCache, SessionUser};
use crate::security::PasswordHasher;

const WRONG_OLD: &str = "Your old password was entered incorrectly. Please enter it again.";

/// What a password change attempt produced.
pub enum PasswordChangeOutcome {
    /// Password updated; other sessions are gone.
    Changed,
    /// Form rejected; re-render with these errors.
    Invalid(FormErrors),
}

#[::tracing::instrument(skip(db, cache, hasher, config, current, form), fields(user_id = %current.user.id))]
pub async fn change_password(
    db: &DatabaseConnection,
    cache: &SessionCache,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    current: &SessionUser,
    form: &PasswordChangeForm,
) -> Result<PasswordChangeOutcome, HttpError> {
    let mut errors = form.validate(&config.password);

    // The old password is only checked against the stored hash once it
    // was filled in at all.
    if errors.field("old_password").is_empty() {
        let verified = match hasher.verify(&form.old_password, &current.user.password) {
            Ok(verified) => verified,
            Err(e) => {
                ::tracing::error!("Failed to verify stored password hash");
                ::tracing::error!("Error: {}", e);

                false
            }
        };

        if !verified {
            errors.add("old_password", WRONG_OLD);
        }
    }

    if !errors.is_empty() {
        return Ok(PasswordChangeOutcome::Invalid(errors));
    }

    let hash = hasher
        .hash(&form.new_password1)
        .map_err(|e| HttpError::PasswordHash(e.to_string()))?;

    let user = current.user.update_password(db, hash).await?;

    // Every other session dies with the old password; the one doing the
    // change keeps working.
    let other_ids: Vec<Uuid> = sessions::Model::ids_for_user(db, user.id)
        .await?
        .into_iter()
        .filter(|id| *id != current.session_id)
        .collect();

    let revoked = sessions::Model::revoke_others(db, user.id, current.session_id).await?;

    for id in other_ids {
        cache.remove(id).await;
    }

    let refreshed = SessionUser {
        session_id: current.session_id,
        user,
    };
    cache.set(current.session_id, &refreshed).await;

    metrics::counter!("password_changes_total").increment(1);
    ::tracing::info!(revoked, "password changed");

    Ok(PasswordChangeOutcome::Changed)
}

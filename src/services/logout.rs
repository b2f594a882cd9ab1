use sea_orm::DatabaseConnection;
use sea_orm::prelude::Uuid;

use crate::entities::sessions;
use crate::errors::HttpError;
use crate::middlewares::auth::SessionCache;

/// End one session: drop the row and evict the cache entry. Calling it
/// with an id that no longer exists is fine.
#[::tracing::instrument(skip(db, cache), fields(session_id = %session_id))]
pub async fn logout(
    db: &DatabaseConnection,
    cache: &SessionCache,
    session_id: Uuid,
) -> Result<(), HttpError> {
    sessions::Model::delete(db, session_id).await?;
    cache.remove(session_id).await;

    metrics::counter!("logouts_total").increment(1);
    ::tracing::info!("session ended");

    Ok(())
}

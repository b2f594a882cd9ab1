use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Open a connection pool described by the database config.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);

    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(config.log_queries);

    Database::connect(options).await
}

/// Open a process-private in-memory SQLite database.
///
/// SQLite gives every connection its own `:memory:` database, so the
/// pool is pinned to a single connection.
pub async fn memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");

    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(options).await
}

#![deny(warnings)]

use std::io::Error;
use std::time::Duration;

use actix_web::middleware::Condition;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use hearth_accounts_migration::{Migrator, MigratorTrait};

use hearth_accounts::config;
use hearth_accounts::entities::sessions;
use hearth_accounts::metrics::{AppMetrics, MetricsMiddleware};
use hearth_accounts::middlewares::auth::SessionCache;
use hearth_accounts::security::{PasswordHasher, SecurityHeadersMiddleware};
use hearth_accounts::{database, observability, router};

#[actix::main]
async fn main() -> Result<(), Error> {
    let config = config::load_config().map_err(Error::other)?;

    observability::init(&config.observability);

    tracing::info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        "starting"
    );

    let db = database::connect(&config.database)
        .await
        .map_err(Error::other)?;

    if config.database.run_migrations {
        Migrator::up(&db, None).await.map_err(Error::other)?;
    }

    let removed = sessions::Model::delete_expired(&db)
        .await
        .map_err(Error::other)?;
    if removed > 0 {
        tracing::info!(removed, "expired sessions swept");
    }

    // Periodic sweep keeps the sessions table from accumulating rows for
    // cookies nobody will present again.
    let sweeper = db.clone();
    let interval = config.auth.session.cleanup_interval;
    actix::spawn(async move {
        loop {
            actix::clock::sleep(Duration::from_secs(interval)).await;

            match sessions::Model::delete_expired(&sweeper).await {
                Ok(removed) if removed > 0 => {
                    tracing::info!(removed, "expired sessions swept");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Failed to sweep expired sessions");
                    tracing::error!("Error: {}", e);
                }
            }
        }
    });

    let metrics = AppMetrics::with_config(Some(&config));
    let cache = SessionCache::from_config(&config);
    let hasher = PasswordHasher::from_config(&config.auth).map_err(Error::other)?;

    let address = config.server.address();
    let workers = match config.server.workers {
        0 => num_cpus::get(),
        workers => workers,
    };
    let shutdown_timeout = config.app.shutdown_timeout;
    let headers_config = config.security.headers.clone();
    let collect_http_metrics = config.metrics.enabled;

    let db = Data::new(db);
    let cache = Data::new(cache);
    let hasher = Data::new(hasher);
    let metrics_data = Data::new(metrics.clone());
    let app_config = Data::new(config);

    tracing::info!(host = %address.0, port = address.1, workers, "listening");

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(app_config.clone())
            .app_data(cache.clone())
            .app_data(hasher.clone())
            .app_data(metrics_data.clone())
            .wrap(SecurityHeadersMiddleware::new(headers_config.clone()))
            .wrap(Condition::new(
                collect_http_metrics,
                MetricsMiddleware::new(metrics.clone()),
            ))
            .configure(router::route)
    })
    .bind(address)?
    .workers(workers)
    .shutdown_timeout(shutdown_timeout)
    .run()
    .await
}

#![deny(warnings)]

// Re-export all public modules
pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod entities;
pub mod errors;
pub mod forms;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod observability;
pub mod router;
pub mod security;
pub mod services;
pub mod templates;

// Testing utilities (always available for integration tests)
pub mod testing;

// Re-export commonly used types for convenience
pub use cache::{Cache, CacheKey, CacheStats, LocalCache};
pub use errors::HttpError;
pub use metrics::{AppMetrics, MetricsMiddleware};
pub use middlewares::auth::{CurrentUser, MaybeUser, SessionCache, SessionUser};
pub use security::{PasswordHasher, SecurityHeadersMiddleware};

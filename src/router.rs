use actix_web::web::ServiceConfig;

use crate::controllers;

/// Canonical paths for links and redirects. The controller route macros
/// carry the same strings as literals.
pub mod paths {
    pub const HOME: &str = "/";
    pub const SIGNUP: &str = "/signup";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";
    pub const PASSWORD_CHANGE: &str = "/password/change";
    pub const PASSWORD_CHANGE_DONE: &str = "/password/change/done";
    pub const HEALTH: &str = "/health";
    pub const HEALTH_DB: &str = "/health/db";
    pub const METRICS: &str = "/metrics";
}

/// Route table. `Data` registration happens in `main` and in the test
/// harness because all of it depends on loaded config.
pub fn route(app: &mut ServiceConfig) {
    app.service(controllers::home::index);

    // Accounts
    app.service(controllers::accounts::signup_form);
    app.service(controllers::accounts::signup);
    app.service(controllers::accounts::login_form);
    app.service(controllers::accounts::login);
    app.service(controllers::accounts::logout);
    app.service(controllers::accounts::password_change_form);
    app.service(controllers::accounts::password_change);
    app.service(controllers::accounts::password_change_done);

    // Health check endpoints
    app.service(controllers::health::health);
    app.service(controllers::health::health_db);

    // Metrics endpoint
    app.service(controllers::metrics::metrics);
}

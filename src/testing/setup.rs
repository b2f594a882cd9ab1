use hearth_accounts_migration::MigratorTrait;
use sea_orm::{DatabaseConnection, DbErr};

use crate::config::AppConfig;
use crate::database;
use crate::entities::users;
use crate::models::now;
use crate::security::PasswordHasher;

/// Returns the configuration the test suite runs with
///
/// CSRF enforcement is off, matching how a browserless test client
/// drives the forms without fetching a token first. The security tests
/// opt back in through [`config_with_csrf`]. Argon2 runs with reduced
/// parameters so hashing does not dominate the suite.
///
/// # Example
/// ```no_run
/// use hearth_accounts::testing::setup;
///
/// let config = setup::config();
/// assert!(!config.auth.csrf.enforce);
/// ```
pub fn config() -> AppConfig {
    let mut config = AppConfig::default();

    config.auth.csrf.enforce = false;
    config.auth.argon2.memory_cost = 19456; // 19 MB (reduced from 64 MB)
    config.auth.argon2.time_cost = 1; // 1 iteration (reduced from 3)
    config.auth.argon2.parallelism = 1; // 1 thread (reduced from 4)

    config
}

/// Same as [`config`] but with CSRF enforcement turned on
pub fn config_with_csrf() -> AppConfig {
    let mut config = config();
    config.auth.csrf.enforce = true;

    config
}

/// Returns an in-memory SQLite database with all migrations applied
///
/// This creates a fresh database connection for each test, ensuring test
/// isolation.
///
/// # Panics
/// Panics if database connection fails or migrations fail to apply.
/// This is intentional for test setup - tests should fail fast if setup
/// is broken.
///
/// # Example
/// ```no_run
/// use hearth_accounts::testing::setup;
///
/// #[tokio::test]
/// async fn test_something() {
///     let db = setup::database().await;
///     // Use db for testing
/// }
/// ```
pub async fn database() -> DatabaseConnection {
    let db = database::memory()
        .await
        .expect("Failed to connect to in-memory database");

    hearth_accounts_migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Returns a PasswordHasher configured with fast parameters for testing
///
/// Uses the reduced Argon2 parameters from [`config`]. Hashes produced
/// by the app under the same config verify against this hasher and vice
/// versa, since the parameters travel inside the PHC string.
pub fn password_hasher() -> Result<PasswordHasher, argon2::password_hash::Error> {
    PasswordHasher::from_config(&config().auth)
}

/// Create a user with a known username and password
///
/// The email is derived from the username. Most view tests want the
/// fixture account `john` with password `old_password`.
///
/// # Example
/// ```no_run
/// use hearth_accounts::testing::setup;
///
/// #[tokio::test]
/// async fn test_login() {
///     let db = setup::database().await;
///     let hasher = setup::password_hasher().unwrap();
///     let user = setup::create_user(&db, &hasher, "john", "old_password")
///         .await
///         .unwrap();
///     assert_eq!(user.email, "john@doe.com");
/// }
/// ```
pub async fn create_user(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<users::Model, DbErr> {
    let hash = hasher.hash(password).expect("Failed to hash password");

    let user = users::Model {
        id: sea_orm::prelude::Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@doe.com", username),
        password: hash,
        last_login: None,
        created_at: now(),
        updated_at: now(),
    };

    user.store(db).await
}

/// Helper to create a test user with random username/email
///
/// Creates a unique user with randomly generated credentials to avoid
/// conflicts when a test needs several accounts. The password is always
/// "password".
pub async fn create_test_user(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
) -> Result<users::Model, DbErr> {
    use rand::Rng;

    let random_suffix: u32 = rand::thread_rng().r#gen();
    let username = format!("test_user_{}", random_suffix);

    create_user(db, hasher, &username, "password").await
}

/// Build the full application service for a test, mirroring the wiring
/// in `main`: database, config, session cache, password hasher and
/// metrics handle, plus the route table.
///
/// Expands to `(service, db)`. Pass a config expression to override the
/// default test config, e.g. `service!(setup::config_with_csrf())`.
#[macro_export]
macro_rules! service {
    () => {
        $crate::service!($crate::testing::setup::config())
    };
    ($config:expr) => {{
        let config = $config;
        let db = $crate::testing::setup::database().await;
        let cache = $crate::middlewares::auth::SessionCache::from_config(&config);
        let hasher = $crate::security::PasswordHasher::from_config(&config.auth)
            .expect("Failed to build password hasher");

        let app = ::actix_web::App::new()
            .app_data(::actix_web::web::Data::new(db.clone()))
            .app_data(::actix_web::web::Data::new(config))
            .app_data(::actix_web::web::Data::new(cache))
            .app_data(::actix_web::web::Data::new(hasher))
            .app_data(::actix_web::web::Data::new(
                $crate::metrics::AppMetrics::new(),
            ))
            .configure($crate::router::route);

        let service = ::actix_web::test::init_service(app).await;

        (service, db)
    }};
}

/// Log in through the real endpoint and hand back the session cookie.
///
/// Asserts the 302 and the presence of the `sessionid` cookie, so a
/// broken login fails loudly at the call site.
#[macro_export]
macro_rules! login {
    ($service:expr, $username:expr, $password:expr) => {{
        let req = ::actix_web::test::TestRequest::post()
            .uri("/login")
            .set_form([("username", $username), ("password", $password)])
            .to_request();

        let resp = ::actix_web::test::call_service($service, req).await;
        assert_eq!(resp.status(), ::actix_web::http::StatusCode::FOUND);

        resp.response()
            .cookies()
            .find(|cookie| cookie.name() == "sessionid")
            .map(|cookie| cookie.into_owned())
            .expect("login response must set the session cookie")
    }};
}

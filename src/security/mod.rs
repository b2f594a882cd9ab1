pub mod csrf;
pub mod headers;
pub mod password;

pub use headers::SecurityHeadersMiddleware;
pub use password::PasswordHasher;

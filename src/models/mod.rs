pub mod session;
pub mod user;

use sea_orm::prelude::DateTimeUtc;

pub(crate) fn now() -> DateTimeUtc {
    chrono::Utc::now()
}

mod cache;
mod extractor;

pub use cache::SessionCache;
pub use extractor::{CurrentUser, LoginRequired, MaybeUser, SessionUser};

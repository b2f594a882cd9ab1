mod login;
mod logout;
mod password_change;
mod signup;

pub use login::{LoginOutcome, login, safe_next};
pub use logout::logout;
pub use password_change::{PasswordChangeOutcome, change_password};
pub use signup::{SignupOutcome, signup};

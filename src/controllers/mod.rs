pub mod accounts;
pub mod health;
pub mod home;
pub mod metrics;

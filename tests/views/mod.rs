pub mod login_test;

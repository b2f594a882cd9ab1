//! Unit tests module
//!
//! Run with: cargo test --features sqlite unit

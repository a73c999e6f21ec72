//! User profile management.
//!
//! Lookup, partial updates with uniqueness re-checks, and account removal.
//! Signup itself lives in [`crate::auth::AuthManager`]; this module covers
//! everything that happens to an account after it exists.

pub mod manager;

pub use manager::{ProfileUpdate, UserManager};

//! Posts module providing ownership-scoped post management.
//!
//! Every operation is bound to the authenticated owner: users create posts
//! under their own id, list only their own feed, and can delete only posts
//! they own.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{PostError, PostResult};
pub use manager::PostManager;
pub use models::{NewPost, Post};

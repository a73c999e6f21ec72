//! Post data models.

use crate::auth::models::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: UserId,
    pub image_url: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub image_url: String,
    pub content: Option<String>,
}

//! Post manager implementation.

use super::errors::{PostError, PostResult};
use super::models::{NewPost, Post};
use crate::auth::models::UserId;
use crate::db::repository::PostRepository;
use std::sync::Arc;

/// Post manager
#[derive(Clone)]
pub struct PostManager {
    posts: Arc<dyn PostRepository>,
}

impl PostManager {
    /// Create a new post manager
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post owned by the given user
    pub async fn create(&self, user_id: UserId, new_post: NewPost) -> PostResult<Post> {
        let post = self.posts.insert_post(user_id, &new_post).await?;
        tracing::debug!(user_id, post_id = post.id, "post created");
        Ok(post)
    }

    /// List the user's own posts, newest first
    pub async fn list_for_user(&self, user_id: UserId) -> PostResult<Vec<Post>> {
        self.posts.list_by_user(user_id).await
    }

    /// Delete a post the user owns
    ///
    /// # Errors
    ///
    /// * `PostError::PostNotFound` - No such post, or it belongs to another
    ///   user; the two cases are not distinguished
    pub async fn remove(&self, user_id: UserId, post_id: i64) -> PostResult<()> {
        if self.posts.delete_owned(user_id, post_id).await? {
            tracing::debug!(user_id, post_id, "post deleted");
            Ok(())
        } else {
            Err(PostError::PostNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MockPostRepository;

    fn manager() -> PostManager {
        PostManager::new(Arc::new(MockPostRepository::new()))
    }

    fn new_post(image_url: &str) -> NewPost {
        NewPost {
            image_url: image_url.to_string(),
            content: Some("hello".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_list_returns_own_posts_only() {
        let posts = manager();
        posts.create(1, new_post("https://img/1.jpg")).await.unwrap();
        posts.create(1, new_post("https://img/2.jpg")).await.unwrap();
        posts.create(2, new_post("https://img/3.jpg")).await.unwrap();

        let mine = posts.list_for_user(1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.user_id == 1));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let posts = manager();
        let first = posts.create(1, new_post("https://img/1.jpg")).await.unwrap();
        let second = posts.create(1, new_post("https://img/2.jpg")).await.unwrap();

        let mine = posts.list_for_user(1).await.unwrap();
        assert_eq!(mine[0].id, second.id);
        assert_eq!(mine[1].id, first.id);
    }

    #[tokio::test]
    async fn remove_is_ownership_scoped() {
        let posts = manager();
        let post = posts.create(1, new_post("https://img/1.jpg")).await.unwrap();

        let err = posts.remove(2, post.id).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));

        posts.remove(1, post.id).await.unwrap();
        assert!(posts.list_for_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_missing_post_fails() {
        let posts = manager();
        let err = posts.remove(1, 999).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
    }
}

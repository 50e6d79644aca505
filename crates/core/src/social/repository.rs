//! Persistence seams implemented by the db crate.

use agora_shared::AppError;
use agora_shared::types::PageRequest;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::types::{NewPost, NewUser, Post, User};

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write.
    #[error("duplicate value for {0}")]
    Conflict(String),

    /// A row the operation depends on does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Missing ID.
        id: Uuid,
    },

    /// Any other storage failure.
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::Conflict(err.to_string()),
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Database(msg) => Self::Database(msg),
        }
    }
}

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Checks if an email is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Loads every user in `ids` that exists, in no particular order.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError>;

    /// Flips whether `user_id` follows `target_id`, updating both sides
    /// together. Returns `true` when `user_id` now follows `target_id`.
    async fn toggle_follow(&self, user_id: Uuid, target_id: Uuid)
    -> Result<bool, RepositoryError>;
}

/// Post persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a post with no likes.
    async fn insert(&self, post: NewPost) -> Result<Post, RepositoryError>;

    /// All posts, newest first.
    async fn list(&self, page: Option<PageRequest>) -> Result<Vec<Post>, RepositoryError>;

    /// Posts by one author, newest first.
    async fn list_by_author(
        &self,
        user_id: Uuid,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepositoryError>;

    /// Adds or removes `user_id` from the post's likes in one atomic step.
    /// Returns `None` when the post does not exist.
    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Post>, RepositoryError>;
}

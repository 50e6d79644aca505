//! Social domain errors.

use agora_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::repository::RepositoryError;
use crate::storage::StorageError;

/// Errors from post and user operations.
#[derive(Debug, Error)]
pub enum SocialError {
    /// No such user.
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// No such post.
    #[error("post {0} not found")]
    PostNotFound(Uuid),

    /// A user tried to follow themselves.
    #[error("users cannot follow themselves")]
    SelfFollow,

    /// Neither text nor picture was supplied.
    #[error("a post needs a description or a picture")]
    EmptyPost,

    /// Other malformed input.
    #[error("{0}")]
    Validation(String),

    /// Acting on another user's behalf.
    #[error("{0}")]
    Forbidden(String),

    /// Image relay failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SocialError> for AppError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::UserNotFound(_) | SocialError::PostNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SocialError::SelfFollow | SocialError::EmptyPost | SocialError::Validation(_) => {
                Self::Validation(err.to_string())
            }
            SocialError::Forbidden(msg) => Self::Forbidden(msg),
            SocialError::Storage(e) => e.into(),
            SocialError::Repository(e) => e.into(),
        }
    }
}

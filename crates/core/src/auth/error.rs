//! Credential service errors.

use agora_shared::{AppError, JwtError};
use thiserror::Error;

use super::password::PasswordError;
use crate::social::RepositoryError;
use crate::storage::StorageError;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Email already registered.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// No account for the given email.
    #[error("user does not exist")]
    UserNotFound,

    /// Password did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Hashing failure.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failure.
    #[error(transparent)]
    Token(#[from] JwtError),

    /// Picture upload failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Persistence failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::EmailTaken => Self::Conflict(err.to_string()),
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Password(e) => Self::Internal(e.to_string()),
            AuthError::Token(e) => Self::Internal(e.to_string()),
            AuthError::Storage(e) => e.into(),
            AuthError::Repository(e) => e.into(),
        }
    }
}

//! Repository abstractions for data access.
//!
//! Repositories implement the core persistence traits on top of `SeaORM`,
//! hiding the query details from the rest of the application.

pub mod post;
pub mod user;

pub use post::PostRepository;
pub use user::UserRepository;

use agora_core::social::RepositoryError;
use sea_orm::{DbErr, SqlErr};

/// Maps a `SeaORM` error onto the core repository error.
///
/// Unique violations become `Conflict`; everything else is a database error.
pub(crate) fn repository_error(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::Conflict(detail),
        _ => RepositoryError::database(err.to_string()),
    }
}

//! Authentication: password hashing and the credential service.
//!
//! This module provides:
//! - Password hashing with Argon2id at a configurable work factor
//! - Registration with optional profile picture upload
//! - Login returning a signed session token

mod credentials;
mod error;
mod password;

#[cfg(test)]
mod credentials_tests;

pub use credentials::{CredentialService, LoginOutcome, RegisterInput, normalize_email};
pub use error::AuthError;
pub use password::{PasswordError, PasswordHasher};

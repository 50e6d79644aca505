//! Shared types, errors, and configuration for Agora.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration
//! - Application-wide error taxonomy
//! - JWT claims and the token service
//! - Auth request/response payloads
//! - Pagination types for list endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};

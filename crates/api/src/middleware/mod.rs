//! Request middleware.

pub mod auth;
pub mod security;

pub use auth::{AuthRejection, AuthUser, auth_middleware, authorize};

//! Core domain logic for Agora.
//!
//! This crate contains the domain with ZERO web or database dependencies.
//! Persistence is reached through the repository traits in [`social`],
//! which the db crate implements.
//!
//! # Modules
//!
//! - `auth` - Password hashing and the credential service
//! - `health` - Dependency checks for the health endpoint
//! - `storage` - Image relay to object storage
//! - `social` - Users, posts, likes, and the follow graph

pub mod auth;
pub mod health;
pub mod social;
pub mod storage;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for accounts, posts, and the follow graph
//! - Authentication and security header middleware
//! - Request extractors
//! - The JSON error envelope

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use agora_core::auth::{CredentialService, PasswordHasher};
use agora_core::health::HealthCheck;
use agora_core::social::{PostRepository, PostService, UserRepository, UserService};
use agora_core::storage::ImageStore;
use agora_shared::{AppConfig, JwtService};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Registration and login.
    pub credentials: CredentialService,
    /// Posts, feeds, and likes.
    pub posts: PostService,
    /// Profiles and follows.
    pub users: UserService,
    /// Dependencies reported by `/health`.
    pub health_checks: Arc<[Arc<dyn HealthCheck>]>,
}

impl AppState {
    /// Wires the services from their dependencies.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        jwt_service: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            credentials: CredentialService::new(
                users.clone(),
                images.clone(),
                hasher,
                jwt_service.clone(),
            ),
            posts: PostService::new(posts, users.clone(), images),
            users: UserService::new(users),
            jwt_service,
            health_checks: Vec::new().into(),
        }
    }

    /// Registers the dependencies `/health` should check.
    #[must_use]
    pub fn with_health_checks(mut self, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        self.health_checks = checks.into();
        self
    }
}

/// HTTP-level settings for [`create_router`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory served under `/assets`, if any.
    pub assets_dir: Option<PathBuf>,
    /// Largest accepted request body.
    pub body_limit_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            assets_dir: None,
            body_limit_bytes: 30 * 1024 * 1024,
        }
    }
}

impl RouterOptions {
    /// Reads the options from application config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            assets_dir: Some(config.assets.dir.clone()),
            body_limit_bytes: config.http.body_limit_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    let mut router = routes::api_routes_with_state(state.clone());
    if let Some(dir) = &options.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    let router = router
        .layer(DefaultBodyLimit::max(options.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    middleware::security::with_security_headers(router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

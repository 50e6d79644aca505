//! Authentication middleware for protected routes.

use agora_shared::{Claims, JwtError, JwtService};
use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

/// Why a request was turned away before reaching its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header.
    MissingToken,
    /// Signature valid, but `exp` has passed.
    TokenExpired,
    /// Bad signature or malformed token.
    InvalidToken,
}

impl AuthRejection {
    /// Machine-readable code sent in the `error` field.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::TokenExpired => "token_expired",
            Self::InvalidToken => "invalid_token",
        }
    }

    /// Human-readable explanation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Authorization header with Bearer token is required",
            Self::TokenExpired => "Token has expired",
            Self::InvalidToken => "Invalid or malformed token",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": self.code(),
                "message": self.message()
            })),
        )
            .into_response()
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Checks the request headers for a valid session token.
///
/// # Errors
///
/// Returns the rejection to send when the token is missing, expired, or invalid.
pub fn authorize(jwt: &JwtService, headers: &HeaderMap) -> Result<Claims, AuthRejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or(AuthRejection::MissingToken)?;

    jwt.validate_token(token).map_err(|e| match e {
        JwtError::Expired => AuthRejection::TokenExpired,
        other => {
            debug!(error = %other, "Rejected session token");
            AuthRejection::InvalidToken
        }
    })
}

/// Authentication middleware that validates JWT tokens.
///
/// On success the claims are stored in request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&state.jwt_service, request.headers()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

/// Extractor for authenticated user claims.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthRejection::MissingToken)
    }
}

//! Registration and login.

use agora_core::auth::RegisterInput;
use agora_core::social::PublicUser;
use agora_shared::auth::{LoginRequest, LoginResponse};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, MultipartForm},
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Create an account from a multipart form.
async fn register(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let input = RegisterInput {
        first_name: form.take_text("first_name"),
        last_name: form.take_text("last_name"),
        email: form.take_text("email"),
        password: form.take_text("password"),
        location: form.take_text("location"),
        occupation: form.take_text("occupation"),
    };

    let user = state
        .credentials
        .register(input, form.take_picture())
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login - Exchange credentials for a session token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse<PublicUser>>, ApiError> {
    let outcome = state
        .credentials
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        expires_in: outcome.expires_in,
        user: outcome.user,
    }))
}

//! User routes: profiles and the follow graph.

use agora_core::social::{FriendSummary, PublicUser};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::ApiPath, middleware::AuthUser};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/following", get(following))
        .route("/users/{id}/followers", get(followers))
        .route("/users/{id}/{friend_id}", patch(toggle_follow))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(state.users.get_user(id).await?))
}

/// GET /users/{id}/following
async fn following(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    Ok(Json(state.users.following(id).await?))
}

/// GET /users/{id}/followers
async fn followers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    Ok(Json(state.users.followers(id).await?))
}

/// PATCH /users/{id}/{friend_id} - Follow or unfollow `friend_id`.
async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((id, friend_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    let following = state
        .users
        .update_follow(auth.user_id(), id, friend_id)
        .await?;
    Ok(Json(following))
}

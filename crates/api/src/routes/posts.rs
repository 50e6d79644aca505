//! Post routes: create, feeds, and likes.

use agora_core::social::Post;
use agora_shared::types::PageQuery;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiPath, ApiQuery, MultipartForm},
    middleware::AuthUser,
};

/// Creates the post routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(feed).post(create_post))
        .route("/posts/{id}", get(user_posts))
        .route("/posts/{id}/like", patch(like_post))
}

/// POST /posts - Publish a post as the authenticated user.
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let description = form.take_text("description");

    let post = state
        .posts
        .create_post(auth.user_id(), &description, form.take_picture())
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts - Every post, newest first.
async fn feed(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.feed(page.resolve()).await?))
}

/// GET /posts/{id} - Posts by user `id`.
async fn user_posts(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.user_posts(user_id, page.resolve()).await?))
}

/// PATCH /posts/{id}/like - Toggle the caller's like.
async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.like_post(post_id, auth.user_id()).await?))
}

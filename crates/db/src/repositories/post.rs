//! Post repository for database operations.
//!
//! Likes live in a JSONB object on the post row, keyed by user ID, so a like
//! toggle is a single `UPDATE` that cannot lose concurrent writes.

use std::collections::BTreeMap;

use agora_core::social::{NewPost, Post, PostRepository as PostRepoTrait, RepositoryError};
use agora_shared::types::PageRequest;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, Statement,
};
use uuid::Uuid;

use super::repository_error;
use crate::entities::posts;

const TOGGLE_LIKE_SQL: &str = r"
UPDATE posts
SET likes = CASE
        WHEN jsonb_exists(likes, $1::text) THEN likes - $1::text
        ELSE likes || jsonb_build_object($1::text, true)
    END,
    updated_at = now()
WHERE id = $2::uuid
RETURNING *
";

/// Post repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    /// Creates a new post repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn newest_first(
        &self,
        query: Select<posts::Entity>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepositoryError> {
        let mut query = query
            .order_by_desc(posts::Column::CreatedAt)
            .order_by_desc(posts::Column::Id);
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.limit());
        }

        query
            .all(&self.db)
            .await
            .map_err(repository_error)?
            .into_iter()
            .map(to_post)
            .collect()
    }
}

#[async_trait]
impl PostRepoTrait for PostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepositoryError> {
        let now = Utc::now().into();
        let model = posts::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(post.user_id),
            first_name: Set(post.first_name),
            last_name: Set(post.last_name),
            location: Set(post.location),
            description: Set(post.description),
            picture_url: Set(post.picture_url),
            user_picture_url: Set(post.user_picture_url),
            likes: Set(serde_json::json!({})),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await.map_err(repository_error)?;
        to_post(model)
    }

    async fn list(&self, page: Option<PageRequest>) -> Result<Vec<Post>, RepositoryError> {
        self.newest_first(posts::Entity::find(), page).await
    }

    async fn list_by_author(
        &self,
        user_id: Uuid,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepositoryError> {
        let query = posts::Entity::find().filter(posts::Column::UserId.eq(user_id));
        self.newest_first(query, page).await
    }

    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Post>, RepositoryError> {
        posts::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                TOGGLE_LIKE_SQL,
                [user_id.to_string().into(), post_id.into()],
            ))
            .one(&self.db)
            .await
            .map_err(repository_error)?
            .map(to_post)
            .transpose()
    }
}

fn to_post(model: posts::Model) -> Result<Post, RepositoryError> {
    let likes: BTreeMap<Uuid, bool> = serde_json::from_value(model.likes).map_err(|e| {
        RepositoryError::database(format!("malformed likes on post {}: {e}", model.id))
    })?;

    Ok(Post {
        id: model.id,
        user_id: model.user_id,
        first_name: model.first_name,
        last_name: model.last_name,
        location: model.location,
        description: model.description,
        picture_url: model.picture_url,
        user_picture_url: model.user_picture_url,
        likes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(likes: serde_json::Value) -> posts::Model {
        let now = Utc::now().fixed_offset();
        posts::Model {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            location: "Porto".to_string(),
            description: "hello".to_string(),
            picture_url: None,
            user_picture_url: None,
            likes,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_likes_object_decodes() {
        let fan = Uuid::now_v7();
        let mut likes = serde_json::Map::new();
        likes.insert(fan.to_string(), serde_json::Value::Bool(true));

        let post = to_post(model(serde_json::Value::Object(likes))).expect("valid likes");

        assert!(post.is_liked_by(fan));
        assert_eq!(post.like_count(), 1);
    }

    #[test]
    fn test_empty_likes_decode() {
        let post = to_post(model(serde_json::json!({}))).expect("valid likes");
        assert_eq!(post.like_count(), 0);
    }

    #[test]
    fn test_malformed_likes_rejected() {
        let result = to_post(model(serde_json::json!({ "not-a-uuid": true })));
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}

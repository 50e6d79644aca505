//! User repository for database operations.

use agora_core::social::{NewUser, RepositoryError, User, UserRepository as UserRepoTrait};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::repository_error;
use crate::entities::users;

/// Flips `$2` in the follower's list and reports the new state.
const TOGGLE_FOLLOWING_SQL: &str = r"
UPDATE users
SET following = CASE
        WHEN $2::uuid = ANY(following) THEN array_remove(following, $2::uuid)
        ELSE array_append(following, $2::uuid)
    END,
    updated_at = now()
WHERE id = $1::uuid
RETURNING ($2::uuid = ANY(following)) AS now_following
";

/// Brings the target's follower list in line with the follower's new state.
const SYNC_FOLLOWERS_SQL: &str = r"
UPDATE users
SET followers = CASE
        WHEN $3::boolean THEN array_append(array_remove(followers, $1::uuid), $1::uuid)
        ELSE array_remove(followers, $1::uuid)
    END,
    updated_at = now()
WHERE id = $2::uuid
";

#[derive(Debug, FromQueryResult)]
struct FollowState {
    now_following: bool,
}

/// User repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepoTrait for UserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now().into();
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            location: Set(user.location),
            occupation: Set(user.occupation),
            picture_url: Set(user.picture_url),
            following: Set(Vec::new()),
            followers: Set(Vec::new()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await.map_err(repository_error)?;
        Ok(to_user(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repository_error)?;
        Ok(model.map(to_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repository_error)?;
        Ok(model.map(to_user))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(repository_error)?;

        Ok(count > 0)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repository_error)?;
        Ok(models.into_iter().map(to_user).collect())
    }

    async fn toggle_follow(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await.map_err(repository_error)?;

        // Lock both rows in ID order so opposite toggles cannot deadlock.
        let locked: Vec<Uuid> = users::Entity::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::Id.is_in([user_id, target_id]))
            .order_by_asc(users::Column::Id)
            .lock_exclusive()
            .into_tuple()
            .all(&txn)
            .await
            .map_err(repository_error)?;

        if let Some(missing) = [user_id, target_id]
            .into_iter()
            .find(|id| !locked.contains(id))
        {
            return Err(RepositoryError::NotFound {
                entity: "user",
                id: missing,
            });
        }

        let state = FollowState::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            TOGGLE_FOLLOWING_SQL,
            [user_id.into(), target_id.into()],
        ))
        .one(&txn)
        .await
        .map_err(repository_error)?
        .ok_or(RepositoryError::NotFound {
            entity: "user",
            id: user_id,
        })?;

        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            SYNC_FOLLOWERS_SQL,
            [user_id.into(), target_id.into(), state.now_following.into()],
        ))
        .await
        .map_err(repository_error)?;

        txn.commit().await.map_err(repository_error)?;

        debug!(
            user_id = %user_id,
            target_id = %target_id,
            following = state.now_following,
            "Follow state written"
        );
        Ok(state.now_following)
    }
}

fn to_user(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        location: model.location,
        occupation: model.occupation,
        picture_url: model.picture_url,
        following: model.following,
        followers: model.followers,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

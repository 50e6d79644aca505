//! In-memory repositories and stores for tests.
//!
//! Enabled for this crate's tests and for downstream crates through the
//! `test-util` feature.

use std::sync::Mutex;

use agora_shared::types::PageRequest;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::health::HealthCheck;
use crate::social::{NewPost, NewUser, Post, PostRepository, RepositoryError, User, UserRepository};
use crate::storage::{ImageStore, ImageUpload, StorageError};

/// Users held in a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
    follow_lock: Mutex<()>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when no user is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email".to_string()));
        }

        let now = Utc::now();
        let stored = User {
            id: Uuid::now_v7(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            location: user.location,
            occupation: user.occupation,
            picture_url: user.picture_url,
            following: Vec::new(),
            followers: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.users.iter().any(|u| u.email == email))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepositoryError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn toggle_follow(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let _guard = self
            .follow_lock
            .lock()
            .map_err(|_| RepositoryError::database("follow lock poisoned"))?;

        for id in [user_id, target_id] {
            if !self.users.contains_key(&id) {
                return Err(RepositoryError::NotFound { entity: "user", id });
            }
        }

        let now = Utc::now();
        let now_following = {
            let mut user = self
                .users
                .get_mut(&user_id)
                .ok_or(RepositoryError::NotFound {
                    entity: "user",
                    id: user_id,
                })?;
            let following = if let Some(pos) = user.following.iter().position(|id| *id == target_id)
            {
                user.following.remove(pos);
                false
            } else {
                user.following.push(target_id);
                true
            };
            user.updated_at = now;
            following
        };

        let mut target = self
            .users
            .get_mut(&target_id)
            .ok_or(RepositoryError::NotFound {
                entity: "user",
                id: target_id,
            })?;
        target.followers.retain(|id| *id != user_id);
        if now_following {
            target.followers.push(user_id);
        }
        target.updated_at = now;

        Ok(now_following)
    }
}

/// Posts held in a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: DashMap<Uuid, Post>,
}

impl InMemoryPostRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True when no post is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn newest_first(&self, filter: impl Fn(&Post) -> bool, page: Option<PageRequest>) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| filter(p.value()))
            .map(|p| p.clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        match page {
            Some(page) => posts
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
                .collect(),
            None => posts,
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepositoryError> {
        let now = Utc::now();
        let stored = Post {
            id: Uuid::now_v7(),
            user_id: post.user_id,
            first_name: post.first_name,
            last_name: post.last_name,
            location: post.location,
            description: post.description,
            picture_url: post.picture_url,
            user_picture_url: post.user_picture_url,
            likes: std::collections::BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, page: Option<PageRequest>) -> Result<Vec<Post>, RepositoryError> {
        Ok(self.newest_first(|_| true, page))
    }

    async fn list_by_author(
        &self,
        user_id: Uuid,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepositoryError> {
        Ok(self.newest_first(|p| p.user_id == user_id, page))
    }

    async fn toggle_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Post>, RepositoryError> {
        let Some(mut post) = self.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        if post.likes.remove(&user_id).is_none() {
            post.likes.insert(user_id, true);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }
}

/// An image store whose backend is always down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableImageStore;

#[async_trait]
impl ImageStore for UnavailableImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, StorageError> {
        Err(StorageError::operation(format!(
            "connection refused while writing {}",
            image.original_name
        )))
    }
}

#[async_trait]
impl HealthCheck for UnavailableImageStore {
    fn component(&self) -> &'static str {
        "storage"
    }

    async fn check(&self) -> Result<(), String> {
        Err("connection refused".to_string())
    }
}

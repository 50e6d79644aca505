//! Post and user services.

use std::collections::HashMap;
use std::sync::Arc;

use agora_shared::types::PageRequest;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::SocialError;
use super::repository::{PostRepository, UserRepository};
use super::types::{FriendSummary, NewPost, Post, PublicUser};
use crate::storage::{ImageStore, ImageUpload};

/// Longest accepted post body, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 5_000;

/// Post creation, feeds, and likes.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            users,
            images,
        }
    }

    /// Publishes a post for `author_id`.
    ///
    /// The picture, if any, is uploaded before the post is written, so a
    /// failed upload never leaves a post pointing at a missing image.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both description and picture are missing, or the description is too long
    /// - The author does not exist
    /// - The upload or the insert fails
    pub async fn create_post(
        &self,
        author_id: Uuid,
        description: &str,
        picture: Option<ImageUpload>,
    ) -> Result<Post, SocialError> {
        let description = description.trim();
        if description.is_empty() && picture.is_none() {
            return Err(SocialError::EmptyPost);
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(SocialError::Validation(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(SocialError::UserNotFound(author_id))?;

        let picture_url = match picture {
            Some(image) => Some(self.images.upload(image).await?),
            None => None,
        };

        let post = self
            .posts
            .insert(NewPost::by(&author, description.to_string(), picture_url))
            .await?;

        info!(
            post_id = %post.id,
            user_id = %author_id,
            has_picture = post.picture_url.is_some(),
            "Post created"
        );
        Ok(post)
    }

    /// Every post, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn feed(&self, page: Option<PageRequest>) -> Result<Vec<Post>, SocialError> {
        Ok(self.posts.list(page).await?)
    }

    /// Posts written by `user_id`, newest first. Unknown users have no posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn user_posts(
        &self,
        user_id: Uuid,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, SocialError> {
        Ok(self.posts.list_by_author(user_id, page).await?)
    }

    /// Likes the post for `user_id`, or removes the like if already present.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::PostNotFound` if the post does not exist.
    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid) -> Result<Post, SocialError> {
        let post = self
            .posts
            .toggle_like(post_id, user_id)
            .await?
            .ok_or(SocialError::PostNotFound(post_id))?;

        debug!(
            post_id = %post_id,
            user_id = %user_id,
            liked = post.is_liked_by(user_id),
            likes = post.like_count(),
            "Like toggled"
        );
        Ok(post)
    }
}

/// Profiles and the follow graph.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Loads a profile.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::UserNotFound` if the user does not exist.
    pub async fn get_user(&self, id: Uuid) -> Result<PublicUser, SocialError> {
        self.users
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(SocialError::UserNotFound(id))
    }

    /// Users that `id` follows, in follow order.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::UserNotFound` if the user does not exist.
    pub async fn following(&self, id: Uuid) -> Result<Vec<FriendSummary>, SocialError> {
        let user = self.get_user(id).await?;
        self.summaries(&user.following).await
    }

    /// Users following `id`, in follow order.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::UserNotFound` if the user does not exist.
    pub async fn followers(&self, id: Uuid) -> Result<Vec<FriendSummary>, SocialError> {
        let user = self.get_user(id).await?;
        self.summaries(&user.followers).await
    }

    /// Follows or unfollows `target_id` on behalf of `user_id`.
    ///
    /// `actor_id` is the authenticated caller; it must be `user_id`.
    /// Returns the caller's updated following list.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller acts for someone else
    /// - `user_id == target_id`
    /// - Either user does not exist
    pub async fn update_follow(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        target_id: Uuid,
    ) -> Result<Vec<FriendSummary>, SocialError> {
        if actor_id != user_id {
            return Err(SocialError::Forbidden(
                "cannot change another user's follows".to_string(),
            ));
        }
        if user_id == target_id {
            return Err(SocialError::SelfFollow);
        }

        let now_following = self.users.toggle_follow(user_id, target_id).await?;
        info!(
            user_id = %user_id,
            target_id = %target_id,
            following = now_following,
            "Follow toggled"
        );

        self.following(user_id).await
    }

    async fn summaries(&self, ids: &[Uuid]) -> Result<Vec<FriendSummary>, SocialError> {
        let mut by_id: HashMap<Uuid, _> = self
            .users
            .find_many(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(FriendSummary::from)
            .collect())
    }
}

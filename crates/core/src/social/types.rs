//! Domain records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored account, including its credential hash.
///
/// Never serialized directly; responses go through [`PublicUser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Unique, normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-form location.
    pub location: String,
    /// Free-form occupation.
    pub occupation: String,
    /// Profile picture URL.
    pub picture_url: Option<String>,
    /// Users this user follows.
    pub following: Vec<Uuid>,
    /// Users following this user.
    pub followers: Vec<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique, normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-form location.
    pub location: String,
    /// Free-form occupation.
    pub occupation: String,
    /// Profile picture URL.
    pub picture_url: Option<String>,
}

/// A user as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-form location.
    pub location: String,
    /// Free-form occupation.
    pub occupation: String,
    /// Profile picture URL.
    pub picture_url: Option<String>,
    /// Users this user follows.
    pub following: Vec<Uuid>,
    /// Users following this user.
    pub followers: Vec<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            location: user.location,
            occupation: user.occupation,
            picture_url: user.picture_url,
            following: user.following,
            followers: user.followers,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Short profile used in follower/following lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSummary {
    /// User ID.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-form occupation.
    pub occupation: String,
    /// Free-form location.
    pub location: String,
    /// Profile picture URL.
    pub picture_url: Option<String>,
}

impl From<User> for FriendSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            occupation: user.occupation,
            location: user.location,
            picture_url: user.picture_url,
        }
    }
}

/// A post with a snapshot of its author's profile at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    pub id: Uuid,
    /// Author ID.
    pub user_id: Uuid,
    /// Author given name.
    pub first_name: String,
    /// Author family name.
    pub last_name: String,
    /// Author location.
    pub location: String,
    /// Text body.
    pub description: String,
    /// Attached image URL.
    pub picture_url: Option<String>,
    /// Author profile picture URL.
    pub user_picture_url: Option<String>,
    /// Users who like the post. Presence means liked.
    pub likes: BTreeMap<Uuid, bool>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Number of likes.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether the given user likes the post.
    #[must_use]
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains_key(&user_id)
    }
}

/// Fields needed to insert a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Author ID.
    pub user_id: Uuid,
    /// Author given name.
    pub first_name: String,
    /// Author family name.
    pub last_name: String,
    /// Author location.
    pub location: String,
    /// Text body.
    pub description: String,
    /// Attached image URL.
    pub picture_url: Option<String>,
    /// Author profile picture URL.
    pub user_picture_url: Option<String>,
}

impl NewPost {
    /// Builds a post for `author`, copying the profile snapshot.
    #[must_use]
    pub fn by(author: &User, description: String, picture_url: Option<String>) -> Self {
        Self {
            user_id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            location: author.location.clone(),
            description,
            picture_url,
            user_picture_url: author.picture_url.clone(),
        }
    }
}

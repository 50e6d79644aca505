//! Users, posts, likes, and the follow graph.
//!
//! Services here own the request-level rules (who may do what, upload
//! before insert, not-found handling). Storage is reached through the
//! [`UserRepository`] and [`PostRepository`] traits.

mod error;
mod repository;
mod service;
mod types;


pub use error::SocialError;
pub use repository::{PostRepository, RepositoryError, UserRepository};
pub use service::{MAX_DESCRIPTION_LEN, PostService, UserService};
pub use types::{FriendSummary, NewPost, NewUser, Post, PublicUser, User};

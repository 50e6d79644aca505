//! Registration and login.

use std::sync::Arc;

use agora_shared::JwtService;
use tracing::info;
use validator::Validate;

use super::error::AuthError;
use super::password::PasswordHasher;
use crate::social::{NewUser, PublicUser, RepositoryError, UserRepository};
use crate::storage::{ImageStore, ImageUpload};

/// Profile fields submitted at registration.
#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterInput {
    /// Given name.
    #[validate(length(min = 2, max = 50))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 2, max = 50))]
    pub last_name: String,
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    /// Free-form location.
    #[validate(length(max = 100))]
    pub location: String,
    /// Free-form occupation.
    #[validate(length(max = 100))]
    pub occupation: String,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: PublicUser,
}

/// Canonical form of an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes and checks passwords, and issues session tokens.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
    hasher: PasswordHasher,
    jwt: Arc<JwtService>,
}

impl CredentialService {
    /// Create a new credential service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
        hasher: PasswordHasher,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            images,
            hasher,
            jwt,
        }
    }

    /// Registers a new account.
    ///
    /// Steps run in order and stop at the first failure: validate, check the
    /// email is free, hash, upload the picture, insert. Nothing is written if
    /// the upload fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input is invalid
    /// - The email is already registered
    /// - Hashing, upload, or insert fails
    pub async fn register(
        &self,
        mut input: RegisterInput,
        picture: Option<ImageUpload>,
    ) -> Result<PublicUser, AuthError> {
        input.email = normalize_email(&input.email);
        input.first_name = input.first_name.trim().to_string();
        input.last_name = input.last_name.trim().to_string();
        input
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.users.email_exists(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&input.password)?;

        let picture_url = match picture {
            Some(image) => Some(self.images.upload(image).await?),
            None => None,
        };

        let user = self
            .users
            .insert(NewUser {
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                location: input.location.trim().to_string(),
                occupation: input.occupation.trim().to_string(),
                picture_url,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "New user registered");
        Ok(user.into())
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for an unknown email and
    /// `AuthError::InvalidCredentials` for a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            info!("Login attempt for non-existent user");
            return Err(AuthError::UserNotFound);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(user.id)?;
        info!(user_id = %user.id, "User logged in successfully");

        Ok(LoginOutcome {
            token,
            expires_in: self.jwt.expires_in(),
            user: user.into(),
        })
    }
}

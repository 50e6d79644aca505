//! Registration and login against in-memory storage.

use std::sync::Arc;

use agora_shared::config::PasswordConfig;
use agora_shared::{JwtConfig, JwtService};
use rstest::rstest;

use super::*;
use crate::memory::{InMemoryUserRepository, UnavailableImageStore};
use crate::social::UserRepository;
use crate::storage::{ImageStore, ImageUpload, StorageConfig, StorageProvider, StorageService};

const BUCKET_URL: &str = "https://agora-images.s3.us-east-1.amazonaws.com";

fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::from_config(&PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid params")
}

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(JwtConfig {
        secret: "credential-tests-secret".to_string(),
        expires_in_secs: 3600,
    }))
}

fn service_with(images: Arc<dyn ImageStore>) -> (CredentialService, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let service = CredentialService::new(users.clone(), images, cheap_hasher(), jwt());
    (service, users)
}

fn service() -> (CredentialService, Arc<InMemoryUserRepository>) {
    let config =
        StorageConfig::new(StorageProvider::Memory).with_public_base_url(BUCKET_URL);
    let store = StorageService::from_config(config).expect("memory store");
    service_with(Arc::new(store))
}

fn input(email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        location: "Porto".to_string(),
        occupation: "Designer".to_string(),
    }
}

fn avatar() -> ImageUpload {
    ImageUpload::new(vec![0xff, 0xd8, 0xff, 0xe0], "me.jpg", "image/jpeg")
}

#[tokio::test]
async fn test_register_stores_hash_not_password() {
    let (service, users) = service();

    let user = service
        .register(input("ana@example.com", "p"), None)
        .await
        .expect("register");

    let stored = users
        .find_by_id(user.id)
        .await
        .expect("find")
        .expect("stored user");
    assert_ne!(stored.password_hash, "p");
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_registered_user_json_has_no_hash() {
    let (service, _) = service();

    let user = service
        .register(input("ana@example.com", "secret"), None)
        .await
        .expect("register");

    let json = serde_json::to_value(&user).expect("serialize");
    assert!(json.get("password_hash").is_none());
    assert!(json.get("password").is_none());
    assert_eq!(json["email"], "ana@example.com");
}

#[tokio::test]
async fn test_register_with_picture_returns_bucket_url() {
    let (service, _) = service();

    let user = service
        .register(input("ana@example.com", "secret"), Some(avatar()))
        .await
        .expect("register");

    assert_eq!(
        user.picture_url.as_deref(),
        Some("https://agora-images.s3.us-east-1.amazonaws.com/img/me.jpg")
    );
    assert!(user.following.is_empty());
    assert!(user.followers.is_empty());
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let (service, _) = service();

    let user = service
        .register(input("  Ana@Example.COM ", "secret"), None)
        .await
        .expect("register");

    assert_eq!(user.email, "ana@example.com");
    service
        .login("ANA@example.com", "secret")
        .await
        .expect("login with other casing");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (service, users) = service();
    service
        .register(input("ana@example.com", "secret"), None)
        .await
        .expect("first register");

    let result = service
        .register(input("ANA@example.com", "other"), None)
        .await;

    assert!(matches!(result, Err(AuthError::EmailTaken)));
    assert_eq!(users.len(), 1);
}

#[rstest]
#[case::bad_email(RegisterInput { email: "not-an-email".to_string(), ..input("", "secret") })]
#[case::short_name(RegisterInput { first_name: "A".to_string(), ..input("a@example.com", "secret") })]
#[case::empty_password(input("a@example.com", ""))]
#[tokio::test]
async fn test_invalid_registration_rejected(#[case] bad: RegisterInput) {
    let (service, users) = service();

    let result = service.register(bad, None).await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_failed_upload_persists_no_user() {
    let (service, users) = service_with(Arc::new(UnavailableImageStore));

    let result = service
        .register(input("ana@example.com", "secret"), Some(avatar()))
        .await;

    assert!(matches!(result, Err(AuthError::Storage(_))));
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_rejected_image_persists_no_user() {
    let (service, users) = service();
    let pdf = ImageUpload::new(b"%PDF-1.7".to_vec(), "cv.pdf", "application/pdf");

    let result = service
        .register(input("ana@example.com", "secret"), Some(pdf))
        .await;

    let err = result.expect_err("pdf rejected");
    let app: agora_shared::AppError = err.into();
    assert_eq!(app.status_code(), 400);
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_login_issues_token_for_user() {
    let (service, _) = service();
    let user = service
        .register(input("ana@example.com", "secret"), None)
        .await
        .expect("register");

    let outcome = service
        .login("ana@example.com", "secret")
        .await
        .expect("login");

    assert_eq!(outcome.user.id, user.id);
    assert_eq!(outcome.expires_in, 3600);
    let claims = jwt().validate_token(&outcome.token).expect("valid token");
    assert_eq!(claims.user_id(), user.id);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (service, _) = service();
    service
        .register(input("ana@example.com", "secret"), None)
        .await
        .expect("register");

    let result = service.login("ana@example.com", "Secret").await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let (service, _) = service();

    let result = service.login("nobody@example.com", "secret").await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
}

#[rstest]
#[case(AuthError::EmailTaken, 409)]
#[case(AuthError::UserNotFound, 404)]
#[case(AuthError::InvalidCredentials, 401)]
#[case(AuthError::Validation("bad".to_string()), 400)]
#[case(AuthError::Password(PasswordError::InvalidHash), 500)]
fn test_auth_error_status(#[case] err: AuthError, #[case] status: u16) {
    let app: agora_shared::AppError = err.into();
    assert_eq!(app.status_code(), status);
}

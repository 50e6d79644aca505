//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

fn service_with_lifetime(expires_in_secs: i64) -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        expires_in_secs,
    })
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);
    let before = Utc::now().timestamp();

    let claims = Claims::new(user_id, expires_at);

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.user_id(), user_id);
    assert!(claims.iat >= before);
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_generated_token_round_trips_identity() {
    let service = service_with_lifetime(900);
    let user_id = Uuid::new_v4();

    let token = service.generate_token(user_id).unwrap();
    assert!(!token.is_empty());

    let claims = service.validate_token(&token).unwrap();
    assert_eq!(claims.user_id(), user_id);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_expired_token_rejected() {
    let service = service_with_lifetime(-120);
    let token = service.generate_token(Uuid::new_v4()).unwrap();

    let result = service.validate_token(&token);
    assert!(matches!(result, Err(JwtError::Expired)));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let issuer = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        expires_in_secs: 900,
    });
    let token = issuer.generate_token(Uuid::new_v4()).unwrap();

    let result = service_with_lifetime(900).validate_token(&token);
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_garbage_token_rejected() {
    let result = service_with_lifetime(900).validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_debug_hides_secret() {
    let rendered = format!("{:?}", service_with_lifetime(900));
    assert!(!rendered.contains("test-secret-key-for-testing"));
}

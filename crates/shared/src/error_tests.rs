use rstest::rstest;

use crate::error::AppError;

#[rstest]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::Unauthorized("test".into()), 401, "UNAUTHORIZED")]
#[case(AppError::Forbidden("test".into()), 403, "FORBIDDEN")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::PayloadTooLarge("test".into()), 413, "PAYLOAD_TOO_LARGE")]
#[case(AppError::Storage("test".into()), 500, "STORAGE_ERROR")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_status_and_code(#[case] error: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_server_error_classification() {
    assert!(AppError::Storage("bucket gone".into()).is_server_error());
    assert!(AppError::Database("pool closed".into()).is_server_error());
    assert!(!AppError::Conflict("email taken".into()).is_server_error());
    assert!(!AppError::Unauthorized("expired".into()).is_server_error());
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::Unauthorized("msg".into()).to_string(),
        "Authentication failed: msg"
    );
    assert_eq!(
        AppError::NotFound("msg".into()).to_string(),
        "Not found: msg"
    );
    assert_eq!(
        AppError::Conflict("msg".into()).to_string(),
        "Conflict: msg"
    );
    assert_eq!(
        AppError::Storage("msg".into()).to_string(),
        "Storage error: msg"
    );
}

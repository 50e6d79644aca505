//! JSON error envelope for handlers.

use agora_core::auth::AuthError;
use agora_core::social::SocialError;
use agora_core::storage::StorageError;
use agora_shared::AppError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Message sent in place of server-side failure details.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Handler error rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shortcut for a 400 response.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }
}

impl ApiError {
    /// Maps an axum extractor rejection into the taxonomy. Oversized bodies
    /// stay 413, everything else is the caller's malformed input.
    fn from_rejection(status: StatusCode, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self(AppError::PayloadTooLarge(detail))
        } else {
            Self::validation(detail)
        }
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::from_rejection(rejection.status(), rejection.body_text())
                }
            }
        )+
    };
}

impl_from_rejection!(
    JsonRejection,
    PathRejection,
    QueryRejection,
    MultipartRejection,
    MultipartError,
);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        Self(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            client_message(&self.0)
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

fn client_message(err: &AppError) -> String {
    match err {
        AppError::Validation(msg)
        | AppError::Unauthorized(msg)
        | AppError::Forbidden(msg)
        | AppError::NotFound(msg)
        | AppError::Conflict(msg)
        | AppError::PayloadTooLarge(msg)
        | AppError::Storage(msg)
        | AppError::Database(msg)
        | AppError::Internal(msg) => msg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[rstest]
    #[case(AppError::Validation("bad input".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case(AppError::NotFound("user x not found".into()), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(AppError::Conflict("taken".into()), StatusCode::CONFLICT, "CONFLICT")]
    #[case(AppError::Forbidden("no".into()), StatusCode::FORBIDDEN, "FORBIDDEN")]
    #[tokio::test]
    async fn test_client_errors_keep_message(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), status);

        let body = body_json(response).await;
        assert_eq!(body["error"], code);
        assert_ne!(body["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_oversized_rejection_keeps_413() {
        let response =
            ApiError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "too big".into())
                .into_response();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"], "PAYLOAD_TOO_LARGE");
    }

    #[rstest]
    #[case(StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case(StatusCode::BAD_REQUEST)]
    #[tokio::test]
    async fn test_other_rejections_become_validation(#[case] status: StatusCode) {
        let response = ApiError::from_rejection(status, "bad body".into()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "bad body");
    }

    #[rstest]
    #[case(AppError::Database("connection reset by peer 10.0.0.3".into()), "DATABASE_ERROR")]
    #[case(AppError::Storage("AccessDenied on bucket".into()), "STORAGE_ERROR")]
    #[case(AppError::Internal("argon2 blew up".into()), "INTERNAL_ERROR")]
    #[tokio::test]
    async fn test_server_errors_hide_detail(#[case] err: AppError, #[case] code: &str) {
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }
}

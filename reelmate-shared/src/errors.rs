use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors
/// - E2xxx: Partner linking errors
/// - E3xxx: Swipe & match errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    BadRequest,

    // Auth (E1xxx)
    InvalidCredentials,
    EmailAlreadyExists,
    TokenExpired,
    TokenInvalid,
    PasswordTooWeak,

    // Partner linking (E2xxx)
    UserNotFound,
    PartnerNotFound,
    CannotPartnerSelf,
    AlreadyPartnered,
    RequestNotFound,
    RequestAlreadyExists,
    RequestAlreadyResolved,

    // Swipe & match (E3xxx)
    MediaNotFound,
    MatchNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::BadRequest => "E0005",

            // Auth
            Self::InvalidCredentials => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::TokenExpired => "E1003",
            Self::TokenInvalid => "E1004",
            Self::PasswordTooWeak => "E1005",

            // Partner linking
            Self::UserNotFound => "E2001",
            Self::PartnerNotFound => "E2002",
            Self::CannotPartnerSelf => "E2003",
            Self::AlreadyPartnered => "E2004",
            Self::RequestNotFound => "E2005",
            Self::RequestAlreadyExists => "E2006",
            Self::RequestAlreadyResolved => "E2007",

            // Swipe & match
            Self::MediaNotFound => "E3001",
            Self::MatchNotFound => "E3002",
        }
    }

    // Duplicate/already-processed states map to 400 rather than 409: the
    // client treats every conflict as a plain bad request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::PasswordTooWeak
            | Self::CannotPartnerSelf | Self::EmailAlreadyExists | Self::AlreadyPartnered
            | Self::RequestAlreadyExists | Self::RequestAlreadyResolved => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::UserNotFound | Self::PartnerNotFound
            | Self::RequestNotFound | Self::MediaNotFound | Self::MatchNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message } => {
                (code.status_code(), ApiErrorResponse::new(code.code(), message))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    // Uniqueness constraints turn check-then-write races into
                    // conflicts instead of silent duplicate rows.
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => (
                        StatusCode::BAD_REQUEST,
                        ApiErrorResponse::new("E0005", "duplicate resource"),
                    ),
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                        _,
                    ) => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "referenced resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn known_error_json_structure() {
        let value = body_json(AppError::new(ErrorCode::MediaNotFound, "movie not found")).await;

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E3001");
        assert_eq!(value["error"]["message"], "movie not found");
    }

    #[test]
    fn conflicts_map_to_bad_request() {
        for code in [
            ErrorCode::EmailAlreadyExists,
            ErrorCode::AlreadyPartnered,
            ErrorCode::RequestAlreadyExists,
            ErrorCode::RequestAlreadyResolved,
        ] {
            assert_eq!(code.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        for code in [
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::Unauthorized,
        ] {
            assert_eq!(code.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn diesel_not_found_maps_to_404() {
        let response = AppError::Database(diesel::result::Error::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unique_violation_maps_to_400() {
        let err = AppError::Database(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

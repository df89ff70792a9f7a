// Error handling for the users API
// Maps every failure a handler can produce to a status code and a `detail` body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::AuthError;
use crate::db::StoreError;

/// Main error type for the API
/// All handlers return Result<T, ApiError>
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation
    /// Maps to HTTP 422 Unprocessable Entity
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Body could not be read or deserialized
    /// Keeps the status chosen by the extractor (400, 415 or 422)
    #[error("Malformed request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    /// Email already registered
    /// Maps to HTTP 406 Not Acceptable
    #[error("Duplicate email")]
    DuplicateEmail,

    /// Target user does not exist or is outside the caller's reach
    /// Maps to HTTP 404 Not Found
    #[error("User not found")]
    NotFound,

    /// Caller is authenticated but not allowed to do this
    /// Maps to HTTP 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    /// Bad credentials, missing/invalid token, or an auth-side internal failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store unreachable or failed for a reason other than a duplicate email
    /// Maps to HTTP 500 Internal Server Error
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Message for a non-admin trying to delete
pub const DELETE_FORBIDDEN: &str = "Permissão negada.";

/// Message for anyone setting another user's password
pub const PASSWORD_FORBIDDEN: &str = "Você não pode alterar a senha de outro usuário.";

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::DuplicateEmail => StatusCode::NOT_ACCEPTABLE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Auth(auth) => auth.status_code(),
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Auth(auth) => return auth.into_response(),
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                (StatusCode::UNPROCESSABLE_ENTITY, errors.to_string())
            }
            ApiError::MalformedBody { status, message } => {
                debug!("Rejected request body: {}", message);
                (status, message)
            }
            ApiError::DuplicateEmail => {
                warn!("Signup or update with an email already in use");
                (
                    StatusCode::NOT_ACCEPTABLE,
                    "Já existe um usuário com este email cadastrado.".to_string(),
                )
            }
            ApiError::NotFound => {
                debug!("User not found");
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                (StatusCode::FORBIDDEN, message.to_string())
            }
            ApiError::DatabaseError(msg) => {
                // Full details stay in the logs
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor.".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation(_) => ApiError::DuplicateEmail,
            StoreError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::DuplicateEmail.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Forbidden(DELETE_FORBIDDEN).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCredentials).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::DatabaseError("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unique_violation_becomes_duplicate_email() {
        let err: ApiError = StoreError::UniqueViolation("usuarios_email_key".to_string()).into();
        assert!(matches!(err, ApiError::DuplicateEmail));

        let err: ApiError = StoreError::Database("connection reset".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_response_status_matches_status_code() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Auth(AuthError::ExpiredToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_malformed_body_keeps_extractor_status() {
        let err = ApiError::MalformedBody {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}

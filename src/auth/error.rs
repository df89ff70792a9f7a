// Authentication error types

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;

const UNAUTHENTICATED_MESSAGE: &str = "Não foi possível autenticar a credencial.";
const BAD_CREDENTIALS_MESSAGE: &str = "Dados de acesso incorretos.";
const INTERNAL_MESSAGE: &str = "Erro interno do servidor.";

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email unknown or password wrong; the two cases are never distinguished
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token was valid but its subject no longer exists
    #[error("Token subject {0} not found")]
    UnknownSubject(i32),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject(_) => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to send to clients
    pub fn error_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => BAD_CREDENTIALS_MESSAGE,
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject(_) => UNAUTHENTICATED_MESSAGE,
            AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::Store(_) => INTERNAL_MESSAGE,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AuthError::InvalidCredentials => warn!("Login attempt with incorrect credentials"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::UnknownSubject(id) => warn!("Token for unknown user id {}", id),
            other => error!("Authentication failure: {}", other),
        }

        let body = Json(json!({
            "detail": self.error_message(),
        }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

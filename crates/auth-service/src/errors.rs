use crate::models::RejectionReason;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("Unsupported token algorithm or type")]
    Unsupported,

    #[error("Wrong token type")]
    WrongTokenType,

    #[error("Invalid second factor")]
    SecondFactorInvalid,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl From<RejectionReason> for AuthError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::EmptyToken => AuthError::EmptyInput("token".to_string()),
            RejectionReason::Malformed => AuthError::Malformed,
            RejectionReason::SignatureInvalid => AuthError::SignatureInvalid,
            RejectionReason::Expired => AuthError::Expired,
            RejectionReason::Unsupported => AuthError::Unsupported,
            RejectionReason::WrongTokenType => AuthError::WrongTokenType,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::EmptyInput(field) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_INPUT",
                format!("{field} is required"),
            ),
            AuthError::Malformed
            | AuthError::SignatureInvalid
            | AuthError::Expired
            | AuthError::Unsupported
            | AuthError::WrongTokenType => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                self.to_string(),
            ),
            AuthError::SecondFactorInvalid => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SECOND_FACTOR",
                "Invalid TOTP code".to_string(),
            ),
            AuthError::NotImplemented(what) => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                format!("{what} is not implemented"),
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred".to_string(),
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

//! HTTP error mapping. Every error answers with the `ApiResponse` envelope.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use oqool_core::{ApiResponse, OqoolError};
use oqool_keys::KeyError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid command")]
    InvalidCommand(Vec<String>),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidCommand(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match self {
            ApiError::InvalidCommand(errors) => {
                ApiResponse::fail("Invalid command").with_data(json!({ "errors": errors }))
            }
            other => ApiResponse::fail(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<KeyError> for ApiError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::EmptyName => ApiError::BadRequest(err.to_string()),
            KeyError::HashCollision(_) | KeyError::DuplicateId(_) => {
                ApiError::Internal("Failed to generate API key".to_string())
            }
        }
    }
}

impl From<OqoolError> for ApiError {
    fn from(err: OqoolError) -> Self {
        match err {
            OqoolError::Auth(msg) => ApiError::Unauthorized(msg),
            OqoolError::Validation(errors) => ApiError::InvalidCommand(errors),
            OqoolError::Policy(msg) => ApiError::Forbidden(msg),
            other => ApiError::Internal(other.message()),
        }
    }
}

//! API error taxonomy and its HTTP rendering.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use skillmatch_types::api::{ErrorBody, FieldIssue};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Absent and not-owned resources share this variant and its message.
    #[error("{0}")]
    NotFound(String),

    /// Schema violation on endpoints answering 400.
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),

    /// Schema violation on endpoints answering 422.
    #[error("Validation failed")]
    Unprocessable(Vec<FieldIssue>),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(anyhow::anyhow!("{}", err))
    }

    /// Malformed JSON on a 400-style endpoint.
    pub fn bad_body(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldIssue::new("body", rejection.body_text())])
    }

    /// Malformed JSON on a 422-style endpoint.
    pub fn unprocessable_body(rejection: JsonRejection) -> Self {
        Self::Unprocessable(vec![FieldIssue::new("body", rejection.body_text())])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::Validation(details) | Self::Unprocessable(details) => ErrorBody {
                error: "Validation failed".into(),
                details,
            },
            Self::Internal(err) => {
                // Details stay in the log
                error!("Unhandled error: {:#}", err);
                ErrorBody {
                    error: "Internal server error".into(),
                    details: vec![],
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: vec![],
            },
        };

        (status, Json(body)).into_response()
    }
}

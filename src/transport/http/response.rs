//! Turns handler results into responses.
//!
//! Every handler ends in exactly one of [`write_json`], [`write_error`] or [`write_empty`]; an
//! [`ApiError`] returned from a handler is rendered through [`write_error`]. Status policy:
//!
//! | condition                                        | status |
//! |--------------------------------------------------|--------|
//! | undecodable body, failed validation, unparsable id | 400    |
//! | repository `NotFound`                            | 404    |
//! | any other repository failure                     | 500    |
//! | no route / unsupported verb                      | 404 / 405 |

use crate::app::RepositoryError;
use crate::domain::ValidationError;
use crate::transport::http::types::ErrorResponse;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub const MSG_INVALID_JSON: &str = "invalid JSON body";
pub const MSG_INVALID_ID: &str = "invalid id";
pub const MSG_NOT_FOUND: &str = "book not found";
pub const MSG_INTERNAL: &str = "internal server error";
pub const MSG_NO_ROUTE: &str = "no such route";
pub const MSG_METHOD_NOT_ALLOWED: &str = "method not allowed";

pub fn write_json<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

pub fn write_error(status: StatusCode, message: impl Into<String>) -> Response {
    write_json(
        status,
        ErrorResponse {
            error: message.into(),
        },
    )
}

/// A bodiless response, e.g. `204 No Content`.
pub fn write_empty(status: StatusCode) -> Response {
    status.into_response()
}

/// Router fallback for paths with no route.
pub async fn route_not_found() -> Response {
    write_error(StatusCode::NOT_FOUND, MSG_NO_ROUTE)
}

/// Method-router fallback for a known path hit with an unsupported verb.
pub async fn method_not_allowed() -> Response {
    write_error(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED)
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-caused; never logged as a server fault.
    #[error("{0}")]
    InvalidInput(String),

    #[error("book not found")]
    NotFound,

    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ApiError {
    /// Classifies a repository failure, attaching the client-facing message used for store faults.
    pub fn from_repository(err: RepositoryError, message: &'static str) -> Self {
        if err.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Store {
                message,
                source: err,
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected path identifier");
        ApiError::InvalidInput(MSG_INVALID_ID.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::InvalidInput(message) => write_error(status, message),
            ApiError::NotFound => write_error(status, MSG_NOT_FOUND),
            ApiError::Store { message, source } => {
                tracing::error!(error = %source, "{message}");
                write_error(status, message)
            }
        }
    }
}

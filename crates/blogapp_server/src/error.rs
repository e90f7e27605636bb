//! HTTP error mapping.
//!
//! Store failures keep their kind: invalid input is a client error, a missing
//! record is 404, and storage failures are 500. The 5xx detail never reaches
//! the client; it rides in a response extension for the request log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blogapp_core::{ErrorKind, RepoError};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id is not a 64-bit integer.
    #[error("invalid {0} id")]
    InvalidId(&'static str),

    /// `blog_post_id` query parameter is absent or not an integer.
    #[error("invalid blog post id")]
    InvalidBlogPostFilter,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    /// Blocking store task did not complete.
    #[error("store task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::InvalidBlogPostFilter | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Repo(err) => match err.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Internal detail of a 5xx response, logged by the request middleware.
#[derive(Debug, Clone)]
pub struct FailureDetail(pub String);

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !status.is_server_error() {
            let body = Json(ErrorResponse {
                error: self.to_string(),
                code: status.as_u16(),
            });
            return (status, body).into_response();
        }

        let body = Json(ErrorResponse {
            error: "internal server error".to_string(),
            code: status.as_u16(),
        });
        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(FailureDetail(self.to_string()));
        response
    }
}

use std::num::ParseIntError;

use http::StatusCode;
use micro_bridge::protocol::ParseError;
use thiserror::Error;

/// Errors a request to the task API can end in.
///
/// Every variant except a broken request body is answered with a JSON
/// `{"detail": ...}` response carrying [`ApiError::status_code`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Task not found")]
    TaskNotFound,

    #[error("Not Found")]
    RouteNotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("task id must be an integer, got {id:?}")]
    InvalidTaskId { id: String, source: ParseIntError },

    #[error("field required: {field}")]
    MissingField { field: &'static str },

    #[error("invalid form data: {source}")]
    InvalidForm {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("request body error: {source}")]
    Body {
        #[from]
        source: ParseError,
    },

    #[error("failed to serialize response: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TaskNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidTaskId { .. } | ApiError::MissingField { .. } | ApiError::InvalidForm { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Body { source } => source.status_code().unwrap_or(StatusCode::BAD_REQUEST),
            ApiError::Serialize { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the request body broke off, leaving nothing to answer on.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ApiError::Body { source } if source.status_code().is_none())
    }
}

use std::error::Error;
use std::io;

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },

    #[error("application error: {source}")]
    Application { source: Box<dyn Error + Send + Sync> },
}

impl HttpError {
    pub fn application<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Application { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("incomplete request line, need method and path")]
    IncompleteRequestLine,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("chunked transfer-encoding is not supported")]
    ChunkedUnsupported,

    #[error("incomplete body, expected {expected} bytes but only received {received}")]
    IncompleteBody { expected: u64, received: u64 },

    #[error("body size {size} exceed the limit {max_size}")]
    TooLargeBody { size: u64, max_size: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn incomplete_body(expected: u64, received: u64) -> Self {
        Self::IncompleteBody { expected, received }
    }

    pub fn too_large_body(size: u64, max_size: u64) -> Self {
        Self::TooLargeBody { size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// The status the engine answers with before closing the connection.
    ///
    /// `None` means the connection is dropped without any response.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::TooLargeHeader { .. } => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            Self::InvalidRequestLine { .. } | Self::InvalidContentLength { .. } => Some(StatusCode::BAD_REQUEST),
            Self::ChunkedUnsupported => Some(StatusCode::NOT_IMPLEMENTED),
            Self::TooLargeBody { .. } => Some(StatusCode::PAYLOAD_TOO_LARGE),
            Self::IncompleteRequestLine | Self::IncompleteBody { .. } | Self::Io { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid response event: {reason}")]
    InvalidEvent { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_event<S: ToString>(str: S) -> Self {
        Self::InvalidEvent { reason: str.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_statuses() {
        assert_eq!(ParseError::too_large_header(65537, 65536).status_code(), Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE));
        assert_eq!(ParseError::invalid_request_line("not utf-8").status_code(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(ParseError::invalid_content_length("abc").status_code(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(ParseError::ChunkedUnsupported.status_code(), Some(StatusCode::NOT_IMPLEMENTED));
        assert_eq!(ParseError::IncompleteRequestLine.status_code(), None);
        assert_eq!(ParseError::incomplete_body(10, 3).status_code(), None);
    }
}

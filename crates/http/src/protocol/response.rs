//! HTTP response head handling implementation.
//!
//! The head captured from a start event is kept until the first body event,
//! which is when it actually reaches the wire.

use bytes::Bytes;
use http::StatusCode;

/// Status and header pairs captured from [`ResponseEvent::Start`].
///
/// [`ResponseEvent::Start`]: crate::protocol::ResponseEvent::Start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: StatusCode,
    headers: Vec<(Bytes, Bytes)>,
}

impl ResponseHead {
    pub fn new(status: StatusCode, headers: Vec<(Bytes, Bytes)>) -> Self {
        Self { status, headers }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(Bytes, Bytes)] {
        &self.headers
    }
}

/// A body sent without a start event is answered as a plain 200.
impl Default for ResponseHead {
    fn default() -> Self {
        Self { status: StatusCode::OK, headers: Vec::new() }
    }
}

/// What the engine does with the connection once the current response is written.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionType {
    KeepAlive,
    Close,
}

impl ConnectionType {
    /// The value of the `connection` header injected into every response
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            ConnectionType::KeepAlive => b"keep-alive",
            ConnectionType::Close => b"close",
        }
    }

    #[inline]
    pub fn is_close(self) -> bool {
        matches!(self, ConnectionType::Close)
    }
}

use bytes::Bytes;
use http::StatusCode;

/// A chunk of request body handed to the application by [`RequestBody::receive`].
///
/// `more_body` is `false` on the final chunk; the final chunk may be empty.
///
/// [`RequestBody::receive`]: crate::protocol::body::RequestBody::receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyChunk {
    pub body: Bytes,
    pub more_body: bool,
}

impl BodyChunk {
    pub fn new(body: Bytes, more_body: bool) -> Self {
        Self { body, more_body }
    }

    /// The chunk returned once the declared content length has been consumed
    #[inline]
    pub fn eof() -> Self {
        Self { body: Bytes::new(), more_body: false }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        !self.more_body
    }
}

/// An event sent by the application to produce its response.
///
/// Exactly one [`ResponseEvent::Start`] precedes the body events. The headers are
/// serialized together with the first [`ResponseEvent::Body`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// Status code and header pairs, written verbatim in order
    Start { status: StatusCode, headers: Vec<(Bytes, Bytes)> },
    /// A chunk of response body; `more_body = false` ends the response
    Body { body: Bytes, more_body: bool },
}

impl ResponseEvent {
    pub fn start(status: StatusCode, headers: Vec<(Bytes, Bytes)>) -> Self {
        Self::Start { status, headers }
    }

    pub fn body<B: Into<Bytes>>(body: B, more_body: bool) -> Self {
        Self::Body { body: body.into(), more_body }
    }

    /// A final body event carrying `body`
    pub fn last_body<B: Into<Bytes>>(body: B) -> Self {
        Self::body(body, false)
    }
}

/// Represents the size information of an HTTP request payload.
///
/// Only Content-Length framing is supported, so the size is either
/// a known length or nothing at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    #[inline]
    pub fn new_length(length: u64) -> Self {
        if length == 0 { PayloadSize::Empty } else { PayloadSize::Length(length) }
    }

    #[inline]
    pub fn new_empty() -> Self {
        PayloadSize::Empty
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty)
    }

    /// The declared number of body bytes
    #[inline]
    pub fn len(&self) -> u64 {
        match self {
            PayloadSize::Length(length) => *length,
            PayloadSize::Empty => 0,
        }
    }
}

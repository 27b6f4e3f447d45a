use std::cmp;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::codec::LengthDecoder;
use crate::ensure;
use crate::protocol::{BodyChunk, ParseError, PayloadSize};

/// Default upper bound of a single transport read while streaming a body
pub const DEFAULT_READ_SIZE: usize = 4 * 1024;

/// RequestBody is the pull side of the request body bridge.
///
/// It borrows the connection's reader and input buffer for one request. Bytes
/// that arrived together with the header block are handed out first; only when
/// the buffer is empty does it read from the transport, and never more than the
/// body still owes, so the next request's bytes are never pulled in early.
///
/// # Example Flow
///
/// 1. HttpConnection parses the head and creates a RequestBody for it
/// 2. The application calls [`RequestBody::receive`] until `more_body` is false
/// 3. HttpConnection drains whatever the application left unread
pub struct RequestBody<'conn> {
    reader: &'conn mut (dyn AsyncRead + Send + Unpin),
    buffer: &'conn mut BytesMut,
    decoder: LengthDecoder,
    read_size: usize,
    broken: bool,
}

impl<'conn> RequestBody<'conn> {
    pub fn new(reader: &'conn mut (dyn AsyncRead + Send + Unpin), buffer: &'conn mut BytesMut, payload_size: PayloadSize) -> Self {
        Self { reader, buffer, decoder: LengthDecoder::new(payload_size.len()), read_size: DEFAULT_READ_SIZE, broken: false }
    }

    /// Sets the upper bound of a single transport read.
    #[must_use]
    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size.max(1);
        self
    }

    /// The declared Content-Length of this request
    pub fn content_length(&self) -> u64 {
        self.decoder.expected()
    }

    /// The number of body bytes handed out so far
    pub fn received(&self) -> u64 {
        self.decoder.received()
    }

    pub fn is_finished(&self) -> bool {
        self.decoder.is_finished()
    }

    /// Whether the transport ended before the declared length was delivered
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Returns the next body chunk.
    ///
    /// Once the declared length has been delivered every call returns an empty
    /// chunk with `more_body = false`. If the peer goes away before that, the
    /// call fails with [`ParseError::IncompleteBody`] and keeps failing.
    pub async fn receive(&mut self) -> Result<BodyChunk, ParseError> {
        loop {
            ensure!(!self.broken, ParseError::incomplete_body(self.decoder.expected(), self.decoder.received()));

            if let Some(chunk) = self.decoder.decode(&mut *self.buffer)? {
                return Ok(chunk);
            }

            let limit = cmp::min(self.read_size as u64, self.decoder.remaining());
            self.buffer.reserve(limit as usize);

            match (&mut *self.reader).take(limit).read_buf(&mut *self.buffer).await {
                Ok(0) => {
                    warn!(expected = self.decoder.expected(), received = self.decoder.received(), "peer closed before the body was complete");
                    self.broken = true;
                }
                Ok(size) => {
                    trace!(size, "read request body from transport");
                }
                Err(e) => {
                    warn!(cause = %e, "failed to read request body");
                    self.broken = true;
                }
            }
        }
    }

    /// Reads the whole body into one buffer.
    ///
    /// Fails with [`ParseError::TooLargeBody`] without reading anything if the
    /// declared length exceeds `max_size`.
    pub async fn collect(&mut self, max_size: u64) -> Result<Bytes, ParseError> {
        let length = self.decoder.remaining();
        ensure!(length <= max_size, ParseError::too_large_body(self.content_length(), max_size));

        let mut body = BytesMut::with_capacity(length as usize);
        loop {
            let chunk = self.receive().await?;
            body.extend_from_slice(&chunk.body);
            if !chunk.more_body {
                return Ok(body.freeze());
            }
        }
    }

    /// Drains the part of the body the application did not read.
    ///
    /// Returns the number of bytes skipped.
    pub async fn skip(&mut self) -> Result<u64, ParseError> {
        let mut size: u64 = 0;
        loop {
            let chunk = self.receive().await?;
            size += chunk.body.len() as u64;
            if !chunk.more_body {
                return Ok(size);
            }
        }
    }
}

impl std::fmt::Debug for RequestBody<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBody")
            .field("decoder", &self.decoder)
            .field("buffered", &self.buffer.len())
            .field("read_size", &self.read_size)
            .field("broken", &self.broken)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn buffered_bytes_first() {
        let mut reader: &[u8] = b" world";
        let mut buffer = BytesMut::from(&b"hello"[..]);
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(11));

        let chunk = body.receive().await.unwrap();
        assert_eq!(&chunk.body[..], b"hello");
        assert!(chunk.more_body);

        let chunk = body.receive().await.unwrap();
        assert_eq!(&chunk.body[..], b" world");
        assert!(!chunk.more_body);

        assert_eq!(body.receive().await.unwrap(), BodyChunk::eof());
        assert_eq!(body.received(), 11);
    }

    #[tokio::test]
    async fn reads_are_bounded() {
        let data = vec![b'x'; 10_000];
        let mut reader: &[u8] = &data;
        let mut buffer = BytesMut::new();
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(9_000));

        let mut sizes = vec![];
        loop {
            let chunk = body.receive().await.unwrap();
            sizes.push(chunk.body.len());
            if !chunk.more_body {
                break;
            }
        }

        assert_eq!(sizes, vec![4096, 4096, 808]);
        // the bytes after the declared length stay on the transport
        assert_eq!(reader.len(), 1_000);
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn does_not_take_the_next_request() {
        let mut reader: &[u8] = b"";
        let mut buffer = BytesMut::from(&b"abcGET / HTTP/1.1\r\n\r\n"[..]);
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(3));

        assert_eq!(body.collect(1024).await.unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(&buffer[..], b"GET / HTTP/1.1\r\n\r\n");
    }

    #[tokio::test]
    async fn empty_body() {
        let mut reader: &[u8] = b"GET / HTTP/1.1\r\n\r\n";
        let mut buffer = BytesMut::new();
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_empty());

        assert_eq!(body.receive().await.unwrap(), BodyChunk::eof());
        assert_eq!(reader.len(), 18);
    }

    #[tokio::test]
    async fn peer_closed_mid_body() {
        let mut reader: &[u8] = b"lo";
        let mut buffer = BytesMut::from(&b"hel"[..]);
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(10));

        assert_eq!(&body.receive().await.unwrap().body[..], b"hel");
        assert_eq!(&body.receive().await.unwrap().body[..], b"lo");

        let result = body.receive().await;
        assert!(matches!(result, Err(ParseError::IncompleteBody { expected: 10, received: 5 })));
        assert!(body.is_broken());

        let result = body.receive().await;
        assert!(matches!(result, Err(ParseError::IncompleteBody { .. })));
    }

    #[tokio::test]
    async fn collect_refuses_oversized_body() {
        let mut reader: &[u8] = b"";
        let mut buffer = BytesMut::new();
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(2048));

        let result = body.collect(1024).await;
        assert!(matches!(result, Err(ParseError::TooLargeBody { size: 2048, max_size: 1024 })));
        assert_eq!(body.received(), 0);
    }

    #[tokio::test]
    async fn skip_unread_body() {
        let mut reader: &[u8] = b"6789";
        let mut buffer = BytesMut::from(&b"012345"[..]);
        let mut body = RequestBody::new(&mut reader, &mut buffer, PayloadSize::new_length(10)).with_read_size(2);

        assert_eq!(&body.receive().await.unwrap().body[..], b"012345");
        assert_eq!(body.skip().await.unwrap(), 4);
        assert!(body.is_finished());
    }
}

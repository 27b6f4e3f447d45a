//! Decoder implementation for HTTP messages with Content-Length header.
//!
//! This module provides functionality to decode HTTP messages where the payload size
//! is specified by the Content-Length header, as defined in
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use std::cmp;

use crate::protocol::{BodyChunk, ParseError};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder for handling HTTP messages with a known content length.
///
/// The decoder counts the bytes consumed so far and never takes more than the
/// declared length from the buffer, leaving the next request's bytes in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The declared content length
    expected: u64,
    /// The number of body bytes consumed so far
    received: u64,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub fn new(length: u64) -> Self {
        Self { expected: length, received: 0 }
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// The number of body bytes still owed by the client
    pub fn remaining(&self) -> u64 {
        self.expected - self.received
    }

    pub fn is_finished(&self) -> bool {
        self.received >= self.expected
    }
}

impl Decoder for LengthDecoder {
    type Item = BodyChunk;
    type Error = ParseError;

    /// Decodes bytes from the input buffer according to the content length.
    ///
    /// # Returns
    /// * `Ok(Some(chunk))` with an empty final chunk when all bytes have been read
    /// * `Ok(Some(chunk))` when a chunk is taken from the buffer
    /// * `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.is_finished() {
            return Ok(Some(BodyChunk::eof()));
        }

        if src.is_empty() {
            return Ok(None);
        }

        // Read the minimum of remaining length and available bytes
        let len = cmp::min(self.remaining(), src.len() as u64);
        let bytes = src.split_to(len as usize).freeze();

        self.received += bytes.len() as u64;
        Ok(Some(BodyChunk::new(bytes, !self.is_finished())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut buffer: BytesMut = BytesMut::from(&b"101234567890abcdef\r\n\r\n"[..]);

        let mut length_decoder = LengthDecoder::new(10);
        let chunk = length_decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(&chunk.body[..], b"1012345678");
        assert!(!chunk.more_body);
        assert_eq!(&buffer[..], b"90abcdef\r\n\r\n");

        let chunk = length_decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk, BodyChunk::eof());
        assert_eq!(buffer.len(), 12);
    }

    #[test]
    fn split_across_reads() {
        let mut length_decoder = LengthDecoder::new(11);

        let mut buffer = BytesMut::from(&b"hello"[..]);
        let chunk = length_decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&chunk.body[..], b"hello");
        assert!(chunk.more_body);
        assert_eq!(length_decoder.remaining(), 6);

        assert!(length_decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"=world");
        let chunk = length_decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&chunk.body[..], b"=world");
        assert!(!chunk.more_body);
        assert!(length_decoder.is_finished());
    }

    #[test]
    fn zero_length() {
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
        let chunk = LengthDecoder::new(0).decode(&mut buffer).unwrap().unwrap();

        assert!(chunk.is_eof());
        assert!(chunk.body.is_empty());
        assert_eq!(buffer.len(), 18);
    }
}

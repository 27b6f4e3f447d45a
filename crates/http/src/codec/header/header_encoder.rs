//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! The status line takes the canonical reason phrase of the status code. The
//! engine-owned `connection` header comes right after it, followed by the
//! application's header pairs exactly as they were given.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tokio_util::codec::Encoder;

use crate::protocol::{ConnectionType, ResponseHead, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<(ResponseHead, ConnectionType)> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (ResponseHead, ConnectionType), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, connection_type) = item;

        dst.reserve(INIT_HEADER_SIZE);
        write_status_line(head.status(), dst)?;

        dst.put_slice(b"connection: ");
        dst.put_slice(connection_type.as_bytes());
        dst.put_slice(b"\r\n");

        for (name, value) in head.headers() {
            dst.put_slice(name);
            dst.put_slice(b": ");
            dst.put_slice(value);
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Renders the terse response the engine itself answers protocol violations with:
/// a status line and the blank line, no headers and no body.
pub fn encode_status_only(status: StatusCode, dst: &mut BytesMut) -> Result<(), SendError> {
    write_status_line(status, dst)?;
    dst.put_slice(b"\r\n");
    Ok(())
}

fn write_status_line(status: StatusCode, dst: &mut BytesMut) -> io::Result<()> {
    write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or_default())
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn created_with_headers_in_order() {
        let head = ResponseHead::new(
            StatusCode::CREATED,
            vec![
                (Bytes::from_static(b"content-type"), Bytes::from_static(b"text/plain")),
                (Bytes::from_static(b"X-Custom"), Bytes::from_static(b"1")),
            ],
        );

        let mut dst = BytesMut::new();
        HeaderEncoder.encode((head, ConnectionType::KeepAlive), &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            &b"HTTP/1.1 201 Created\r\nconnection: keep-alive\r\ncontent-type: text/plain\r\nX-Custom: 1\r\n\r\n"[..]
        );
    }

    #[test]
    fn close_connection() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode((ResponseHead::default(), ConnectionType::Close), &mut dst).unwrap();

        assert_eq!(&dst[..], &b"HTTP/1.1 200 OK\r\nconnection: close\r\n\r\n"[..]);
    }

    #[test]
    fn status_only() {
        let mut dst = BytesMut::new();
        encode_status_only(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE, &mut dst).unwrap();
        assert_eq!(&dst[..], &b"HTTP/1.1 431 Request Header Fields Too Large\r\n\r\n"[..]);

        let mut dst = BytesMut::new();
        encode_status_only(StatusCode::from_u16(599).unwrap(), &mut dst).unwrap();
        assert_eq!(&dst[..], &b"HTTP/1.1 599 \r\n\r\n"[..]);
    }
}

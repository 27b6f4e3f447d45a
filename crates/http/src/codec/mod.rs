//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module turns raw bytes into request heads and body chunks, and
//! response events back into raw bytes. All of it is pure buffer work; the
//! socket I/O lives in [`crate::connection`].
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`HeaderDecoder`]: Decodes the request head out of the input buffer
//!   - [`LengthDecoder`]: Takes Content-Length framed body bytes from the input buffer
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes start and body events
//!   - [`HeaderEncoder`]: Renders the status line and headers
//!   - [`encode_status_only`]: Renders the engine's own error responses
//!
//! # Example
//!
//! ```
//! use micro_bridge::codec::HeaderDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut buffer = BytesMut::from(&b"POST /?a=1 HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello"[..]);
//! let (head, payload_size) = HeaderDecoder::default().decode(&mut buffer).unwrap().unwrap();
//!
//! assert_eq!(head.path(), "/");
//! assert_eq!(payload_size.len(), 5);
//! assert_eq!(&buffer[..], b"hello");
//! ```

mod body;
mod header;
mod response_encoder;

pub use body::LengthDecoder;
pub use header::DEFAULT_MAX_HEADER_SIZE;
pub use header::HeaderDecoder;
pub use header::HeaderEncoder;
pub use header::encode_status_only;
pub use response_encoder::ResponseEncoder;

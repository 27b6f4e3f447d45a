//! HTTP header processing module for encoding and decoding heads
//!
//! # Components
//!
//! - [`HeaderDecoder`]: Decodes request heads from raw bytes
//!   - Locates the blank line that ends the header block
//!   - Lower-cases header names, keeps values raw
//!   - Enforces the header block size limit
//!
//! - [`HeaderEncoder`]: Encodes response heads to bytes
//!   - Renders the status line with its canonical reason phrase
//!   - Injects the `connection` header

mod header_decoder;
mod header_encoder;

pub use header_decoder::DEFAULT_MAX_HEADER_SIZE;
pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
pub use header_encoder::encode_status_only;

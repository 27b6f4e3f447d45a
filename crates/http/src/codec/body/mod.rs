//! HTTP body handling module for request payloads
//!
//! Only Content-Length framing is supported. The [`LengthDecoder`] counts the
//! bytes handed to the application against the declared length.

mod length_decoder;

pub use length_decoder::LengthDecoder;

//! Core protocol abstractions shared by the codec, the connection engine and
//! the hosted application.
//!
//! # Architecture
//!
//! - **Request side** (`request`, `scope`): the parsed request head and the
//!   [`Scope`] the application receives for each request
//! - **Events** (`message`): [`BodyChunk`] pulled by the application and
//!   [`ResponseEvent`] pushed by it
//! - **Response side** (`response`): the [`ResponseHead`] captured from the
//!   start event and the [`ConnectionType`] decided per request
//! - **Body streaming** ([`body`]): [`body::RequestBody`], the pull side of
//!   the body bridge
//! - **Errors** (`error`): [`HttpError`], [`ParseError`] and [`SendError`]

mod message;
pub use message::BodyChunk;
pub use message::PayloadSize;
pub use message::ResponseEvent;

mod request;
pub use request::Headers;
pub use request::RequestHead;

mod scope;
pub use scope::Scope;

mod response;
pub use response::ConnectionType;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

pub mod body;

//! HTTP request body handling implementation.
//!
//! The body is pulled, never pushed: nothing is read from the transport until
//! the application asks for the next chunk, and a single read never asks for
//! more than the body still owes. This bounds memory use to one read per
//! request and keeps the following request's bytes untouched.
//!
//! # Components
//!
//! - [`RequestBody`]: the receive side handed to the application
//!
//! A body that ends early because the peer went away is reported as
//! [`ParseError::IncompleteBody`](crate::protocol::ParseError::IncompleteBody)
//! rather than as a short, seemingly complete body.

mod req_body;

pub use req_body::DEFAULT_READ_SIZE;
pub use req_body::RequestBody;

//! HTTP connection handling module
//!
//! This module owns the socket side of the bridge: it reads request heads off
//! the transport, hands each request to the [`Application`](crate::app::Application)
//! and writes back whatever the application sends.
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Reads request heads under an idle timeout
//!   - Answers protocol violations with status-only responses
//!   - Drains request body the application left unread
//!   - Keeps the connection alive between requests
//! - [`ResponseSender`]: The push side handed to the application
//! - [`ConnectionConfig`]: Limits shared by all connections of a server

mod config;
mod http_connection;
mod response_sender;

pub use config::ConnectionConfig;
pub use config::DEFAULT_IDLE_TIMEOUT;
pub use http_connection::HttpConnection;
pub use response_sender::ResponseSender;

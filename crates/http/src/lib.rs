//! An asynchronous HTTP/1.1 to application bridge
//!
//! This crate accepts raw HTTP/1.1 connections, parses each request, hands it
//! to an asynchronous [`Application`](app::Application) as a request [`Scope`](protocol::Scope)
//! plus a pull-based request body and a push-based response sender, and writes
//! the response events the application produces back to the socket.
//!
//! # Features
//!
//! - Lenient HTTP/1.1 request head parsing with a bounded header block
//! - Content-Length framed request bodies, streamed in bounded reads
//! - Response rendering from start and body events
//! - Keep-alive connections with an idle timeout
//! - Status-only error responses for protocol violations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//!
//! use micro_bridge::app::Application;
//! use micro_bridge::connection::{HttpConnection, ResponseSender};
//! use micro_bridge::protocol::body::RequestBody;
//! use micro_bridge::protocol::{Scope, SendError};
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Application for HelloWorld {
//!     type Error = SendError;
//!
//!     async fn call(&self, scope: Scope, _receive: &mut RequestBody<'_>, send: &mut ResponseSender<'_>) -> Result<(), Self::Error> {
//!         let body = format!("Hello {}\r\n", scope.path);
//!         let headers = vec![(Bytes::from_static(b"content-length"), Bytes::from(body.len().to_string()))];
//!         send.respond(StatusCode::OK, headers, body).await
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let app = Arc::new(HelloWorld);
//!
//!     loop {
//!         let (stream, client_addr) = listener.accept().await?;
//!         let server_addr = stream.local_addr().ok();
//!         let app = app.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = stream.into_split();
//!             HttpConnection::new(reader, writer).with_addresses(server_addr, Some(client_addr)).process(app).await;
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: The per-connection request loop and the response sender
//! - [`protocol`]: Protocol types, the request body bridge and errors
//! - [`codec`]: Request head decoding and response encoding
//! - [`app`]: The application contract
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no TLS
//! - `Transfer-Encoding: chunked` request bodies are refused with 501
//! - No pipelining: one request is answered before the next head is parsed

pub mod app;
pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

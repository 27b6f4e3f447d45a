use std::net::SocketAddr;

use bytes::Bytes;

use crate::protocol::{Headers, RequestHead};

/// The request description handed to the application, one per request.
///
/// A scope is built from the parsed [`RequestHead`] and the addresses of the
/// connection it arrived on. It is owned by the application for the duration
/// of one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub protocol: &'static str,
    pub method: String,
    pub path: String,
    pub query_string: Bytes,
    pub headers: Headers,
    pub server: Option<SocketAddr>,
    pub client: Option<SocketAddr>,
    pub scheme: &'static str,
}

impl Scope {
    pub fn new(head: RequestHead, server: Option<SocketAddr>, client: Option<SocketAddr>) -> Self {
        let (method, path, query_string, headers) = head.into_parts();
        Self { protocol: "http", method, path, query_string, headers, server, client, scheme: "http" }
    }
}

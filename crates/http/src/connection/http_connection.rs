use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tokio_util::codec::Decoder;
use tracing::{debug, error, info, trace, warn};

use crate::app::Application;
use crate::codec::{HeaderDecoder, encode_status_only};
use crate::connection::{ConnectionConfig, ResponseSender};
use crate::protocol::body::RequestBody;
use crate::protocol::{ConnectionType, HttpError, ParseError, PayloadSize, RequestHead, Scope, SendError};

/// An HTTP connection that serves requests one after another over one socket
///
/// `HttpConnection` handles the full lifecycle of an HTTP connection:
/// - Reading and decoding the request head, under the idle timeout
/// - Answering protocol violations itself with a status-only response
/// - Invoking the application with the scope and the body/response halves
/// - Draining unread request body so the next request starts clean
/// - Keeping the connection open unless the client asked for `connection: close`
///
/// Requests are never pipelined: the next head is not parsed until the current
/// response has been written. Any protocol violation ends the connection.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
    buffer: BytesMut,
    header_decoder: HeaderDecoder,
    config: ConnectionConfig,
    server_addr: Option<SocketAddr>,
    client_addr: Option<SocketAddr>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Send + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: ConnectionConfig) -> Self {
        Self {
            reader,
            writer,
            buffer: BytesMut::with_capacity(config.get_read_size()),
            header_decoder: HeaderDecoder::new(config.get_max_header_size()),
            config,
            server_addr: None,
            client_addr: None,
        }
    }

    /// Records the socket addresses reported to the application in every [`Scope`].
    #[must_use]
    pub fn with_addresses(mut self, server_addr: Option<SocketAddr>, client_addr: Option<SocketAddr>) -> Self {
        self.server_addr = server_addr;
        self.client_addr = client_addr;
        self
    }

    /// Serves requests until the connection is closed.
    ///
    /// Every error is handled and logged here; the caller only ever sees the
    /// connection finish.
    pub async fn process<A>(mut self, app: Arc<A>)
    where
        A: Application + ?Sized,
    {
        match self.serve(app.as_ref()).await {
            Ok(()) => {
                debug!(client = ?self.client_addr, "connection closed");
            }
            Err(e) => {
                error!(cause = %e, client = ?self.client_addr, "connection aborted");
            }
        }

        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "failed to shutdown connection writer");
        }
    }

    async fn serve<A>(&mut self, app: &A) -> Result<(), HttpError>
    where
        A: Application + ?Sized,
    {
        loop {
            let (head, payload_size) = match self.read_request_head().await {
                Ok(Some(request)) => request,
                Ok(None) => return Ok(()),
                Err(e) => {
                    match e.status_code() {
                        Some(status) => {
                            warn!(cause = %e, status = %status, "reject request");
                            self.write_status_only(status).await?;
                        }
                        None => {
                            info!(cause = %e, "drop connection without response");
                        }
                    }
                    return Ok(());
                }
            };

            if self.handle_request(app, head, payload_size).await?.is_close() {
                return Ok(());
            }
            trace!("response sent, awaiting next request");
        }
    }

    /// Reads until a complete request head is buffered.
    ///
    /// Returns `Ok(None)` when the peer closed the connection or stayed idle
    /// for longer than the idle timeout.
    async fn read_request_head(&mut self) -> Result<Option<(RequestHead, PayloadSize)>, ParseError> {
        loop {
            if let Some(request) = self.header_decoder.decode(&mut self.buffer)? {
                return Ok(Some(request));
            }

            match timeout(self.config.get_idle_timeout(), self.read_more()).await {
                Ok(Ok(0)) => {
                    if !self.buffer.is_empty() {
                        debug!(buffered = self.buffer.len(), "peer closed in the middle of a request head");
                    }
                    return Ok(None);
                }
                Ok(Ok(size)) => {
                    trace!(size, buffered = self.buffer.len(), "read request head from transport");
                }
                Ok(Err(e)) => return Err(ParseError::io(e)),
                Err(_elapsed) => {
                    info!(timeout = ?self.config.get_idle_timeout(), "connection idle for too long");
                    return Ok(None);
                }
            }
        }
    }

    async fn read_more(&mut self) -> io::Result<usize> {
        let read_size = self.config.get_read_size();
        self.buffer.reserve(read_size);
        (&mut self.reader).take(read_size as u64).read_buf(&mut self.buffer).await
    }

    async fn handle_request<A>(&mut self, app: &A, head: RequestHead, payload_size: PayloadSize) -> Result<ConnectionType, HttpError>
    where
        A: Application + ?Sized,
    {
        let connection_type = if head.wants_close() { ConnectionType::Close } else { ConnectionType::KeepAlive };
        debug!(method = head.method(), path = head.path(), content_length = payload_size.len(), "receive request");

        let idle_timeout = self.config.get_idle_timeout();
        let scope = Scope::new(head, self.server_addr, self.client_addr);
        let mut request_body = RequestBody::new(&mut self.reader, &mut self.buffer, payload_size).with_read_size(self.config.get_read_size());
        let mut sender = ResponseSender::new(&mut self.writer, connection_type);

        if let Err(e) = app.call(scope, &mut request_body, &mut sender).await {
            if !sender.is_started() {
                if let Err(send_error) = sender.send_status_only(StatusCode::INTERNAL_SERVER_ERROR).await {
                    debug!(cause = %send_error, "failed to send error response");
                }
            }
            return Err(HttpError::application(e));
        }

        if !sender.flush_pending_head().await? {
            error!("application finished without sending a response");
            sender.send_status_only(StatusCode::INTERNAL_SERVER_ERROR).await?;
            return Ok(ConnectionType::Close);
        }

        // a response already advertised as keep-alive may still end the connection below
        if !sender.is_finished() {
            warn!(advertised = ?sender.connection_type(), "application left the response body unfinished, close connection");
            return Ok(ConnectionType::Close);
        }

        if connection_type.is_close() {
            return Ok(ConnectionType::Close);
        }

        // skip body if the application didn't read it, under the same idle timeout as a head read
        match timeout(idle_timeout, request_body.skip()).await {
            Ok(Ok(0)) => Ok(ConnectionType::KeepAlive),
            Ok(Ok(size)) => {
                info!(size, "skip request body");
                Ok(ConnectionType::KeepAlive)
            }
            Ok(Err(e)) => {
                warn!(cause = %e, advertised = ?connection_type, "failed to drain request body, close connection");
                Ok(ConnectionType::Close)
            }
            Err(_elapsed) => {
                info!(timeout = ?idle_timeout, remaining = request_body.content_length() - request_body.received(), "request body drain timed out, close connection");
                Ok(ConnectionType::Close)
            }
        }
    }

    async fn write_status_only(&mut self, status: StatusCode) -> Result<(), SendError> {
        let mut buffer = BytesMut::new();
        encode_status_only(status, &mut buffer)?;
        self.writer.write_all(&buffer).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl<R, W> std::fmt::Debug for HttpConnection<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("buffered", &self.buffer.len())
            .field("config", &self.config)
            .field("server_addr", &self.server_addr)
            .field("client_addr", &self.client_addr)
            .finish_non_exhaustive()
    }
}

use bytes::{Bytes, BytesMut};
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

use crate::codec::{ResponseEncoder, encode_status_only};
use crate::protocol::{ConnectionType, ResponseEvent, SendError};

/// ResponseSender is the push side handed to the application.
///
/// Every [`send`](ResponseSender::send) encodes one event into a scratch
/// buffer and, if that produced any bytes, writes and flushes them before
/// returning. Nothing is held back between calls.
pub struct ResponseSender<'conn> {
    writer: &'conn mut (dyn AsyncWrite + Send + Unpin),
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<'conn> ResponseSender<'conn> {
    pub fn new(writer: &'conn mut (dyn AsyncWrite + Send + Unpin), connection_type: ConnectionType) -> Self {
        Self { writer, buffer: BytesMut::new(), encoder: ResponseEncoder::new(connection_type) }
    }

    /// Sends one response event, writing out whatever it renders.
    pub async fn send(&mut self, event: ResponseEvent) -> Result<(), SendError> {
        self.encoder.encode(event, &mut self.buffer)?;

        if self.buffer.is_empty() {
            return Ok(());
        }

        let bytes = self.buffer.split();
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Sends a complete response: the start event and one final body event.
    pub async fn respond<B: Into<Bytes>>(&mut self, status: StatusCode, headers: Vec<(Bytes, Bytes)>, body: B) -> Result<(), SendError> {
        self.send(ResponseEvent::start(status, headers)).await?;
        self.send(ResponseEvent::last_body(body)).await
    }

    /// The `connection` header value this response carries
    pub fn connection_type(&self) -> ConnectionType {
        self.encoder.connection_type()
    }

    /// Whether the status line and headers have reached the transport
    pub fn is_started(&self) -> bool {
        self.encoder.is_headers_sent()
    }

    pub fn is_finished(&self) -> bool {
        self.encoder.is_finished()
    }

    /// Writes a start event the application captured but never followed with a body.
    ///
    /// Returns `false` if there was nothing at all to write.
    pub(crate) async fn flush_pending_head(&mut self) -> Result<bool, SendError> {
        if self.encoder.is_headers_sent() {
            return Ok(true);
        }

        if !self.encoder.has_pending_head() {
            return Ok(false);
        }

        self.send(ResponseEvent::last_body(Bytes::new())).await?;
        Ok(true)
    }

    /// Writes a bare status line with no headers and no body, bypassing the event state.
    pub(crate) async fn send_status_only(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.buffer.clear();
        encode_status_only(status, &mut self.buffer)?;

        let bytes = self.buffer.split();
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl std::fmt::Debug for ResponseSender<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSender").field("encoder", &self.encoder).finish_non_exhaustive()
    }
}

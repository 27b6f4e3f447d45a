use crate::codec::header::HeaderEncoder;
use crate::protocol::{ConnectionType, ResponseEvent, ResponseHead, SendError};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::{error, warn};

/// Turns the application's response events into wire bytes.
///
/// The start event is only captured; the head is rendered together with the
/// first body event. One encoder serves exactly one response.
#[derive(Debug)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
    connection_type: ConnectionType,
    head: Option<ResponseHead>,
    headers_sent: bool,
    finished: bool,
}

impl ResponseEncoder {
    pub fn new(connection_type: ConnectionType) -> Self {
        Self { header_encoder: HeaderEncoder, connection_type, head: None, headers_sent: false, finished: false }
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    /// Whether a start event has been captured but not yet written
    pub fn has_pending_head(&self) -> bool {
        self.head.is_some()
    }

    /// Whether the status line and headers have been rendered
    pub fn is_headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// Whether a body event with `more_body = false` has been rendered
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Encoder<ResponseEvent> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponseEvent, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            ResponseEvent::Start { status, headers } => {
                if self.headers_sent {
                    error!(status = %status, "receive response start after headers were sent");
                    return Err(SendError::invalid_event("response start after headers were sent"));
                }

                if self.head.is_some() {
                    warn!(status = %status, "response start received twice, the later one wins");
                }
                self.head = Some(ResponseHead::new(status, headers));
                Ok(())
            }

            ResponseEvent::Body { body, more_body } => {
                if self.finished {
                    error!("receive response body after the response finished");
                    return Err(SendError::invalid_event("response body after the response finished"));
                }

                if !self.headers_sent {
                    let head = self.head.take().unwrap_or_else(|| {
                        warn!("receive response body before response start, answer with 200");
                        ResponseHead::default()
                    });
                    self.header_encoder.encode((head, self.connection_type), dst)?;
                    self.headers_sent = true;
                }

                if !body.is_empty() {
                    dst.put_slice(&body);
                }

                if !more_body {
                    self.finished = true;
                }
                Ok(())
            }
        }
    }
}

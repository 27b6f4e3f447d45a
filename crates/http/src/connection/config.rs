use std::time::Duration;

use crate::codec::DEFAULT_MAX_HEADER_SIZE;
use crate::protocol::body::DEFAULT_READ_SIZE;

/// Default time a connection may sit idle while a request head is awaited
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Limits shared by every connection of a server.
///
/// The configuration is immutable once a connection is created from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    idle_timeout: Duration,
    max_header_size: usize,
    read_size: usize,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long a single read may block while no complete request head has arrived.
    #[must_use]
    pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// The largest header block accepted before answering 431.
    #[must_use]
    pub fn max_header_size(mut self, max_header_size: usize) -> Self {
        self.max_header_size = max_header_size;
        self
    }

    /// The upper bound of a single transport read.
    #[must_use]
    pub fn read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size.max(1);
        self
    }

    pub fn get_idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn get_max_header_size(&self) -> usize {
        self.max_header_size
    }

    pub fn get_read_size(&self) -> usize {
        self.read_size
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { idle_timeout: DEFAULT_IDLE_TIMEOUT, max_header_size: DEFAULT_MAX_HEADER_SIZE, read_size: DEFAULT_READ_SIZE }
    }
}

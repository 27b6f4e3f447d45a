use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use micro_bridge::connection::{ConnectionConfig, HttpConnection};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::app::TasksApp;
use crate::store::TaskStore;

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    store: Option<Arc<TaskStore>>,
    config: ConnectionConfig,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, store: None, config: ConnectionConfig::default() }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    /// Serves an existing store instead of a fresh empty one.
    pub fn store(mut self, store: Arc<TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(|source| ServerBuildError::InvalidAddress { source })?;
        if address.is_empty() {
            return Err(ServerBuildError::MissingAddress);
        }

        let store = self.store.unwrap_or_default();
        let app = Arc::new(TasksApp::new(store)?);
        Ok(Server { app, address, config: self.config })
    }
}

#[derive(Debug)]
pub struct Server {
    app: Arc<TasksApp>,
    address: Vec<SocketAddr>,
    config: ConnectionConfig,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("address can't be resolved: {source}")]
    InvalidAddress { source: io::Error },
    #[error("route can't be registered: {source}")]
    Route {
        #[from]
        source: matchit::InsertError,
    },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn app(&self) -> &Arc<TasksApp> {
        &self.app
    }

    /// Binds the configured address and serves connections until the task is dropped.
    pub async fn start(self) -> io::Result<()> {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Accepts connections from `tcp_listener` forever, one task per connection.
    pub async fn serve(self, tcp_listener: TcpListener) {
        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let app = Arc::clone(&self.app);
            let config = self.config;
            let local_addr = tcp_stream.local_addr().ok();
            debug!(client = %remote_addr, "accept connection");

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::with_config(reader, writer, config).with_addresses(local_addr, Some(remote_addr));
                connection.process(app).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_required() {
        let result = Server::builder().build();
        assert!(matches!(result, Err(ServerBuildError::MissingAddress)));
    }

    #[test]
    fn build_with_store() {
        let store = Arc::new(TaskStore::new());
        store.create("a".into());

        let server = Server::builder().address("127.0.0.1:0").store(store.clone()).build().unwrap();
        assert_eq!(server.app().store().len(), 1);
        assert_eq!(server.address, vec!["127.0.0.1:0".parse::<SocketAddr>().unwrap()]);
    }

    #[test]
    fn unresolvable_address() {
        let result = Server::builder().address("not an address").build();
        assert!(matches!(result, Err(ServerBuildError::InvalidAddress { .. })));
    }
}

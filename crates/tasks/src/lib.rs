//! An in-memory task store served over the micro bridge
//!
//! [`TasksApp`] is an [`Application`](micro_bridge::app::Application) exposing
//! create, read, update and delete operations on a [`TaskStore`]. [`Server`]
//! accepts TCP connections and drives one
//! [`HttpConnection`](micro_bridge::connection::HttpConnection) per client.
//!
//! # Example
//!
//! ```no_run
//! use micro_tasks::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = Server::builder().address("127.0.0.1:8000").build()?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

mod app;
mod error;
mod server;
mod store;

pub use app::MAX_BODY_SIZE;
pub use app::TasksApp;
pub use error::ApiError;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use store::Task;
pub use store::TaskStore;

use std::env;
use std::error::Error;

use micro_tasks::Server;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_ADDRESS: &str = "127.0.0.1:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let address = env::var("TASKS_ADDR").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let server = Server::builder().address(address.as_str()).build()?;

    tokio::select! {
        result = server.start() => {
            result?;
        }

        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

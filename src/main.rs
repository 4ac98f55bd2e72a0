//! tillsync - Point-of-Sale Register Sync Client
//!
//! A terminal register display that mirrors its running total to a backend
//! over a persistent WebSocket connection.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tillsync::connection::{RetryPolicy, WsConnector};
use tillsync::identity::FileIdentityStore;
use tillsync::Application;

/// Terminal register display synchronized to a backend over WebSocket.
#[derive(Debug, Parser)]
#[command(name = "tillsync", version = tillsync::VERSION)]
struct Cli {
    /// Backend host (host or host:port); the client dials <host>/ws
    #[arg(long, default_value = "localhost:8080")]
    host: String,

    /// Use wss:// instead of ws://
    #[arg(long)]
    tls: bool,

    /// Override the identity file location
    #[arg(long)]
    identity_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development and operator visibility
    env_logger::init();

    let cli = Cli::parse();

    let identity_store = match cli.identity_file {
        Some(path) => FileIdentityStore::new(path),
        None => FileIdentityStore::default_location()?,
    };
    let connector = Arc::new(WsConnector::new(&cli.host, cli.tls));

    let app = Application::new(&identity_store, connector, RetryPolicy::default())?;
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_constant() {
        // Ensure version is accessible
        assert!(!tillsync::VERSION.is_empty());
    }
}

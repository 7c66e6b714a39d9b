//! HTTP server binary for the quotes service.
//!
//! Wires the SQLite store and the REST API together with configuration
//! parsing and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use quotes_api::{router::Router, server::Server};
use quotes_store::{Store, StoreConfig};

/// Command-line arguments for the quotes server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// SQLite connection string; falls back to DATABASE_URL, then a local
    /// file-backed database
    #[arg(long)]
    database_url: Option<String>,

    /// Upper bound on pooled database connections
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = StoreConfig {
        max_connections: args.max_connections,
        ..Default::default()
    };
    if let Some(url) = args.database_url.or_else(|| std::env::var("DATABASE_URL").ok()) {
        config.database_url = url;
    }

    let store = Store::connect(&config)
        .await
        .context("failed to connect to database")?;
    store
        .migrate()
        .await
        .context("failed to apply migrations")?;

    let router = Router::new(Arc::new(store));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid host/port")?;
    let server = Server::new(addr, router);

    tracing::info!("Starting quotes server on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c().await.context("failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server...");
    server_handle.abort();

    Ok(())
}

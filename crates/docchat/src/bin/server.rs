//! docchat server binary
//!
//! Run with: cargo run -p docchat --bin docchat-server -- --config docchat.toml

use clap::Parser;
use docchat::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chat with an uploaded document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "DOCCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config and DOCCHAT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and DOCCHAT_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            RagConfig::from_file(path)?
        }
        None => RagConfig::default(),
    };
    config.apply_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding service: {} ({:?})", config.embeddings.url, config.embeddings.backend);
    tracing::info!("  - Generation service: {} ({:?})", config.llm.url, config.llm.backend);
    tracing::info!("  - Vector store: {:?} at {}", config.vector_db.backend, config.vector_db.url);
    tracing::info!(
        "  - Chunking: {} paragraphs, overlap {}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let server = RagServer::new(config)?;

    tracing::info!("Health: http://{}/health", server.address());
    tracing::info!("API info: http://{}/api/info", server.address());

    server.start().await?;

    Ok(())
}

//! Chat Relay Server
//!
//! Forwards chat requests to the highest-priority configured LLM provider
//! and answers from the built-in demo responder when none is available.

use anyhow::Result;
use chat_relay::{server, RelayConfig};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(about = "HTTP relay for chat-style LLM requests")]
struct Args {
    /// Server port
    #[arg(short, long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Server host
    #[arg(long, default_value = "0.0.0.0", env = "RELAY_HOST")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chat_relay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    // Credentials are read once here; the config is immutable afterwards.
    let config = RelayConfig::from_env();

    info!("Starting Chat Relay Server");
    info!("  Host: {}", args.host);
    info!("  Port: {}", args.port);

    server::run_server(config, &args.host, args.port).await
}

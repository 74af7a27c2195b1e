// src/main.rs

//! The main entry point for the lmslink client binary.

use anyhow::Result;
use lmslink::config::Config;
use lmslink::connection::ConnectionHandler;
use lmslink::core::events::TagEvent;
use std::env;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("lmslink version {VERSION}");
        return Ok(());
    }

    // Determine the configuration path. It can be provided via a --config
    // flag; otherwise, it defaults to "lmslink.toml".
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("lmslink.toml");

    // Load the configuration. If loading fails, print the error and exit,
    // as the client cannot run without knowing the server and player.
    let mut config = match Config::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e}");
            std::process::exit(1);
        }
    };

    // Override port if provided as a command-line argument.
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        match args.get(port_index + 1).map(|s| s.parse::<u16>()) {
            Some(Ok(port)) => config.port = port,
            _ => {
                eprintln!("--port flag requires a valid port number");
                std::process::exit(1);
            }
        }
    }

    // Setup logging with compact format and ANSI colors; RUST_LOG wins
    // over the configured level.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    info!(
        "Starting lmslink {VERSION}: server {}, target player \"{}\"",
        config.server_addr(),
        config.player
    );

    let config = Arc::new(config);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let (tag_tx, tag_rx) = mpsc::channel(16);

    let handler = ConnectionHandler::new(config, tag_rx, shutdown_rx);
    let client_task = tokio::spawn(handler.run());

    // Stand-in for the tag-sensing subsystem: tag ids arrive on stdin.
    tokio::spawn(read_tag_events(tag_tx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());

    if let Err(e) = client_task.await {
        error!("Client task failed: {e}");
    }
    Ok(())
}

/// Feeds tag events from stdin: one tag id per line, the literal line
/// `removed` reports that the current tag left the reader.
async fn read_tag_events(tag_tx: mpsc::Sender<TagEvent>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let event = match line.trim() {
            "" => continue,
            "removed" => TagEvent::Removed,
            tag_id => TagEvent::Present(tag_id.to_string()),
        };
        if tag_tx.send(event).await.is_err() {
            break;
        }
    }
}

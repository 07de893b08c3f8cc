//! tictactoe_web - unified CLI
//!
//! Runs either the game server or the terminal client.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, env_port};
use std::path::PathBuf;
use tictactoe_web::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            static_dir,
        } => run_server(config, host, port, static_dir).await,
        Command::Play { server_url } => tictactoe_web::tui::run_tui(server_url).await,
    }
}

/// Run the HTTP game server
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = port.or_else(|| env_port(std::env::var("PORT").ok().as_deref()));

    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    }
    .with_overrides(host, port, static_dir);

    info!(?config, "Starting tic-tac-toe server");

    tictactoe_web::serve(&config)
        .await
        .with_context(|| format!("serving on {}", config.bind_addr()))?;

    Ok(())
}

//! Command-line interface for tictactoe_web.

use clap::{Parser, Subcommand};

/// Tic-tac-toe game server and terminal client
#[derive(Parser, Debug)]
#[command(name = "tictactoe_web")]
#[command(about = "Tic-tac-toe over HTTP: JSON game server and terminal thin client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML config file (host, port, static_dir)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (default 0.0.0.0, every interface)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to; falls back to the PORT env var
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static files served for non-API paths
        #[arg(long)]
        static_dir: Option<std::path::PathBuf>,
    },

    /// Play in the terminal against a running server
    Play {
        /// Game server URL
        #[arg(long, env = "TICTACTOE_SERVER_URL", default_value = "http://localhost:8000")]
        server_url: String,
    },
}

/// Parses a `PORT` environment value. Anything that isn't a valid port is
/// ignored so the configured port applies.
pub fn env_port(value: Option<&str>) -> Option<u16> {
    value.and_then(|p| p.trim().parse().ok())
}

//! Tic-tac-toe over HTTP.
//!
//! A small game server owns a single shared game and exposes it as JSON;
//! a thin terminal client renders whatever the server reports and posts
//! moves and resets back.
//!
//! # Architecture
//!
//! - **Games**: board, turn and winner rules (server side)
//! - **Api**: JSON wire types shared by both ends
//! - **Server**: axum router for `/api/state`, `/api/move`, `/api/reset` and static files
//! - **Client**: the three REST calls behind the [`GameApi`] trait
//! - **View**: render and request handlers, independent of any terminal
//! - **Tui**: ratatui front end driving the view
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictactoe_web::{Controller, GameClient};
//!
//! # async fn example() {
//! let api = Arc::new(GameClient::new("http://localhost:8000"));
//! let mut controller = Controller::new(api);
//! controller.refresh().await.ok();
//! controller.apply_pending();
//! println!("{}", controller.view().status());
//! # }
//! ```

#![warn(missing_docs)]

mod api;
mod client;
mod config;
mod error;
mod games;
mod server;
mod view;

pub mod tui;

// Crate-level exports - Wire types
pub use api::{Cell, GameState, MoveRequest, MoveResult, Winner};

// Crate-level exports - Client
pub use client::{GameApi, GameClient};

// Crate-level exports - Configuration and errors
pub use config::ServerConfig;
pub use error::{ClientError, ConfigError};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{Board, Game, GameStatus, MoveError, Player, Square};

// Crate-level exports - Server
pub use server::{
    AppState, INVALID_PAYLOAD, build_router, content_type_for, resolve_static_path, serve,
};

// Crate-level exports - View-Controller
pub use view::{
    CellView, Controller, FETCH_FAILED, INVALID_MOVE, LOADING, NETWORK_ERROR, View, ViewUpdate,
    render_cells, status_line,
};

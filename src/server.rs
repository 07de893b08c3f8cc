//! HTTP game server: JSON API plus static files.

use crate::api::{MoveRequest, MoveResult};
use crate::config::ServerConfig;
use crate::games::tictactoe::Game;
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Message sent when a move body can't be parsed.
pub const INVALID_PAYLOAD: &str = r#"Invalid JSON payload (expected { "pos": 1..9 })"#;

/// Shared state behind every handler: one game for all clients.
#[derive(Debug, Clone)]
pub struct AppState {
    game: Arc<Mutex<Game>>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    /// Creates state with a fresh game.
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            game: Arc::new(Mutex::new(Game::new())),
            static_dir: Arc::new(static_dir.into()),
        }
    }

    /// Locks the game, recovering from poisoning.
    fn game(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builds the router: `/api/state`, `/api/move`, `/api/reset`, and static
/// files for everything else.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/move", post(make_move))
        .route("/api/reset", post(reset_game))
        .fallback(serve_static)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

/// Binds to the configured address and serves until the process stops.
#[instrument(skip_all, fields(addr = %config.bind_addr()))]
pub async fn serve(config: &ServerConfig) -> std::io::Result<()> {
    let app = build_router(AppState::new(config.static_dir().clone()));
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        static_dir = %config.static_dir().display(),
        "Server running at http://localhost:{}",
        config.port()
    );
    axum::serve(listener, app).await
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
        Json(body),
    )
        .into_response()
}

#[instrument(skip_all)]
async fn get_state(State(state): State<AppState>) -> Response {
    let snapshot = state.game().snapshot();
    json_response(StatusCode::OK, snapshot)
}

#[instrument(skip_all)]
async fn make_move(State(state): State<AppState>, body: Bytes) -> Response {
    let request: MoveRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed move payload");
            return json_response(
                StatusCode::BAD_REQUEST,
                MoveResult::rejected(INVALID_PAYLOAD, None),
            );
        }
    };

    let mut game = state.game();
    match game.make_move(request.pos) {
        Ok(()) => {
            info!(pos = request.pos, winner = ?game.winner(), "Move accepted");
            json_response(
                StatusCode::OK,
                MoveResult::accepted("Move accepted.", game.snapshot()),
            )
        }
        Err(e) => {
            info!(pos = request.pos, reason = %e, "Move rejected");
            json_response(
                StatusCode::BAD_REQUEST,
                MoveResult::rejected(e.to_string(), Some(game.snapshot())),
            )
        }
    }
}

#[instrument(skip_all)]
async fn reset_game(State(state): State<AppState>) -> Response {
    let mut game = state.game();
    game.reset();
    info!("Game reset");
    json_response(StatusCode::OK, MoveResult::accepted("Reset", game.snapshot()))
}

fn not_found() -> Response {
    plain_text(StatusCode::NOT_FOUND, "Not Found")
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

async fn method_not_allowed() -> Response {
    plain_text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Content type for a static file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        _ => "application/octet-stream; charset=utf-8",
    }
}

/// Maps a request path onto the static directory.
///
/// `/` becomes `/index.html`. Returns `None` for any path with `..` or
/// other non-normal components.
pub fn resolve_static_path(static_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let request_path = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };

    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    Some(static_dir.join(relative))
}

#[instrument(skip(state))]
async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(candidate) = resolve_static_path(&state.static_dir, uri.path()) else {
        warn!("Rejected static path");
        return not_found();
    };

    // Symlinks may still point outside the directory.
    let (Ok(root), Ok(file)) = (
        tokio::fs::canonicalize(state.static_dir.as_path()).await,
        tokio::fs::canonicalize(&candidate).await,
    ) else {
        debug!(path = %candidate.display(), "Static file not found");
        return not_found();
    };
    if !file.starts_with(&root) {
        warn!(path = %file.display(), "Static path escapes root");
        return not_found();
    }

    match tokio::fs::read(&file).await {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&file))],
            data,
        )
            .into_response(),
        Err(e) => {
            debug!(path = %file.display(), error = %e, "Static file unreadable");
            not_found()
        }
    }
}

//! REST client for the game server.

use crate::api::{GameState, MoveRequest, MoveResult};
use crate::error::ClientError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// The three calls a thin client makes against the game server.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// `GET /api/state`.
    async fn fetch_state(&self) -> Result<GameState, ClientError>;

    /// `POST /api/move` with `{ "pos": pos }`.
    ///
    /// `pos` is passed through unchecked; rejections come back as
    /// `MoveResult { ok: false, .. }`, not as errors.
    async fn post_move(&self, pos: i64) -> Result<MoveResult, ClientError>;

    /// `POST /api/reset`. The body is returned as-is.
    async fn post_reset(&self) -> Result<serde_json::Value, ClientError>;
}

/// HTTP game client backed by reqwest.
#[derive(Debug, Clone)]
pub struct GameClient {
    base_url: String,
    client: reqwest::Client,
}

impl GameClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:8000`).
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!("Creating game client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl GameApi for GameClient {
    #[instrument(skip(self))]
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        debug!("Getting game state via REST");

        let state: GameState = self
            .client
            .get(self.endpoint("state"))
            .send()
            .await?
            .json()
            .await?;

        debug!(turn = %state.turn, winner = ?state.winner, "Got game state");
        Ok(state)
    }

    #[instrument(skip(self))]
    async fn post_move(&self, pos: i64) -> Result<MoveResult, ClientError> {
        info!("Making move");

        // Rejected moves arrive as 400 with a MoveResult body.
        let response = self
            .client
            .post(self.endpoint("move"))
            .json(&MoveRequest { pos })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body = %body, "Got move response");

        let result: MoveResult = serde_json::from_str(&body)?;
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn post_reset(&self) -> Result<serde_json::Value, ClientError> {
        info!("Resetting game");

        let body: serde_json::Value = self
            .client
            .post(self.endpoint("reset"))
            .send()
            .await?
            .json()
            .await?;

        debug!(response = %body, "Got reset response");
        Ok(body)
    }
}

//! View-Controller for the thin client.
//!
//! The [`View`] is a plain description of what the front end shows: nine
//! cells and a status line. It is rebuilt wholesale from each server
//! snapshot and never edited cell by cell.
//!
//! The [`Controller`] turns user interactions into requests. Every
//! interaction runs as its own spawned task and reports back through
//! [`ViewUpdate`]s, so the UI loop never waits on the network. In-flight
//! requests are not coordinated: if two overlap, the last update applied
//! wins.

use crate::api::{Cell, GameState, Winner};
use crate::client::GameApi;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Status shown when the state can't be fetched.
pub const FETCH_FAILED: &str = "Failed to reach server";
/// Status shown when a move request fails in transport.
pub const NETWORK_ERROR: &str = "Network error";
/// Status shown when the server rejects a move without saying why.
pub const INVALID_MOVE: &str = "Invalid move";
/// Status shown before the first snapshot arrives.
pub const LOADING: &str = "Loading...";

/// One rendered board cell.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct CellView {
    /// Text displayed in the cell: the mark, or empty.
    pub text: String,
    /// 1-based index to post when clicked; `None` for occupied cells.
    pub pos: Option<i64>,
}

impl CellView {
    /// Whether clicking this cell does anything.
    pub fn is_clickable(&self) -> bool {
        self.pos.is_some()
    }
}

/// Instruction from a request task to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Rebuild the board and status from a snapshot.
    Render(GameState),
    /// Replace the status text only.
    Status(String),
}

/// What the front end displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    cells: Vec<CellView>,
    status: String,
}

impl Default for View {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            status: LOADING.to_string(),
        }
    }
}

impl View {
    /// Creates an empty view showing the loading status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds cells and status from a snapshot.
    #[instrument(skip_all, fields(turn = %state.turn, winner = ?state.winner))]
    pub fn render(&mut self, state: &GameState) {
        self.cells = render_cells(state);
        self.status = status_line(state);
        debug!(status = %self.status, "Rendered state");
    }

    /// Replaces the status text.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Applies an update from a request task.
    pub fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Render(state) => self.render(&state),
            ViewUpdate::Status(status) => self.set_status(status),
        }
    }

    /// Rendered cells, in board order.
    pub fn cells(&self) -> &[CellView] {
        &self.cells
    }

    /// Cell at a 0-based board index.
    pub fn cell(&self, index: usize) -> Option<&CellView> {
        self.cells.get(index)
    }

    /// Current status text.
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// Builds cell views: marks are inert, everything else is clickable with
/// its 1-based index.
pub fn render_cells(state: &GameState) -> Vec<CellView> {
    state
        .board
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Cell::Marked(player) => CellView::new(player.to_string(), None),
            Cell::Open(_) => CellView::new(String::new(), Some(i as i64 + 1)),
        })
        .collect()
}

/// Status line for a snapshot.
pub fn status_line(state: &GameState) -> String {
    match state.winner {
        None => format!("{}'s turn — click an empty cell", state.turn),
        Some(Winner::Draw) => "It's a draw!".to_string(),
        Some(winner) => format!("{} wins!", winner),
    }
}

fn emit(updates: &mpsc::UnboundedSender<ViewUpdate>, update: ViewUpdate) {
    if updates.send(update).is_err() {
        debug!("View closed, dropping update");
    }
}

/// Fetches the state and renders it.
///
/// On failure the status becomes [`FETCH_FAILED`]; nothing is retried.
#[instrument(skip_all)]
pub(crate) async fn refresh<A: GameApi + ?Sized>(api: &A, updates: &mpsc::UnboundedSender<ViewUpdate>) {
    match api.fetch_state().await {
        Ok(state) => emit(updates, ViewUpdate::Render(state)),
        Err(e) => {
            error!(error = %e, "Failed to fetch state");
            emit(updates, ViewUpdate::Status(FETCH_FAILED.to_string()));
        }
    }
}

/// Posts a move and shows the outcome.
///
/// A rejection shows the server's message, or [`INVALID_MOVE`] if it sent
/// none. An accepted move renders the returned state, or re-fetches when
/// the response carries no state.
#[instrument(skip(api, updates))]
pub(crate) async fn submit_move<A: GameApi + ?Sized>(
    api: &A,
    pos: i64,
    updates: &mpsc::UnboundedSender<ViewUpdate>,
) {
    let result = match api.post_move(pos).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Move request failed");
            emit(updates, ViewUpdate::Status(NETWORK_ERROR.to_string()));
            return;
        }
    };

    if !result.ok {
        let message = result
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| INVALID_MOVE.to_string());
        info!(message = %message, "Move rejected");
        emit(updates, ViewUpdate::Status(message));
        return;
    }

    match result.state {
        Some(state) => emit(updates, ViewUpdate::Render(state)),
        None => refresh(api, updates).await,
    }
}

/// Posts a reset, then refreshes regardless of how the reset went.
#[instrument(skip_all)]
pub(crate) async fn reset<A: GameApi + ?Sized>(api: &A, updates: &mpsc::UnboundedSender<ViewUpdate>) {
    if let Err(e) = api.post_reset().await {
        warn!(error = %e, "Reset request failed");
    }
    refresh(api, updates).await;
}

/// Turns interactions into request tasks and collects their updates.
pub struct Controller<A> {
    api: Arc<A>,
    view: View,
    updates_tx: mpsc::UnboundedSender<ViewUpdate>,
    updates_rx: mpsc::UnboundedReceiver<ViewUpdate>,
}

impl<A: GameApi + 'static> Controller<A> {
    /// Creates a controller with an empty view.
    pub fn new(api: Arc<A>) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            api,
            view: View::new(),
            updates_tx,
            updates_rx,
        }
    }

    /// Current view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Spawns a fetch-then-render.
    pub fn refresh(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let updates = self.updates_tx.clone();
        tokio::spawn(async move { refresh(api.as_ref(), &updates).await })
    }

    /// Handles a click on the cell at a 0-based board index.
    ///
    /// Returns `None` without touching the network when the cell carries no
    /// index (occupied, or not rendered yet).
    #[instrument(skip(self))]
    pub fn click(&self, index: usize) -> Option<JoinHandle<()>> {
        let Some(pos) = self.view.cell(index).and_then(|cell| cell.pos) else {
            debug!("Click on inert cell ignored");
            return None;
        };

        let api = Arc::clone(&self.api);
        let updates = self.updates_tx.clone();
        Some(tokio::spawn(async move {
            submit_move(api.as_ref(), pos, &updates).await
        }))
    }

    /// Spawns a reset followed by a refresh.
    pub fn reset(&self) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let updates = self.updates_tx.clone();
        tokio::spawn(async move { reset(api.as_ref(), &updates).await })
    }

    /// Applies every update that has arrived so far. Returns how many.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.view.apply(update);
            applied += 1;
        }
        applied
    }
}

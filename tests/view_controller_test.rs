//! Tests for the View-Controller request/render cycle.

use async_trait::async_trait;
use crossterm::event::KeyCode;
use serde_json::json;
use std::sync::{Arc, Mutex};

use tictactoe_web::tui::{App, Flow};
use tictactoe_web::{
    ClientError, Controller, FETCH_FAILED, GameApi, GameState, INVALID_MOVE, MoveResult,
    NETWORK_ERROR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Fetch,
    Move(i64),
    Reset,
}

/// Scripted server. `None` responses fail in transport.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    state: Mutex<Option<GameState>>,
    move_result: Mutex<Option<MoveResult>>,
    reset_fails: bool,
}

impl FakeApi {
    fn serving(state: GameState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    fn with_move_result(self, result: MoveResult) -> Self {
        *self.move_result.lock().unwrap() = Some(result);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl GameApi for FakeApi {
    async fn fetch_state(&self) -> Result<GameState, ClientError> {
        self.calls.lock().unwrap().push(Call::Fetch);
        self.state
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::new("connection refused"))
    }

    async fn post_move(&self, pos: i64) -> Result<MoveResult, ClientError> {
        self.calls.lock().unwrap().push(Call::Move(pos));
        self.move_result
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::new("connection reset"))
    }

    async fn post_reset(&self) -> Result<serde_json::Value, ClientError> {
        self.calls.lock().unwrap().push(Call::Reset);
        if self.reset_fails {
            Err(ClientError::new("connection refused"))
        } else {
            Ok(json!({ "ok": true }))
        }
    }
}

fn state(board: [&str; 9], turn: &str, winner: Option<&str>) -> GameState {
    serde_json::from_value(json!({ "board": board, "turn": turn, "winner": winner }))
        .expect("valid state")
}

fn fresh() -> GameState {
    state(["1", "2", "3", "4", "5", "6", "7", "8", "9"], "X", None)
}

/// Builds a controller and renders the fake's initial state.
async fn loaded(api: FakeApi) -> (Arc<FakeApi>, Controller<FakeApi>) {
    let api = Arc::new(api);
    let mut controller = Controller::new(Arc::clone(&api));
    controller.refresh().await.expect("refresh task");
    controller.apply_pending();
    api.clear_calls();
    (api, controller)
}

#[tokio::test]
async fn test_refresh_renders_empty_board() {
    let (_api, controller) = loaded(FakeApi::serving(fresh())).await;

    let cells = controller.view().cells();
    assert_eq!(cells.len(), 9);
    let positions: Vec<_> = cells.iter().map(|c| c.pos).collect();
    assert_eq!(positions, (1..=9).map(Some).collect::<Vec<_>>());
    assert!(cells.iter().all(|c| c.text.is_empty()));
    assert_eq!(controller.view().status(), "X's turn — click an empty cell");
}

#[tokio::test]
async fn test_refresh_failure_sets_status() {
    let api = Arc::new(FakeApi::default());
    let mut controller = Controller::new(Arc::clone(&api));

    controller.refresh().await.expect("refresh task");
    controller.apply_pending();

    assert_eq!(controller.view().status(), FETCH_FAILED);
    assert_eq!(api.calls(), [Call::Fetch]);
}

#[tokio::test]
async fn test_click_occupied_cell_makes_no_request() {
    let board = ["X", "2", "3", "4", "5", "6", "7", "8", "9"];
    let (api, controller) = loaded(FakeApi::serving(state(board, "O", None))).await;

    assert!(controller.click(0).is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_click_before_first_render_is_ignored() {
    let api = Arc::new(FakeApi::serving(fresh()));
    let controller = Controller::new(Arc::clone(&api));

    assert!(controller.click(4).is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_accepted_move_renders_returned_state() {
    let after = state(["1", "2", "3", "4", "X", "6", "7", "8", "9"], "O", None);
    let api = FakeApi::serving(fresh()).with_move_result(MoveResult::accepted("Move accepted.", after));
    let (api, mut controller) = loaded(api).await;

    controller.click(4).expect("cell is clickable").await.expect("move task");
    controller.apply_pending();

    assert_eq!(api.calls(), [Call::Move(5)]);
    assert_eq!(controller.view().cells()[4].text, "X");
    assert!(!controller.view().cells()[4].is_clickable());
    assert_eq!(controller.view().status(), "O's turn — click an empty cell");
}

#[tokio::test]
async fn test_accepted_move_without_state_refetches() {
    let api = FakeApi::serving(fresh()).with_move_result(MoveResult {
        ok: true,
        message: None,
        state: None,
    });
    let (api, mut controller) = loaded(api).await;

    controller.click(8).expect("cell is clickable").await.expect("move task");
    controller.apply_pending();

    assert_eq!(api.calls(), [Call::Move(9), Call::Fetch]);
}

#[tokio::test]
async fn test_rejected_move_shows_server_message() {
    let api = FakeApi::serving(fresh()).with_move_result(MoveResult::rejected("cell taken", None));
    let (_api, mut controller) = loaded(api).await;

    controller.click(0).expect("cell is clickable").await.expect("move task");
    controller.apply_pending();

    assert_eq!(controller.view().status(), "cell taken");
    // Board stays as it was.
    assert!(controller.view().cells()[0].is_clickable());
}

#[tokio::test]
async fn test_rejected_move_without_message_uses_fallback() {
    for message in [None, Some(String::new())] {
        let api = FakeApi::serving(fresh()).with_move_result(MoveResult {
            ok: false,
            message,
            state: None,
        });
        let (_api, mut controller) = loaded(api).await;

        controller.click(0).expect("cell is clickable").await.expect("move task");
        controller.apply_pending();

        assert_eq!(controller.view().status(), INVALID_MOVE);
    }
}

#[tokio::test]
async fn test_move_transport_failure_shows_network_error() {
    let (api, mut controller) = loaded(FakeApi::serving(fresh())).await;

    controller.click(2).expect("cell is clickable").await.expect("move task");
    controller.apply_pending();

    assert_eq!(api.calls(), [Call::Move(3)]);
    assert_eq!(controller.view().status(), NETWORK_ERROR);
}

#[tokio::test]
async fn test_reset_always_refreshes() {
    let (api, mut controller) = loaded(FakeApi::serving(fresh())).await;
    controller.reset().await.expect("reset task");
    controller.apply_pending();
    assert_eq!(api.calls(), [Call::Reset, Call::Fetch]);

    let failing = FakeApi {
        reset_fails: true,
        ..FakeApi::serving(fresh())
    };
    let (api, mut controller) = loaded(failing).await;
    controller.reset().await.expect("reset task");
    controller.apply_pending();
    assert_eq!(api.calls(), [Call::Reset, Call::Fetch]);
    assert_eq!(controller.view().status(), "X's turn — click an empty cell");
}

#[tokio::test]
async fn test_game_over_statuses() {
    let won = state(["X", "X", "X", "O", "O", "6", "7", "8", "9"], "X", Some("X"));
    let (_api, controller) = loaded(FakeApi::serving(won)).await;
    assert_eq!(controller.view().status(), "X wins!");

    let drawn = state(["X", "O", "X", "X", "O", "O", "O", "X", "X"], "X", Some("draw"));
    let (_api, controller) = loaded(FakeApi::serving(drawn)).await;
    assert_eq!(controller.view().status(), "It's a draw!");
    assert!(controller.view().cells().iter().all(|c| !c.is_clickable()));
}

#[tokio::test]
async fn test_app_digit_key_clicks_cell() {
    let after = state(["1", "2", "3", "4", "5", "6", "X", "8", "9"], "O", None);
    let api = FakeApi::serving(fresh()).with_move_result(MoveResult::accepted("Move accepted.", after));
    let (api, controller) = loaded(api).await;
    let mut app = App::new(controller);

    assert_eq!(app.handle_key(KeyCode::Char('7')), Flow::Continue);
    assert_eq!(app.cursor(), 6);

    // The move runs on a spawned task; wait for its update.
    for _ in 0..100 {
        app.tick();
        if app.view().cells()[6].text == "X" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(api.calls(), [Call::Move(7)]);
    assert_eq!(app.view().cells()[6].text, "X");
}

#[tokio::test]
async fn test_app_quit_keys() {
    let (_api, controller) = loaded(FakeApi::serving(fresh())).await;
    let mut app = App::new(controller);

    assert_eq!(app.handle_key(KeyCode::Left), Flow::Continue);
    assert_eq!(app.cursor(), 3);
    assert_eq!(app.handle_key(KeyCode::Char('q')), Flow::Quit);
    assert_eq!(app.handle_key(KeyCode::Esc), Flow::Quit);
}

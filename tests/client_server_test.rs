//! End-to-end tests: the REST client and controller against a live server.

use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

use tictactoe_web::{AppState, Cell, Controller, GameApi, GameClient, Player, Winner, build_router};

/// Starts a server on an ephemeral port and returns its base URL.
async fn spawn_server() -> (String, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let app = build_router(AppState::new(dir.path()));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });
    (format!("http://{}", addr), dir)
}

#[tokio::test]
async fn test_client_plays_a_game() {
    let (url, _dir) = spawn_server().await;
    let client = GameClient::new(&url);

    let state = client.fetch_state().await.expect("state");
    assert_eq!(state.board.len(), 9);
    assert!(state.board.iter().all(|c| c.mark().is_none()));
    assert_eq!(state.turn, Player::X);

    for pos in [1, 4, 2, 5] {
        let result = client.post_move(pos).await.expect("move");
        assert!(result.ok);
    }
    let result = client.post_move(3).await.expect("move");
    let state = result.state.expect("state in move result");
    assert_eq!(state.winner, Some(Winner::X));
    assert_eq!(state.board[2], Cell::Marked(Player::X));
}

#[tokio::test]
async fn test_client_surfaces_rejection_as_result() {
    let (url, _dir) = spawn_server().await;
    let client = GameClient::new(&url);

    client.post_move(7).await.expect("move");
    let result = client.post_move(7).await.expect("400 still decodes");
    assert!(!result.ok);
    assert_eq!(result.message.as_deref(), Some("Slot already taken."));

    let result = client.post_move(0).await.expect("out of range decodes");
    assert_eq!(result.message.as_deref(), Some("Position out of range (1-9)."));
}

#[tokio::test]
async fn test_client_reset() {
    let (url, _dir) = spawn_server().await;
    let client = GameClient::new(&url);

    client.post_move(5).await.expect("move");
    let body = client.post_reset().await.expect("reset");
    assert_eq!(body["ok"], serde_json::json!(true));

    let state = client.fetch_state().await.expect("state");
    assert_eq!(state.board[4], Cell::Open("5".to_string()));
}

#[tokio::test]
async fn test_client_unreachable_server() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = GameClient::new(format!("http://{}", addr));
    assert!(client.fetch_state().await.is_err());
    assert!(client.post_move(1).await.is_err());
}

#[tokio::test]
async fn test_controller_against_server() {
    let (url, _dir) = spawn_server().await;
    let mut controller = Controller::new(Arc::new(GameClient::new(&url)));

    controller.refresh().await.expect("refresh task");
    controller.apply_pending();
    assert_eq!(controller.view().status(), "X's turn — click an empty cell");

    controller.click(4).expect("clickable").await.expect("move task");
    controller.apply_pending();
    assert_eq!(controller.view().cells()[4].text, "X");
    assert_eq!(controller.view().status(), "O's turn — click an empty cell");

    // Occupied now: no request, view unchanged.
    assert!(controller.click(4).is_none());

    controller.reset().await.expect("reset task");
    controller.apply_pending();
    assert!(controller.view().cells()[4].is_clickable());
}

//! JSON wire types shared by the client and the server.
//!
//! The server is the only producer of [`GameState`]; clients replace
//! whatever they show with the latest snapshot and never patch it.

use crate::games::tictactoe::Player;
use serde::{Deserialize, Serialize};

/// One board cell as it appears on the wire.
///
/// `"X"` and `"O"` are marks. Any other value is an empty cell; the server
/// sends the cell's 1-based label (`"1"`..`"9"`) there, but clients must not
/// rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum Cell {
    /// Cell holds a player's mark.
    Marked(Player),
    /// Empty cell, with whatever text the server put there.
    Open(String),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(&self) -> Option<Player> {
        match self {
            Cell::Marked(player) => Some(*player),
            Cell::Open(_) => None,
        }
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => match s.as_str() {
                "X" => Cell::Marked(Player::X),
                "O" => Cell::Marked(Player::O),
                _ => Cell::Open(s),
            },
            serde_json::Value::Null => Cell::Open(String::new()),
            other => Cell::Open(other.to_string()),
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Marked(player) => player.to_string(),
            Cell::Open(label) => label,
        }
    }
}

/// Terminal outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Board filled with no line.
    #[serde(rename = "draw")]
    #[strum(serialize = "draw")]
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

/// Snapshot of the game as reported by `GET /api/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Cells in row-major order.
    pub board: Vec<Cell>,
    /// Whose mark is next.
    pub turn: Player,
    /// Outcome, or `None` while the game is in progress.
    pub winner: Option<Winner>,
}

/// Response to `POST /api/move` (and, loosely, `POST /api/reset`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Whether the server accepted the request.
    pub ok: bool,
    /// Human-readable explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Game state after the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
}

impl MoveResult {
    /// Creates a successful result.
    pub fn accepted(message: impl Into<String>, state: GameState) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            state: Some(state),
        }
    }

    /// Creates a rejected result.
    pub fn rejected(message: impl Into<String>, state: Option<GameState>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            state,
        }
    }
}

/// Body of `POST /api/move`.
///
/// `pos` is a 1-based cell index. Range checks happen on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// 1-based cell index.
    pub pos: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_labelled_cells_decode_as_open() {
        let state: GameState = serde_json::from_value(json!({
            "board": ["X", "2", "3", "4", "O", "6", "7", "8", "9"],
            "turn": "X",
            "winner": null
        }))
        .unwrap();

        assert_eq!(state.board[0], Cell::Marked(Player::X));
        assert_eq!(state.board[1], Cell::Open("2".to_string()));
        assert_eq!(state.board[4].mark(), Some(Player::O));
        assert_eq!(state.winner, None);
    }

    #[test]
    fn test_null_and_blank_cells_are_open() {
        let state: GameState = serde_json::from_value(json!({
            "board": [null, "", " ", "X", "O", "x", "o", "-", 5],
            "turn": "O",
            "winner": null
        }))
        .unwrap();

        let marks: Vec<_> = state.board.iter().map(Cell::mark).collect();
        assert_eq!(
            marks,
            [None, None, None, Some(Player::X), Some(Player::O), None, None, None, None]
        );
    }

    #[test]
    fn test_draw_winner_wire_name() {
        let state: GameState = serde_json::from_value(json!({
            "board": [],
            "turn": "X",
            "winner": "draw"
        }))
        .unwrap();
        assert_eq!(state.winner, Some(Winner::Draw));
        assert_eq!(serde_json::to_value(Winner::Draw).unwrap(), json!("draw"));
        assert_eq!(Winner::Draw.to_string(), "draw");
    }

    #[test]
    fn test_move_result_optional_fields() {
        let result: MoveResult = serde_json::from_value(json!({ "ok": false })).unwrap();
        assert!(!result.ok);
        assert_eq!(result.message, None);
        assert_eq!(result.state, None);
    }

    #[test]
    fn test_move_request_body() {
        let body = serde_json::to_value(MoveRequest { pos: 5 }).unwrap();
        assert_eq!(body, json!({ "pos": 5 }));
    }
}

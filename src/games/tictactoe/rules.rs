//! Game logic and rules for tic-tac-toe.

use super::types::{Board, GameStatus, Player, Square};
use crate::api::{Cell, GameState, Winner};
use derive_more::Display;
use tracing::instrument;

/// Winning combinations, as board indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],             // Diagonals
];

/// Why a move was refused.
///
/// Checks run in declaration order: a finished game rejects every move,
/// even out-of-range ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveError {
    /// Game already has an outcome.
    #[display("Game already finished: {_0}")]
    Finished(Winner),
    /// Position outside 1..=9.
    #[display("Position out of range (1-9).")]
    OutOfRange,
    /// Square already holds a mark.
    #[display("Slot already taken.")]
    Occupied,
}

impl std::error::Error for MoveError {}

/// Tic-tac-toe game engine.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    turn: Player,
    status: GameStatus,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the board and hands the first move back to X.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the outcome in wire form, `None` while in progress.
    pub fn winner(&self) -> Option<Winner> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(player.into()),
            GameStatus::Draw => Some(Winner::Draw),
        }
    }

    /// Places the current player's mark at a 1-based position.
    ///
    /// The turn passes to the opponent only if the move didn't end the game.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn make_move(&mut self, pos: i64) -> Result<(), MoveError> {
        if let Some(winner) = self.winner() {
            return Err(MoveError::Finished(winner));
        }

        let index = match usize::try_from(pos) {
            Ok(p @ 1..=9) => p - 1,
            _ => return Err(MoveError::OutOfRange),
        };

        if !self.board.is_empty(index) {
            return Err(MoveError::Occupied);
        }

        self.board
            .set(index, Square::Occupied(self.turn))
            .map_err(|_| MoveError::OutOfRange)?;
        self.update_status();

        if self.status == GameStatus::InProgress {
            self.turn = self.turn.opponent();
        }

        Ok(())
    }

    /// Returns a wire snapshot; empty cells carry their 1-based label.
    pub fn snapshot(&self) -> GameState {
        let board = self
            .board
            .squares()
            .iter()
            .enumerate()
            .map(|(i, square)| match square {
                Square::Occupied(player) => Cell::Marked(*player),
                Square::Empty => Cell::Open((i + 1).to_string()),
            })
            .collect();

        GameState {
            board,
            turn: self.turn,
            winner: self.winner(),
        }
    }

    /// Updates game status after a move.
    fn update_status(&mut self) {
        if let Some(winner) = self.check_winner() {
            self.status = GameStatus::Won(winner);
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        }
    }

    /// Checks if there's a winner.
    fn check_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            match (self.board.get(a), self.board.get(b), self.board.get(c)) {
                (Some(Square::Occupied(p1)), Some(Square::Occupied(p2)), Some(Square::Occupied(p3)))
                    if p1 == p2 && p2 == p3 =>
                {
                    Some(p1)
                }
                _ => None,
            }
        })
    }
}

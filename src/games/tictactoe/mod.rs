//! Server-side tic-tac-toe model.

mod rules;
mod types;

pub use rules::{Game, MoveError};
pub use types::{Board, GameStatus, Player, Square};

//! Core Connect Four game logic: board representation, player types, and the
//! game engine state machine.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Position, COLS, CONNECT, ROWS};
pub use player::Player;
pub use state::{DropOutcome, GameEngine, GameStatus};

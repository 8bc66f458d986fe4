//! # Connect Four
//!
//! A Connect Four game engine with a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, engine state machine
//! - [`ui`] — Terminal UI host: key handling and board rendering
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod ui;

pub use error::{ConfigError, MoveError};
pub use game::{DropOutcome, GameEngine, GameStatus, Player};

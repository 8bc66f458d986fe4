use tracing::{debug, info, instrument};

use super::board::{Board, Position, CONNECT, COLS};
use super::Player;
use crate::error::MoveError;

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won(Player),
    Draw,
}

impl GameStatus {
    /// Check if no further drops are accepted
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The winning player, if any
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(*player),
            _ => None,
        }
    }
}

/// Result of a successful drop, for the host to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Token placed, game continues with the other player to move.
    Placed { position: Position, player: Player },
    /// Token placed and completed four in a row.
    Won {
        position: Position,
        player: Player,
        line: [Position; CONNECT],
    },
    /// Token filled the last empty cell without a win.
    Draw { position: Position, player: Player },
}

impl DropOutcome {
    /// Cell the token landed in
    pub fn position(&self) -> Position {
        match self {
            DropOutcome::Placed { position, .. }
            | DropOutcome::Won { position, .. }
            | DropOutcome::Draw { position, .. } => *position,
        }
    }

    /// Player whose token was placed
    pub fn player(&self) -> Player {
        match self {
            DropOutcome::Placed { player, .. }
            | DropOutcome::Won { player, .. }
            | DropOutcome::Draw { player, .. } => *player,
        }
    }
}

/// Connect Four state machine: owns the board and the turn indicator.
///
/// All mutation goes through [`GameEngine::drop_token`] and
/// [`GameEngine::reset`]. A drop either applies fully (token placed, win
/// checked, turn possibly flipped) or returns an error and leaves the engine
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    status: GameStatus,
    move_count: usize,
}

impl GameEngine {
    /// Create an engine with an empty board and Red to move
    pub fn new() -> Self {
        GameEngine {
            board: Board::new(),
            current_player: Player::Red, // Red starts
            status: GameStatus::InProgress,
            move_count: 0,
        }
    }

    /// Return to the empty board with Red to move, from any state
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Board reset");
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose token the next drop places. Frozen once the game ends.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Check if game is over
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Tokens placed since the last reset
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Columns that can still take a token (none once the game is over)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Check whether `player` has four in a row on the current board
    pub fn check_win(&self, player: Player) -> bool {
        self.board.check_win(player)
    }

    /// Drop the current player's token into `column`.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn drop_token(&mut self, column: usize) -> Result<DropOutcome, MoveError> {
        if self.is_over() {
            debug!(status = ?self.status, "Drop rejected, game is over");
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player).inspect_err(|e| {
            debug!(error = %e, "Drop rejected");
        })?;
        let position = Position::new(row, column);
        self.move_count += 1;

        debug!(row, column, move_count = self.move_count, "Token placed");

        if let Some(line) = self.board.winning_line(player) {
            self.status = GameStatus::Won(player);
            info!(%player, move_count = self.move_count, "Four in a row");
            return Ok(DropOutcome::Won {
                position,
                player,
                line,
            });
        }

        if self.board.is_full() {
            self.status = GameStatus::Draw;
            info!(move_count = self.move_count, "Board full, game drawn");
            return Ok(DropOutcome::Draw { position, player });
        }

        self.current_player = player.other();
        Ok(DropOutcome::Placed { position, player })
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

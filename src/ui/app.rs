use crate::config::UiConfig;
use crate::error::MoveError;
use crate::game::{DropOutcome, GameEngine, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

pub struct App {
    engine: GameEngine,
    selected_column: usize,
    start_column: usize,
    poll_interval: Duration,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: &UiConfig) -> Self {
        App {
            engine: GameEngine::new(),
            selected_column: config.start_column.min(COLS - 1),
            start_column: config.start_column.min(COLS - 1),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            should_quit: false,
            message: None,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        info!("Game started");
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        info!(moves = self.engine.move_count(), "Quit");
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_token(self.selected_column);
            }
            KeyCode::Char(c @ '1'..='9') => {
                // Column keys are 1-based on screen; out-of-range digits are
                // passed through so the engine reports them.
                let column = c as usize - '1' as usize;
                if column < COLS {
                    self.selected_column = column;
                }
                self.drop_token(column);
            }
            KeyCode::Char('r') => {
                self.engine.reset();
                self.selected_column = self.start_column;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    /// Drop a token in `column` and describe the result
    fn drop_token(&mut self, column: usize) {
        match self.engine.drop_token(column) {
            Ok(DropOutcome::Placed { .. }) => {}
            Ok(DropOutcome::Won { player, .. }) => {
                self.message = Some(format!("{} wins! Press 'r' to play again.", player));
            }
            Ok(DropOutcome::Draw { .. }) => {
                self.message = Some("It's a draw! Press 'r' to play again.".to_string());
            }
            Err(MoveError::ColumnFull { .. }) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(err @ MoveError::InvalidColumn { .. }) => {
                debug!(%err, "Host sent a column outside the board");
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game over! Press 'r' to restart.".to_string());
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.engine, self.selected_column, &self.message);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}

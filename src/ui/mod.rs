//! Terminal UI host: turns key presses into column drops and renders the
//! engine's board and outcomes.

mod app;
mod game_view;

pub use app::App;

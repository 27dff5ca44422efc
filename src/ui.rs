//! Ratatui front-end: the agenda table, search bar, entry form and the
//! confirmation dialogs around them.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;

//! Ratatui front-end: a song list, a document pane, and the modal file
//! browser, editor, search bar, and delete confirmation layered over them.

mod app;
mod browser;
mod forms;
mod helpers;
mod screens;
mod terminal;
mod theme;

pub use app::App;
pub use terminal::run_app;
pub use theme::Theme;

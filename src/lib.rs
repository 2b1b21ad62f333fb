//! Core library surface for the OnSong Library TUI application.
//!
//! The `bin` target wires these pieces together; keeping them in a library
//! lets the integration tests drive the same manager and stores.
pub mod config;
pub mod library;
pub mod logging;
pub mod models;
pub mod picker;
pub mod store;
pub mod ui;

pub use config::AppConfig;
pub use library::{ImportOutcome, LibraryManager};
pub use models::{SongId, SongRecord};
pub use picker::{FilePicker, FsTextReader, PathPicker, PickOutcome, PickedFile, TextReader, TypeFilter};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use ui::{run_app, App, Theme};

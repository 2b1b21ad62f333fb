//! The song library: the ordered collection of imported documents and the
//! rules that keep it in step with the key-value store.

pub mod codec;
mod manager;

pub use manager::{ImportOutcome, LibraryManager, DEFAULT_EDIT_DEBOUNCE, SONGS_KEY};

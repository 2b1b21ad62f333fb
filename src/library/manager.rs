use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::codec;
use crate::models::{SongId, SongRecord};
use crate::picker::{FilePicker, PickOutcome, TextReader, TypeFilter};
use crate::store::KeyValueStore;

/// The single key the whole library lives under.
pub const SONGS_KEY: &str = "songs";

/// How long the editor has to stay quiet before an edit is written.
pub const DEFAULT_EDIT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What happened to an import request. Failures are already logged by the
/// time the caller sees them; they are handed back only so the UI can say so.
#[derive(Debug)]
pub enum ImportOutcome {
    Imported(SongId),
    Cancelled,
    Failed(anyhow::Error),
}

/// Owns the song collection and the current selection, and is the only thing
/// allowed to change either. Every mutation ends with the full library
/// written back to the store (edits after a short quiet period).
pub struct LibraryManager<S> {
    store: S,
    songs: Vec<SongRecord>,
    selected: Option<SongId>,
    buffer: String,
    next_id: u64,
    type_filter: TypeFilter,
    edit_debounce: Duration,
    pending_since: Option<Instant>,
}

impl<S: KeyValueStore> LibraryManager<S> {
    /// Read the stored library. A missing, unreadable, or corrupt blob all
    /// end in an empty library; only the last two are logged as problems.
    pub fn load(store: S) -> Self {
        info!("loading song library");
        let songs = match store.get(SONGS_KEY) {
            Ok(Some(blob)) => match codec::decode(&blob) {
                Ok(songs) => {
                    info!(count = songs.len(), "song library loaded");
                    songs
                }
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "stored song library is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                info!("no stored song library yet");
                Vec::new()
            }
            Err(err) => {
                error!(error = %err, "failed to read song library, starting empty");
                Vec::new()
            }
        };

        let mut manager = Self {
            store,
            songs,
            selected: None,
            buffer: String::new(),
            next_id: 1,
            type_filter: TypeFilter::Any,
            edit_debounce: DEFAULT_EDIT_DEBOUNCE,
            pending_since: None,
        };
        manager.assign_missing_ids();
        manager
    }

    pub fn with_edit_debounce(mut self, debounce: Duration) -> Self {
        self.edit_debounce = debounce;
        self
    }

    pub fn with_type_filter(mut self, filter: TypeFilter) -> Self {
        self.type_filter = filter;
        self
    }

    /// Give a fresh id to every record that has none or shares one with an
    /// earlier record, then move the counter past the largest id in use.
    fn assign_missing_ids(&mut self) {
        let max = self.songs.iter().map(|song| song.id.0).max().unwrap_or(0);
        // Room for the next id plus one fresh id per record that may need it.
        let headroom = (self.songs.len() as u64).saturating_add(1);
        if max.checked_add(headroom).is_none() {
            warn!(max, "stored song ids leave no room for new ones, renumbering");
            self.renumber();
            return;
        }
        self.next_id = max + 1;

        let mut seen = HashSet::new();
        let mut reassigned = 0usize;
        for song in &mut self.songs {
            if song.id.is_unassigned() || !seen.insert(song.id) {
                song.id = SongId(self.next_id);
                self.next_id += 1;
                seen.insert(song.id);
                reassigned += 1;
            }
        }
        if reassigned > 0 {
            debug!(reassigned, "assigned ids to stored songs");
        }
    }

    /// Give every record its position (from 1) as id, keeping the selection
    /// on the same record.
    fn renumber(&mut self) {
        let selected = self.selected.take();
        for (index, song) in self.songs.iter_mut().enumerate() {
            let id = SongId(index as u64 + 1);
            if selected == Some(song.id) {
                self.selected = Some(id);
            }
            song.id = id;
        }
        self.next_id = self.songs.len() as u64 + 1;
    }

    fn allocate_id(&mut self) -> SongId {
        if self.next_id == u64::MAX {
            warn!("song id space exhausted, renumbering");
            self.renumber();
        }
        let id = SongId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Ask the picker for a document, read it, and append it to the library.
    ///
    /// Cancelling, or a handle without a usable name, does nothing. A picker
    /// or reader failure is logged and leaves the library untouched. Names
    /// are not checked for duplicates.
    pub fn import_file<P, R>(&mut self, picker: &mut P, reader: &R) -> ImportOutcome
    where
        P: FilePicker + ?Sized,
        R: TextReader + ?Sized,
    {
        let picked = match picker.pick_document(&self.type_filter) {
            Ok(PickOutcome::Picked(picked)) if !picked.name.trim().is_empty() => picked,
            Ok(_) => {
                debug!("file selection cancelled");
                return ImportOutcome::Cancelled;
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "file picker failed");
                return ImportOutcome::Failed(err);
            }
        };

        let content = match reader.read_text(&picked.locator) {
            Ok(content) => content,
            Err(err) => {
                error!(
                    locator = %picked.locator,
                    error = %format!("{err:#}"),
                    "failed to read picked file"
                );
                return ImportOutcome::Failed(err);
            }
        };

        let id = self.allocate_id();
        info!(%id, name = %picked.name, bytes = content.len(), "imported song");
        self.songs
            .push(SongRecord::new(id, picked.name, picked.locator, content));
        self.persist();
        ImportOutcome::Imported(id)
    }

    /// Make `id` the selected record and load its content into the buffer.
    /// Returns false, changing nothing, when no such record exists.
    pub fn select_record(&mut self, id: SongId) -> bool {
        match self.songs.iter().find(|song| song.id == id) {
            Some(song) => {
                self.buffer = song.content.clone();
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.buffer.clear();
    }

    /// Replace the live buffer. With a selection the record's content follows
    /// and a write is scheduled; without one only the buffer changes.
    pub fn edit_content(&mut self, text: impl Into<String>) {
        self.edit_content_at(text.into(), Instant::now());
    }

    fn edit_content_at(&mut self, text: String, now: Instant) {
        self.buffer = text;
        let Some(id) = self.selected else {
            return;
        };
        let Some(song) = self.songs.iter_mut().find(|song| song.id == id) else {
            return;
        };
        song.content.clone_from(&self.buffer);

        if self.edit_debounce.is_zero() {
            self.persist();
        } else {
            self.pending_since = Some(now);
        }
    }

    /// Remove the record with `id`. Deleting the selected record clears the
    /// selection. Unknown ids are a no-op and do not touch the store.
    pub fn delete_song(&mut self, id: SongId) -> bool {
        let Some(index) = self.songs.iter().position(|song| song.id == id) else {
            return false;
        };
        let removed = self.songs.remove(index);
        info!(%id, name = %removed.name, "deleted song");
        if self.selected == Some(id) {
            self.clear_selection();
        }
        self.persist();
        true
    }

    /// Remove every record whose name is exactly `name`. Returns how many went.
    pub fn delete_songs_named(&mut self, name: &str) -> usize {
        let before = self.songs.len();
        self.songs.retain(|song| song.name != name);
        let removed = before - self.songs.len();
        if removed == 0 {
            return 0;
        }

        info!(name, removed, "deleted songs by name");
        if let Some(id) = self.selected {
            if !self.songs.iter().any(|song| song.id == id) {
                self.clear_selection();
            }
        }
        self.persist();
        removed
    }

    /// Records whose name contains `query`, ignoring case, in library order.
    /// A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&SongRecord> {
        if query.trim().is_empty() {
            return self.songs.iter().collect();
        }
        let lowered = query.to_lowercase();
        self.songs
            .iter()
            .filter(|song| song.name_matches(&lowered))
            .collect()
    }

    /// Write a pending edit once the quiet period has passed. Returns whether
    /// anything was written.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.edit_debounce => {
                self.persist()
            }
            _ => false,
        }
    }

    /// Write a pending edit right away.
    pub fn flush(&mut self) -> bool {
        if self.pending_since.is_some() {
            self.persist()
        } else {
            false
        }
    }

    /// True while an edit sits in memory without having been written.
    pub fn is_dirty(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Serialize the whole library into the store. Failures are logged and
    /// memory stays authoritative; the next successful write catches up.
    fn persist(&mut self) -> bool {
        self.pending_since = None;
        let blob = match codec::encode(&self.songs) {
            Ok(blob) => blob,
            Err(err) => {
                error!(error = %format!("{err:#}"), "failed to serialize song library");
                return false;
            }
        };
        match self.store.set(SONGS_KEY, &blob) {
            Ok(()) => {
                debug!(count = self.songs.len(), "song library saved");
                true
            }
            Err(err) => {
                error!(error = %err, "failed to save song library");
                false
            }
        }
    }

    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    pub fn get(&self, id: SongId) -> Option<&SongRecord> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn selected(&self) -> Option<SongId> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&SongRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    /// The live buffer: the selected record's content, or whatever was typed
    /// with nothing selected. Empty after the selection is cleared.
    pub fn selected_content(&self) -> &str {
        &self.buffer
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

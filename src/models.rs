//! Domain models passed between the library manager, the persistence layer,
//! and the TUI. They stay plain data holders; the manager owns every rule
//! about how they change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Surrogate key for a song record. Display names are not unique (two files
/// called `Amazing Grace.onsong` can live side by side), so edits and deletes
/// go through this id instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u64);

impl SongId {
    /// Ids start at 1; zero marks a record that has not been assigned one yet
    /// (for example a blob written before ids existed).
    pub fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One imported `.onsong` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    #[serde(default)]
    pub id: SongId,
    /// Display name of the picked file, shown in the list and used by search.
    pub name: String,
    /// Where the file came from. Never re-read after import; kept so the user
    /// can open the original.
    pub uri: String,
    /// Full text body. Opaque to the library.
    pub content: String,
}

impl SongRecord {
    pub fn new(
        id: SongId,
        name: impl Into<String>,
        uri: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            uri: uri.into(),
            content: content.into(),
        }
    }

    /// Case-insensitive substring match against the display name. The caller
    /// passes the query already lowercased so filtering a long list does not
    /// lowercase it once per record.
    pub fn name_matches(&self, lowered_query: &str) -> bool {
        self.name.to_lowercase().contains(lowered_query)
    }

    /// Number of lines in the body, used by the list's secondary text.
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

impl fmt::Display for SongRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

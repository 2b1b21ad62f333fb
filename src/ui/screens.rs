use crate::library::LibraryManager;
use crate::models::SongId;
use crate::store::KeyValueStore;

/// The song list as the user currently sees it: the search filter applied to
/// the library, plus the highlighted row. Holds ids only; the records stay
/// with the manager.
#[derive(Default)]
pub(crate) struct LibraryScreen {
    pub(crate) filter: Option<String>,
    pub(crate) visible: Vec<SongId>,
    pub(crate) highlighted: usize,
    /// First visible line of the document pane.
    pub(crate) scroll: u16,
}

impl LibraryScreen {
    pub(crate) fn new<S: KeyValueStore>(manager: &LibraryManager<S>) -> Self {
        let mut screen = Self::default();
        screen.refresh(manager);
        screen
    }

    /// Recompute the visible rows after the library or the filter changed,
    /// keeping the highlight on the same song when it is still visible.
    pub(crate) fn refresh<S: KeyValueStore>(&mut self, manager: &LibraryManager<S>) {
        let focused = self.current();
        let query = self.filter.as_deref().unwrap_or("");
        self.visible = manager.search(query).iter().map(|song| song.id).collect();

        if let Some(id) = focused {
            if let Some(index) = self.visible.iter().position(|visible| *visible == id) {
                self.highlighted = index;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter<S: KeyValueStore>(
        &mut self,
        filter: Option<String>,
        manager: &LibraryManager<S>,
    ) {
        self.filter = filter.filter(|query| !query.trim().is_empty());
        self.refresh(manager);
    }

    /// Move the highlight onto `id` if it is visible.
    pub(crate) fn focus(&mut self, id: SongId) {
        if let Some(index) = self.visible.iter().position(|visible| *visible == id) {
            self.highlighted = index;
        }
    }

    pub(crate) fn current(&self) -> Option<SongId> {
        self.visible.get(self.highlighted).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let new = (self.highlighted as isize + offset).clamp(0, len - 1);
        self.highlighted = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.highlighted = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.highlighted = self.visible.len().saturating_sub(1);
    }

    pub(crate) fn scroll_by(&mut self, offset: i32, content_lines: usize) {
        let max = content_lines.saturating_sub(1).min(u16::MAX as usize) as i32;
        self.scroll = (self.scroll as i32 + offset).clamp(0, max) as u16;
    }

    fn ensure_in_bounds(&mut self) {
        if self.visible.is_empty() {
            self.highlighted = 0;
        } else if self.highlighted >= self.visible.len() {
            self.highlighted = self.visible.len() - 1;
        }
    }
}

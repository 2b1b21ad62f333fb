use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::picker::{FilePicker, PickOutcome, PickedFile, TypeFilter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BrowserEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) is_dir: bool,
}

/// What a key press in the browser led to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BrowserStep {
    Stay,
    Picked,
}

/// Modal directory browser used as the TUI's file picker. The user walks the
/// tree; once a file is confirmed, [`FilePicker::pick_document`] hands it to
/// the library.
pub(crate) struct FileBrowser {
    pub(crate) dir: PathBuf,
    pub(crate) entries: Vec<BrowserEntry>,
    pub(crate) selected: usize,
    pub(crate) error: Option<String>,
    filter: TypeFilter,
    confirmed: Option<PathBuf>,
}

impl FileBrowser {
    pub(crate) fn open(dir: &Path, filter: TypeFilter) -> Self {
        let mut browser = Self {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
            selected: 0,
            error: None,
            filter,
            confirmed: None,
        };
        browser.reload();
        browser
    }

    /// Re-read the current directory. Unreadable directories show an error
    /// line instead of entries but keep the parent link so the user can back out.
    pub(crate) fn reload(&mut self) {
        self.selected = 0;
        match self.read_entries() {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                self.entries = self.parent_entry().into_iter().collect();
                self.error = Some(format!("{err:#}"));
            }
        }
    }

    fn parent_entry(&self) -> Option<BrowserEntry> {
        self.dir.parent().map(|parent| BrowserEntry {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
        })
    }

    fn read_entries(&self) -> Result<Vec<BrowserEntry>> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        let listing = fs::read_dir(&self.dir)
            .with_context(|| format!("cannot open {}", self.dir.display()))?;

        for entry in listing {
            let entry = entry.context("failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if path.is_dir() {
                dirs.push(BrowserEntry {
                    name,
                    path,
                    is_dir: true,
                });
            } else if self.filter.accepts(&path) {
                files.push(BrowserEntry {
                    name,
                    path,
                    is_dir: false,
                });
            }
        }

        dirs.sort_by_key(|entry| entry.name.to_lowercase());
        files.sort_by_key(|entry| entry.name.to_lowercase());

        let mut entries: Vec<BrowserEntry> = self.parent_entry().into_iter().collect();
        entries.extend(dirs);
        entries.extend(files);
        Ok(entries)
    }

    pub(crate) fn current(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Enter the highlighted directory, or confirm the highlighted file.
    pub(crate) fn activate(&mut self) -> BrowserStep {
        let Some(entry) = self.current().cloned() else {
            return BrowserStep::Stay;
        };
        if entry.is_dir {
            self.change_dir(entry.path);
            BrowserStep::Stay
        } else {
            self.confirmed = Some(entry.path);
            BrowserStep::Picked
        }
    }

    pub(crate) fn go_up(&mut self) {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.change_dir(parent);
        }
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.dir = dir;
        self.reload();
    }
}

impl FilePicker for FileBrowser {
    fn pick_document(&mut self, filter: &TypeFilter) -> Result<PickOutcome> {
        match self.confirmed.take() {
            Some(path) if filter.accepts(&path) => {
                Ok(PickOutcome::Picked(PickedFile::from_path(&path)))
            }
            _ => Ok(PickOutcome::Cancelled),
        }
    }
}

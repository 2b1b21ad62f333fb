//! The two collaborators an import needs: something that picks a file and
//! something that reads it as text. The library only sees the traits; the TUI
//! file browser and the command line each provide a picker.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Which files a picker should offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Every file, whatever its extension.
    #[default]
    Any,
    /// Only files whose extension matches one of these (case-insensitive,
    /// without the leading dot).
    Extensions(Vec<String>),
}

impl TypeFilter {
    /// Build a filter from config values; an empty list means any type.
    pub fn from_extensions(extensions: &[String]) -> Self {
        let cleaned: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        if cleaned.is_empty() {
            TypeFilter::Any
        } else {
            TypeFilter::Extensions(cleaned)
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Extensions(allowed) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let ext = ext.to_lowercase();
                    allowed.iter().any(|allowed| *allowed == ext)
                })
                .unwrap_or(false),
        }
    }
}

/// Handle to a file the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// Display name, usually the file name.
    pub name: String,
    /// Opaque locator handed to the [`TextReader`].
    pub locator: String,
}

impl PickedFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            locator: path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PickedFile),
    Cancelled,
}

pub trait FilePicker {
    /// Ask for one document. Cancelling is an `Ok(Cancelled)`, not an error.
    fn pick_document(&mut self, filter: &TypeFilter) -> Result<PickOutcome>;
}

pub trait TextReader {
    /// Read the whole file behind `locator`, decoded as UTF-8.
    fn read_text(&self, locator: &str) -> Result<String>;
}

/// Reads plain filesystem paths and `file://` URIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTextReader;

impl FsTextReader {
    fn resolve(locator: &str) -> PathBuf {
        match locator.strip_prefix("file://") {
            Some(rest) => PathBuf::from(percent_decode(rest)),
            None => PathBuf::from(locator),
        }
    }
}

/// Undo `%XX` escapes in the path part of a `file://` URI. Malformed escapes
/// are kept as written, and so is the whole input if the decoded bytes are not
/// UTF-8.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = byte {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(decoded).unwrap_or_else(|_| input.to_string())
}

impl TextReader for FsTextReader {
    fn read_text(&self, locator: &str) -> Result<String> {
        let path = Self::resolve(locator);
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8 text", path.display()))
    }
}

/// Picker for a path given up front, e.g. on the command line. Picks it once;
/// a second call reports cancellation.
#[derive(Debug, Clone)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for PathPicker {
    fn pick_document(&mut self, filter: &TypeFilter) -> Result<PickOutcome> {
        let Some(path) = self.path.take() else {
            return Ok(PickOutcome::Cancelled);
        };
        if !path.is_file() {
            return Err(anyhow!("{} is not a file", path.display()));
        }
        if !filter.accepts(&path) {
            return Err(anyhow!(
                "{} does not match the allowed file types",
                path.display()
            ));
        }
        Ok(PickOutcome::Picked(PickedFile::from_path(&path)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn filter_from_empty_extensions_accepts_anything() {
        let filter = TypeFilter::from_extensions(&[]);
        assert_eq!(filter, TypeFilter::Any);
        assert!(filter.accepts(Path::new("notes")));
    }

    #[test]
    fn extension_filter_is_case_insensitive_and_ignores_dots() {
        let filter = TypeFilter::from_extensions(&[".OnSong".to_string(), " txt ".to_string()]);

        assert!(filter.accepts(Path::new("/songs/Amazing Grace.onsong")));
        assert!(filter.accepts(Path::new("chords.TXT")));
        assert!(!filter.accepts(Path::new("cover.png")));
        assert!(!filter.accepts(Path::new("README")));
    }

    #[test]
    fn reader_accepts_paths_and_file_uris() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[C]Amazing [G]grace").unwrap();
        let path = file.path().display().to_string();

        let reader = FsTextReader;
        assert_eq!(reader.read_text(&path).unwrap(), "[C]Amazing [G]grace");
        assert_eq!(
            reader.read_text(&format!("file://{path}")).unwrap(),
            "[C]Amazing [G]grace"
        );
    }

    #[test]
    fn reader_decodes_escaped_file_uris() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("My Songs");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("Café 100%.onsong"), "[D]Be thou").unwrap();

        let uri = format!(
            "file://{}/My%20Songs/Caf%C3%A9%20100%25.onsong",
            dir.path().display()
        );
        assert_eq!(FsTextReader.read_text(&uri).unwrap(), "[D]Be thou");
    }

    #[test]
    fn percent_decode_keeps_malformed_escapes() {
        assert_eq!(percent_decode("/a%20b"), "/a b");
        assert_eq!(percent_decode("/100%zz"), "/100%zz");
        assert_eq!(percent_decode("/tail%2"), "/tail%2");
        assert_eq!(percent_decode("/bad%FF"), "/bad%FF");
    }

    #[test]
    fn reader_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = FsTextReader
            .read_text(&file.path().display().to_string())
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn reader_reports_missing_files() {
        assert!(FsTextReader.read_text("/definitely/not/here.onsong").is_err());
    }

    #[test]
    fn path_picker_picks_once_then_cancels() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut picker = PathPicker::new(Some(file.path().to_path_buf()));

        let first = picker.pick_document(&TypeFilter::Any).unwrap();
        assert!(matches!(first, PickOutcome::Picked(ref picked) if picked.locator == file.path().display().to_string()));
        assert_eq!(
            picker.pick_document(&TypeFilter::Any).unwrap(),
            PickOutcome::Cancelled
        );
    }

    #[test]
    fn path_picker_without_path_cancels() {
        let mut picker = PathPicker::new(None);
        assert_eq!(
            picker.pick_document(&TypeFilter::Any).unwrap(),
            PickOutcome::Cancelled
        );
    }

    #[test]
    fn path_picker_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut picker = PathPicker::new(Some(dir.path().to_path_buf()));
        assert!(picker.pick_document(&TypeFilter::Any).is_err());
    }
}

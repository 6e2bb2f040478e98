//! Persisted bookmarks and settings.
//!
//! The session loads state through a [`Persistence`] when it is built,
//! saves after bookmark and settings changes, and saves again on
//! [`Session::shutdown`](crate::Session::shutdown).
//!
//! [`JsonFileStore`] treats an unreadable file like a missing one and falls
//! back to defaults. Saves go to a temporary file that is renamed over the
//! target, so an interrupted save leaves the previous file intact.
//!
//! # Example
//!
//! ```no_run
//! use tab_session::store::{JsonFileStore, Persistence};
//!
//! # fn example() -> tab_session::Result<()> {
//! let store = JsonFileStore::default_location()?;
//! let bookmarks = store.load_bookmarks()?;
//! println!("{} bookmarks in {}", bookmarks.len(), store.dir().display());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{from_str, to_string_pretty};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Error, Result};

use super::Bookmark;

// ============================================================================
// Constants
// ============================================================================

/// Application directory name under the platform data dir.
const APP_DIR: &str = "tab-session";

/// Bookmarks file name.
const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Persistence
// ============================================================================

/// Storage for state that outlives a session.
///
/// The on-disk format is up to the implementation.
pub trait Persistence: Send {
    /// Loads saved bookmarks; empty when nothing was saved.
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>>;

    /// Replaces saved bookmarks.
    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()>;

    /// Loads saved settings; defaults when nothing was saved.
    fn load_settings(&self) -> Result<Settings>;

    /// Replaces saved settings.
    fn save_settings(&self, settings: &Settings) -> Result<()>;
}

impl<P> Persistence for Arc<P>
where
    P: Persistence + Sync + ?Sized,
{
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>> {
        (**self).load_bookmarks()
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        (**self).save_bookmarks(bookmarks)
    }

    fn load_settings(&self) -> Result<Settings> {
        (**self).load_settings()
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        (**self).save_settings(settings)
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// Pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Uses `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(path = %dir.display(), "Using JSON file store");
        Ok(Self { dir })
    }

    /// Uses the platform data directory (e.g. `~/.local/share/tab-session`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the platform has no data directory.
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::persistence("no platform data directory"))?;
        Self::new(base.join(APP_DIR))
    }

    /// Returns the store directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses `name`.
    ///
    /// Returns `None` if the file does not exist or does not parse.
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.dir.join(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable state file");
                Ok(None)
            }
        }
    }

    /// Serializes `value` into `name`, replacing it atomically.
    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(to_string_pretty(value)?.as_bytes())?;
        file.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), "Saved");
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>> {
        Ok(self.read(BOOKMARKS_FILE)?.unwrap_or_default())
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        self.write(BOOKMARKS_FILE, bookmarks)
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.read(SETTINGS_FILE)?.unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS_FILE, settings)
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bookmarks: Mutex<Vec<Bookmark>>,
    settings: Mutex<Option<Settings>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with bookmarks and settings.
    #[must_use]
    pub fn with_state(bookmarks: Vec<Bookmark>, settings: Settings) -> Self {
        Self {
            bookmarks: Mutex::new(bookmarks),
            settings: Mutex::new(Some(settings)),
        }
    }
}

impl Persistence for MemoryStore {
    fn load_bookmarks(&self) -> Result<Vec<Bookmark>> {
        Ok(self.bookmarks.lock().clone())
    }

    fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        *self.bookmarks.lock() = bookmarks.to_vec();
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock() = Some(settings.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::Theme;

    fn bookmark(url: &str) -> Bookmark {
        Bookmark {
            url: url.into(),
            title: "T".into(),
            added_at: 1,
        }
    }

    #[test]
    fn test_json_store_missing_files_give_defaults() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let store = JsonFileStore::new(temp.path().join("state")).expect("create store");

        assert!(store.dir().is_dir());
        assert!(store.load_bookmarks().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_json_store_saves_and_loads() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let store = JsonFileStore::new(temp.path()).expect("create store");

        store.save_bookmarks(&[bookmark("http://a.test/")]).unwrap();
        let settings = Settings::default().with_theme(Theme::Dark);
        store.save_settings(&settings).unwrap();

        let reopened = JsonFileStore::new(temp.path()).expect("reopen store");
        assert_eq!(reopened.load_bookmarks().unwrap(), vec![bookmark("http://a.test/")]);
        assert_eq!(reopened.load_settings().unwrap(), settings);
    }

    #[test]
    fn test_json_store_corrupt_files_fall_back_to_defaults() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join(BOOKMARKS_FILE), r#"[{"url":"http://a"#).unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "{not json").unwrap();
        let store = JsonFileStore::new(temp.path()).expect("create store");

        assert!(store.load_bookmarks().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap(), Settings::default());

        store.save_bookmarks(&[bookmark("http://a.test/")]).unwrap();
        assert_eq!(store.load_bookmarks().unwrap(), vec![bookmark("http://a.test/")]);
    }

    #[test]
    fn test_json_store_save_leaves_no_temp_files() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let store = JsonFileStore::new(temp.path()).expect("create store");

        store.save_bookmarks(&[bookmark("http://a.test/")]).unwrap();
        store.save_bookmarks(&[]).unwrap();
        store.save_settings(&Settings::default()).unwrap();

        let mut names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, [BOOKMARKS_FILE, SETTINGS_FILE]);
        assert!(store.load_bookmarks().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load_settings().unwrap(), Settings::default());

        store.save_bookmarks(&[bookmark("http://a.test/")]).unwrap();
        assert_eq!(store.load_bookmarks().unwrap().len(), 1);
    }
}

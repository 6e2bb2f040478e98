//! Deduplicated bookmark set.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::now_millis;

// ============================================================================
// Bookmark
// ============================================================================

/// A saved page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Page URL (the key).
    pub url: String,
    /// Page title when bookmarked.
    pub title: String,
    /// Unix time in milliseconds.
    pub added_at: u64,
}

// ============================================================================
// BookmarkStore
// ============================================================================

/// Bookmarks keyed by URL, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BookmarkStore {
    entries: Vec<Bookmark>,
    urls: FxHashSet<String>,
}

impl BookmarkStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted entries.
    ///
    /// Later duplicates of a URL are dropped.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Bookmark>) -> Self {
        let mut store = Self::new();
        for bookmark in entries {
            if store.urls.insert(bookmark.url.clone()) {
                store.entries.push(bookmark);
            }
        }
        store
    }

    /// Bookmarks `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBookmarked`] if `url` is present; the store
    /// is left unchanged.
    pub fn add(&mut self, url: impl Into<String>, title: impl Into<String>) -> Result<()> {
        let url = url.into();
        if self.urls.contains(&url) {
            return Err(Error::already_bookmarked(url));
        }

        self.urls.insert(url.clone());
        self.entries.push(Bookmark {
            url,
            title: title.into(),
            added_at: now_millis(),
        });
        Ok(())
    }

    /// Removes the bookmark for `url`. Returns `false` if it was absent.
    pub fn remove(&mut self, url: &str) -> bool {
        if !self.urls.remove(url) {
            return false;
        }
        self.entries.retain(|bookmark| bookmark.url != url);
        true
    }

    /// Returns `true` if `url` is bookmarked.
    #[inline]
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns the bookmark for `url`.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Bookmark> {
        self.entries.iter().find(|bookmark| bookmark.url == url)
    }

    /// Returns all bookmarks in insertion order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Bookmark] {
        &self.entries
    }

    /// Iterates bookmarks in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.entries.iter()
    }

    /// Returns the number of bookmarks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no bookmarks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Per-tab back/forward navigation history.
//!
//! A [`NavigationHistory`] is an ordered list of visited URLs plus a cursor.
//! Visiting a URL while the cursor is not at the end discards everything
//! after the cursor first (branch truncation). Moving back or forward only
//! moves the cursor.
//!
//! # Example
//!
//! ```
//! use tab_session::browser::NavigationHistory;
//!
//! let mut history = NavigationHistory::new();
//! history.visit("a");
//! history.visit("b");
//! history.visit("c");
//! history.back().unwrap();
//! history.back().unwrap();
//! history.visit("d");
//!
//! assert_eq!(history.entries(), ["a", "d"]);
//! assert_eq!(history.current().unwrap(), "d");
//! ```

use crate::error::{Error, Result};

// ============================================================================
// NavigationHistory
// ============================================================================

/// Ordered visited URLs with a cursor.
///
/// Invariant: `cursor` is `None` exactly when `entries` is empty, and
/// otherwise `cursor < entries.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl NavigationHistory {
    /// Creates an empty history.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit to `url`.
    ///
    /// Forward entries past the cursor are dropped before appending.
    pub fn visit(&mut self, url: impl Into<String>) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(url.into());
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Moves the cursor one entry back and returns the URL there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`] if already at the first entry or empty.
    pub fn back(&mut self) -> Result<&str> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                Ok(&self.entries[cursor - 1])
            }
            _ => Err(Error::NoHistory),
        }
    }

    /// Moves the cursor one entry forward and returns the URL there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`] if already at the last entry or empty.
    pub fn forward(&mut self) -> Result<&str> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => {
                self.cursor = Some(cursor + 1);
                Ok(&self.entries[cursor + 1])
            }
            _ => Err(Error::NoHistory),
        }
    }

    /// Returns the URL under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`] if nothing was visited.
    pub fn current(&self) -> Result<&str> {
        self.cursor
            .map(|cursor| self.entries[cursor].as_str())
            .ok_or(Error::EmptyHistory)
    }
}

// ============================================================================
// NavigationHistory - Accessors
// ============================================================================

impl NavigationHistory {
    /// Returns `true` if [`back`](Self::back) would succeed.
    #[inline]
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    /// Returns `true` if [`forward`](Self::forward) would succeed.
    #[inline]
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.entries.len())
    }

    /// Returns all entries, oldest first.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns the cursor position, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was visited.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

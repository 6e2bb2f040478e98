//! Append-only global visit log.

use serde::{Deserialize, Serialize};

use super::now_millis;

// ============================================================================
// HistoryEntry
// ============================================================================

/// One successful page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Loaded URL.
    pub url: String,
    /// Page title at load time.
    pub title: String,
    /// Unix time in milliseconds.
    pub visited_at: u64,
}

// ============================================================================
// HistoryLog
// ============================================================================

/// Global visit log across all tabs.
///
/// Grows without bound until [`clear`](Self::clear). Recording can be
/// switched off, in which case [`record`](Self::record) does nothing.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    enabled: bool,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HistoryLog {
    /// Creates an empty log.
    #[inline]
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Vec::new(),
            enabled,
        }
    }

    /// Appends a visit stamped with the current time.
    ///
    /// No-op while recording is disabled.
    pub fn record(&mut self, url: impl Into<String>, title: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.entries.push(HistoryEntry {
            url: url.into(),
            title: title.into(),
            visited_at: now_millis(),
        });
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Turns recording on or off. Existing entries are kept.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` while recording.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns all entries, oldest first.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns entries whose URL or title contains `text`, ignoring case.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<&HistoryEntry> {
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.url.to_lowercase().contains(&needle)
                    || entry.title.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Session-wide stores.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HistoryLog`] | Append-only log of successful page loads |
//! | [`BookmarkStore`] | Bookmarks keyed by URL |
//! | [`Persistence`] | Loading and saving bookmarks and settings |
//!
//! Both stores are owned by the [`Session`](crate::Session) and only
//! mutated through it.

// ============================================================================
// Imports
// ============================================================================

use std::time::{SystemTime, UNIX_EPOCH};

// ============================================================================
// Submodules
// ============================================================================

/// Bookmark set.
pub mod bookmarks;

/// Global visit log.
pub mod history_log;

/// Persisted state.
pub mod persistence;

// ============================================================================
// Re-exports
// ============================================================================

pub use bookmarks::{Bookmark, BookmarkStore};
pub use history_log::{HistoryEntry, HistoryLog};
pub use persistence::{JsonFileStore, MemoryStore, Persistence};

// ============================================================================
// Helpers
// ============================================================================

/// Current Unix time in milliseconds; zero if the clock is before 1970.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

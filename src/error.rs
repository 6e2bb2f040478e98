//! Error types for the tab session engine.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tab_session::{Error, Result};
//!
//! fn example(session: &mut Session) -> Result<()> {
//!     match session.go_back() {
//!         Ok(url) => println!("back to {url}"),
//!         Err(Error::NoHistory) => println!("nothing to go back to"),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Navigation | [`Error::NoHistory`], [`Error::EmptyHistory`], [`Error::InvalidInput`] |
//! | Session | [`Error::UnknownTab`] |
//! | Bookmarks | [`Error::AlreadyBookmarked`] |
//! | Fetch | [`Error::FetchFailed`], [`Error::HttpStatus`], [`Error::Timeout`] |
//! | Configuration | [`Error::Config`], [`Error::Persistence`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Url`], [`Error::Http`] |
//!
//! No variant is fatal to a session. Fetch errors never leave the worker
//! that produced them; they are turned into a failed outcome and shown in
//! the tab's status.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::TabId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Navigation Errors
    // ========================================================================
    /// Back or forward requested with no further entries.
    ///
    /// The history cursor is left where it was.
    #[error("No further history in that direction")]
    NoHistory,

    /// The history has no entries yet.
    #[error("History is empty")]
    EmptyHistory,

    /// Navigation input could not be turned into a URL.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong with the input.
        message: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Operation referenced a tab that does not exist.
    #[error("Unknown tab: {tab_id}")]
    UnknownTab {
        /// The missing tab ID.
        tab_id: TabId,
    },

    // ========================================================================
    // Bookmark Errors
    // ========================================================================
    /// The URL is already in the bookmark store.
    ///
    /// Informational: the store is unchanged and the caller may simply
    /// report it.
    #[error("Already bookmarked: {url}")]
    AlreadyBookmarked {
        /// The duplicate URL.
        url: String,
    },

    // ========================================================================
    // Fetch Errors
    // ========================================================================
    /// Retrieval failed in transport or while reading the response.
    #[error("Fetch failed: {reason}")]
    FetchFailed {
        /// Human-readable reason.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// The status code returned.
        status: u16,
    },

    /// Operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session settings are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Loading or saving persisted state failed.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Description of the persistence failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid input error.
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an unknown tab error.
    #[inline]
    pub fn unknown_tab(tab_id: TabId) -> Self {
        Self::UnknownTab { tab_id }
    }

    /// Creates an already bookmarked error.
    #[inline]
    pub fn already_bookmarked(url: impl Into<String>) -> Self {
        Self::AlreadyBookmarked { url: url.into() }
    }

    /// Creates a fetch failed error.
    #[inline]
    pub fn fetch_failed(reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            reason: reason.into(),
        }
    }

    /// Creates an HTTP status error.
    #[inline]
    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a persistence error.
    #[inline]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error is informational rather than a failure.
    #[inline]
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::AlreadyBookmarked { .. })
    }

    /// Returns `true` if this is a navigation error.
    #[inline]
    #[must_use]
    pub fn is_navigation_error(&self) -> bool {
        matches!(
            self,
            Self::NoHistory | Self::EmptyHistory | Self::InvalidInput { .. }
        )
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this error came from retrieving remote content.
    #[inline]
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. } | Self::HttpStatus { .. } | Self::Timeout { .. } | Self::Http(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::fetch_failed("connection refused");
        assert_eq!(err.to_string(), "Fetch failed: connection refused");
    }

    #[test]
    fn test_unknown_tab_display() {
        let err = Error::unknown_tab(TabId::new(7).unwrap());
        assert_eq!(err.to_string(), "Unknown tab: 7");
    }

    #[test]
    fn test_is_informational() {
        assert!(Error::already_bookmarked("https://example.com/").is_informational());
        assert!(!Error::NoHistory.is_informational());
    }

    #[test]
    fn test_is_navigation_error() {
        assert!(Error::NoHistory.is_navigation_error());
        assert!(Error::EmptyHistory.is_navigation_error());
        assert!(Error::invalid_input("empty").is_navigation_error());
        assert!(!Error::config("bad").is_navigation_error());
    }

    #[test]
    fn test_is_fetch_error() {
        assert!(Error::http_status(404).is_fetch_error());
        assert!(Error::timeout("fetch", 1000).is_fetch_error());
        assert!(Error::timeout("fetch", 1000).is_timeout());
        assert!(!Error::NoHistory.is_fetch_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::Url(_)));
    }
}

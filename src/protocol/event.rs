//! Messages sent from fetch workers to the session.
//!
//! Workers never touch session state. Each finished unit of work is turned
//! into an immutable [`Event`] and sent on the session's delivery queue.
//!
//! | Event | Produced by | Applied to |
//! |-------|-------------|------------|
//! | [`Event::Fetch`] | page fetch worker | tab title/content/status, history log |
//! | [`Event::Download`] | download worker | session download records |

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::identifiers::{DownloadId, Generation, TabId};

use super::FetchResponse;

// ============================================================================
// Constants
// ============================================================================

/// `<title>` element contents, across lines.
static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
});

// ============================================================================
// Event
// ============================================================================

/// A message on the delivery queue.
#[derive(Debug, Clone)]
pub enum Event {
    /// A page fetch finished.
    Fetch(FetchEvent),
    /// A download finished.
    Download(DownloadEvent),
}

// ============================================================================
// FetchEvent
// ============================================================================

/// Result of one page fetch, tagged for generation checking.
#[derive(Debug, Clone)]
pub struct FetchEvent {
    /// Tab that requested the fetch.
    pub tab_id: TabId,
    /// Generation the fetch was started under.
    pub generation: Generation,
    /// URL that was fetched.
    pub url: String,
    /// What happened.
    pub outcome: FetchOutcome,
}

/// Outcome of a page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response.
    Loaded {
        /// HTTP status code.
        status: u16,
        /// Page title, or the URL when the page has none.
        title: String,
        /// Decoded body.
        body: String,
    },
    /// Timeout, non-2xx status or transport error.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl FetchOutcome {
    /// Builds an outcome from a transport result.
    ///
    /// Non-2xx responses become [`FetchOutcome::Failed`].
    #[must_use]
    pub fn from_result(url: &str, result: Result<FetchResponse, Error>) -> Self {
        match result {
            Ok(response) if response.is_success() => {
                let body = response.text().into_owned();
                let title = extract_title(&body).unwrap_or_else(|| url.to_string());
                Self::Loaded {
                    status: response.status,
                    title,
                    body,
                }
            }
            Ok(response) => Self::failed(Error::http_status(response.status)),
            Err(e) => Self::failed(e),
        }
    }

    /// Creates a failed outcome from an error.
    #[inline]
    #[must_use]
    pub fn failed(error: Error) -> Self {
        Self::Failed {
            reason: error.to_string(),
        }
    }

    /// Returns `true` for [`FetchOutcome::Loaded`].
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

// ============================================================================
// DownloadEvent
// ============================================================================

/// Result of one download.
#[derive(Debug, Clone)]
pub struct DownloadEvent {
    /// Download the result belongs to.
    pub id: DownloadId,
    /// Destination file.
    pub path: PathBuf,
    /// What happened.
    pub outcome: DownloadOutcome,
}

/// Outcome of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Body written to disk.
    Completed {
        /// Bytes written.
        bytes: u64,
    },
    /// Fetch or write failed.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

// ============================================================================
// Functions
// ============================================================================

/// Extracts the trimmed `<title>` text of an HTML document.
///
/// Returns `None` when there is no title or it is blank.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE.captures(html)?.get(1)?.as_str();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

// ============================================================================
// Tests
// ============================================================================

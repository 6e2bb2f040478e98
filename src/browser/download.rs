//! Download bookkeeping.

use std::path::{Path, PathBuf};

use crate::identifiers::DownloadId;
use crate::protocol::DownloadOutcome;

// ============================================================================
// DownloadState
// ============================================================================

/// Progress of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadState {
    /// The worker has not reported yet.
    Pending,
    /// The body was written.
    Completed {
        /// Bytes written.
        bytes: u64,
    },
    /// Fetching or writing failed.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl DownloadState {
    /// Returns `true` until the worker reports.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<DownloadOutcome> for DownloadState {
    fn from(outcome: DownloadOutcome) -> Self {
        match outcome {
            DownloadOutcome::Completed { bytes } => Self::Completed { bytes },
            DownloadOutcome::Failed { reason } => Self::Failed { reason },
        }
    }
}

// ============================================================================
// DownloadRecord
// ============================================================================

/// A download started from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    id: DownloadId,
    url: String,
    path: PathBuf,
    state: DownloadState,
}

impl DownloadRecord {
    /// Creates a pending record.
    pub(crate) fn pending(id: DownloadId, url: String, path: PathBuf) -> Self {
        Self {
            id,
            url,
            path,
            state: DownloadState::Pending,
        }
    }

    /// Records the worker's report.
    pub(crate) fn finish(&mut self, outcome: DownloadOutcome) {
        self.state = outcome.into();
    }

    /// Returns the download ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> DownloadId {
        self.id
    }

    /// Returns the source URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the destination path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &DownloadState {
        &self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Fetch job and fetch response types.
//!
//! A [`FetchJob`] is the session-side handle of one in-flight retrieval.
//! A [`FetchResponse`] is what a [`Transport`](crate::transport::Transport)
//! hands back to the worker.

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

use crate::identifiers::{Generation, TabId};

// ============================================================================
// CancelFlag
// ============================================================================

/// Cooperative cancellation flag shared between a job and its worker.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the flag cancelled.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ============================================================================
// FetchJob
// ============================================================================

/// One in-flight fetch for a tab.
///
/// Cancelling a job is best-effort: the worker checks the flag before and
/// after the transport call. The session never applies a result whose
/// generation is no longer current, whether or not the worker noticed.
pub struct FetchJob {
    /// Tab the fetch belongs to.
    pub tab_id: TabId,
    /// Target URL.
    pub url: String,
    /// Generation the fetch was started under.
    pub generation: Generation,
    /// Shared cancellation flag.
    cancel: CancelFlag,
    /// Worker task handle.
    handle: Option<JoinHandle<()>>,
}

impl fmt::Debug for FetchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchJob")
            .field("tab_id", &self.tab_id)
            .field("url", &self.url)
            .field("generation", &self.generation)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl FetchJob {
    /// Creates a job record for a spawned worker.
    pub(crate) fn new(
        tab_id: TabId,
        url: String,
        generation: Generation,
        cancel: CancelFlag,
        handle: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            tab_id,
            url,
            generation,
            cancel,
            handle,
        }
    }

    /// Marks the job cancelled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if the job was cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns `true` once the worker task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

// ============================================================================
// FetchResponse
// ============================================================================

/// Raw result of a transport retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response.
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200` response with a text body.
    #[inline]
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body.into().into_bytes())
    }

    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[inline]
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

// ============================================================================
// Tests
// ============================================================================

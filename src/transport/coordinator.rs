//! Fetch worker pool and delivery queue.
//!
//! The [`FetchCoordinator`] spawns one tokio task per fetch. Workers call
//! the [`Transport`], turn the result into an immutable [`Event`] and send
//! it on an unbounded queue. The session owns the only receiver and is the
//! only place results are applied.
//!
//! # Worker Lifecycle
//!
//! 1. Skip the transport call if the job was cancelled before starting
//! 2. Call the transport (under the optional fetch timeout); a panic becomes
//!    a failed outcome
//! 3. Drop the result if the job was cancelled meanwhile
//! 4. Otherwise send `Event::Fetch` tagged with tab and generation

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{DownloadId, Generation, TabId};
use crate::protocol::{
    CancelFlag, DownloadEvent, DownloadOutcome, Event, FetchEvent, FetchJob, FetchOutcome,
    FetchResponse,
};

use super::Transport;

// ============================================================================
// Types
// ============================================================================

/// Sending half of the delivery queue.
pub(crate) type EventSender = mpsc::UnboundedSender<Event>;

/// Receiving half of the delivery queue.
pub(crate) type EventReceiver = mpsc::UnboundedReceiver<Event>;

// ============================================================================
// FetchCoordinator
// ============================================================================

/// Schedules fetches off the coordinating owner.
///
/// The coordinator itself holds no per-tab state; generation bookkeeping
/// lives on each [`Tab`](crate::browser::Tab).
pub struct FetchCoordinator {
    /// Retrieval mechanism shared by all workers.
    transport: Arc<dyn Transport>,
    /// Delivery queue sender, cloned into each worker.
    events: EventSender,
    /// Runtime workers are spawned on.
    runtime: Handle,
    /// Upper bound on one transport call.
    fetch_timeout: Option<Duration>,
}

impl fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl FetchCoordinator {
    /// Creates a coordinator and the receiving end of its delivery queue.
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        runtime: Handle,
        fetch_timeout: Option<Duration>,
    ) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            transport,
            events,
            runtime,
            fetch_timeout,
        };
        (coordinator, receiver)
    }

    /// Starts fetching `url` for `tab_id` under `generation`.
    ///
    /// The caller is responsible for cancelling the tab's previous job and
    /// bumping its generation first.
    pub fn start_fetch(&self, tab_id: TabId, generation: Generation, url: String) -> FetchJob {
        debug!(tab_id = %tab_id, generation = %generation, url = %url, "Starting fetch");

        let cancel = CancelFlag::new();
        let handle = self.runtime.spawn(run_fetch(
            Arc::clone(&self.transport),
            self.events.clone(),
            cancel.clone(),
            self.fetch_timeout,
            tab_id,
            generation,
            url.clone(),
        ));

        FetchJob::new(tab_id, url, generation, cancel, Some(handle))
    }

    /// Starts downloading `url` into `path`.
    pub fn start_download(&self, id: DownloadId, url: String, path: PathBuf) {
        debug!(download_id = %id, url = %url, path = %path.display(), "Starting download");

        self.runtime.spawn(run_download(
            Arc::clone(&self.transport),
            self.events.clone(),
            self.fetch_timeout,
            id,
            url,
            path,
        ));
    }

    /// Returns the configured fetch timeout.
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    /// Changes the timeout applied to fetches started from now on.
    #[inline]
    pub fn set_fetch_timeout(&mut self, fetch_timeout: Option<Duration>) {
        self.fetch_timeout = fetch_timeout;
    }

    /// Returns a sender onto the delivery queue.
    #[cfg(test)]
    pub(crate) fn sender(&self) -> EventSender {
        self.events.clone()
    }
}

// ============================================================================
// Workers
// ============================================================================

/// Calls the transport, bounded by `fetch_timeout` when set.
///
/// A panicking transport is reported as a fetch failure.
async fn fetch_bounded(
    transport: &dyn Transport,
    url: &str,
    fetch_timeout: Option<Duration>,
) -> Result<FetchResponse> {
    let call = AssertUnwindSafe(transport.fetch(url))
        .catch_unwind()
        .map(|result| result.unwrap_or_else(|payload| Err(transport_panicked(payload.as_ref()))));

    match fetch_timeout {
        Some(limit) => timeout(limit, call)
            .await
            .map_err(|_| Error::timeout(format!("fetch {url}"), duration_millis(limit)))?,
        None => call.await,
    }
}

/// Turns a caught panic payload into a fetch error.
fn transport_panicked(payload: &(dyn Any + Send)) -> Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    Error::fetch_failed(format!("transport panicked: {message}"))
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Page fetch worker.
async fn run_fetch(
    transport: Arc<dyn Transport>,
    events: EventSender,
    cancel: CancelFlag,
    fetch_timeout: Option<Duration>,
    tab_id: TabId,
    generation: Generation,
    url: String,
) {
    if cancel.is_cancelled() {
        trace!(tab_id = %tab_id, generation = %generation, "Fetch cancelled before start");
        return;
    }

    let result = fetch_bounded(transport.as_ref(), &url, fetch_timeout).await;
    let outcome = FetchOutcome::from_result(&url, result);

    if cancel.is_cancelled() {
        trace!(tab_id = %tab_id, generation = %generation, "Dropping superseded fetch result");
        return;
    }

    if let FetchOutcome::Failed { reason } = &outcome {
        warn!(tab_id = %tab_id, url = %url, reason = %reason, "Fetch failed");
    }

    let event = Event::Fetch(FetchEvent {
        tab_id,
        generation,
        url,
        outcome,
    });

    if events.send(event).is_err() {
        trace!(tab_id = %tab_id, "Delivery queue closed; session gone");
    }
}

/// Download worker.
async fn run_download(
    transport: Arc<dyn Transport>,
    events: EventSender,
    fetch_timeout: Option<Duration>,
    id: DownloadId,
    url: String,
    path: PathBuf,
) {
    let outcome = match download_to(transport.as_ref(), &url, &path, fetch_timeout).await {
        Ok(bytes) => DownloadOutcome::Completed { bytes },
        Err(e) => {
            warn!(download_id = %id, url = %url, error = %e, "Download failed");
            DownloadOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let event = Event::Download(DownloadEvent { id, path, outcome });
    if events.send(event).is_err() {
        trace!(download_id = %id, "Delivery queue closed; session gone");
    }
}

/// Fetches `url` and writes the body to `path`.
async fn download_to(
    transport: &dyn Transport,
    url: &str,
    path: &Path,
    fetch_timeout: Option<Duration>,
) -> Result<u64> {
    let response = fetch_bounded(transport, url, fetch_timeout).await?;
    if !response.is_success() {
        return Err(Error::http_status(response.status));
    }

    tokio::fs::write(path, &response.body).await?;
    Ok(response.body.len() as u64)
}

// ============================================================================
// Tests
// ============================================================================

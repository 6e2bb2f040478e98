//! Tab navigation methods.
//!
//! Every navigation, including moves through history and reloads, starts a
//! fresh fetch. There is no content cache.

use tracing::debug;

use crate::browser::query;
use crate::error::Result;
use crate::transport::FetchCoordinator;

use super::{Tab, TabStatus};

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates to address bar input.
    ///
    /// Absolute URLs and bare hosts load directly; anything else is sent to
    /// `search_template`. Returns the URL being fetched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) for blank
    /// input, or a configuration error if the search template is unusable.
    pub fn navigate_to(
        &mut self,
        input: &str,
        search_template: &str,
        fetcher: &FetchCoordinator,
    ) -> Result<String> {
        let url = query::resolve(input, search_template)?;
        debug!(url = %url, tab_id = %self.id, "Navigating");

        self.history.visit(url.clone());
        self.start_fetch(url.clone(), fetcher);
        Ok(url)
    }

    /// Moves back in history and re-fetches that page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`](crate::Error::NoHistory) at the first
    /// entry.
    pub fn go_back(&mut self, fetcher: &FetchCoordinator) -> Result<String> {
        let url = self.history.back()?.to_string();
        debug!(url = %url, tab_id = %self.id, "Navigating back");

        self.start_fetch(url.clone(), fetcher);
        Ok(url)
    }

    /// Moves forward in history and re-fetches that page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`](crate::Error::NoHistory) at the last
    /// entry.
    pub fn go_forward(&mut self, fetcher: &FetchCoordinator) -> Result<String> {
        let url = self.history.forward()?.to_string();
        debug!(url = %url, tab_id = %self.id, "Navigating forward");

        self.start_fetch(url.clone(), fetcher);
        Ok(url)
    }

    /// Re-fetches the current page without touching history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`](crate::Error::EmptyHistory) if
    /// nothing was visited.
    pub fn reload(&mut self, fetcher: &FetchCoordinator) -> Result<String> {
        let url = self.history.current()?.to_string();
        debug!(url = %url, tab_id = %self.id, "Reloading page");

        self.start_fetch(url.clone(), fetcher);
        Ok(url)
    }

    /// Closes this tab.
    ///
    /// Any in-flight fetch is cancelled and the generation bumped, so a
    /// result that still arrives is dropped.
    pub fn close(&mut self) {
        debug!(tab_id = %self.id, "Closing tab");
        self.cancel_pending();
        self.generation = self.generation.next();
        self.status = TabStatus::Closed;
    }
}

// ============================================================================
// Tab - Internal
// ============================================================================

impl Tab {
    /// Supersedes any live job and starts fetching `url`.
    fn start_fetch(&mut self, url: String, fetcher: &FetchCoordinator) {
        self.cancel_pending();
        self.generation = self.generation.next();
        self.url = Some(url.clone());
        self.status = TabStatus::Loading { url: url.clone() };
        self.pending = Some(fetcher.start_fetch(self.id, self.generation, url));
    }

    /// Cancels the live job, if any.
    fn cancel_pending(&mut self) {
        if let Some(job) = self.pending.take() {
            debug!(
                tab_id = %self.id,
                generation = %job.generation,
                url = %job.url,
                "Cancelling superseded fetch"
            );
            job.cancel();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Tab set, routing and result application.
//!
//! A [`Session`] is owned by a single coordinating task. Every mutating
//! method takes `&mut self`, so mutations never interleave. Fetch workers
//! never touch the session; their results wait on the delivery queue until
//! the owner drains it with [`Session::poll_updates`] or
//! [`Session::next_update`].
//!
//! # Example
//!
//! ```no_run
//! use tab_session::{Session, SessionUpdate};
//!
//! # async fn example() -> tab_session::Result<()> {
//! let mut session = Session::builder().build()?;
//!
//! session.navigate("example.com")?;
//! while let Some(update) = session.next_update().await {
//!     if let SessionUpdate::Loaded { tab_id, url } = update {
//!         println!("{tab_id}: {url}");
//!     }
//! }
//!
//! println!("{}", session.active_tab().title());
//! session.shutdown()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use tracing::{debug, info, trace, warn};

use crate::config::{SessionBuilder, Settings, Theme};
use crate::error::{Error, Result};
use crate::identifiers::{DownloadId, Generation, TabId};
use crate::protocol::{DownloadEvent, DownloadOutcome, Event, FetchEvent, FetchOutcome};
use crate::store::{BookmarkStore, HistoryLog, Persistence};
use crate::transport::FetchCoordinator;
use crate::transport::coordinator::EventReceiver;

use super::download::DownloadRecord;
use super::render::Renderer;
use super::tab::Tab;

// ============================================================================
// SessionUpdate
// ============================================================================

/// What happened when one queued event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A current fetch succeeded and was rendered.
    Loaded {
        /// Tab that loaded.
        tab_id: TabId,
        /// Loaded URL.
        url: String,
    },
    /// A current fetch failed.
    Failed {
        /// Tab that failed.
        tab_id: TabId,
        /// URL that failed.
        url: String,
        /// Human-readable reason.
        reason: String,
    },
    /// A superseded result, or one for a closed tab, was dropped.
    Discarded {
        /// Tab the result was for.
        tab_id: TabId,
        /// Generation the result carried.
        generation: Generation,
    },
    /// A download finished.
    DownloadFinished {
        /// Download ID.
        id: DownloadId,
        /// Destination file.
        path: PathBuf,
        /// What happened.
        outcome: DownloadOutcome,
    },
}

// ============================================================================
// Session
// ============================================================================

/// A multi-tab browsing session.
///
/// Always holds at least one tab, and exactly one tab is active.
pub struct Session {
    /// Tabs by ID.
    tabs: FxHashMap<TabId, Tab>,
    /// Display order.
    order: Vec<TabId>,
    /// Active tab; always a key of `tabs`.
    active: TabId,
    /// Next tab ID to hand out.
    next_tab_id: TabId,
    /// Fetch scheduling.
    coordinator: FetchCoordinator,
    /// Delivery queue receiver.
    events: EventReceiver,
    /// Global visit log.
    history_log: HistoryLog,
    /// Bookmarks.
    bookmarks: BookmarkStore,
    /// Current settings.
    settings: Settings,
    /// Display hook.
    renderer: Box<dyn Renderer>,
    /// Saved state.
    persistence: Box<dyn Persistence>,
    /// Downloads in start order.
    downloads: Vec<DownloadRecord>,
    /// Next download ID to hand out.
    next_download_id: DownloadId,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("order", &self.order)
            .field("active", &self.active)
            .field("bookmarks", &self.bookmarks.len())
            .field("history", &self.history_log.len())
            .field("downloads", &self.downloads.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Construction
// ============================================================================

impl Session {
    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Assembles a session holding one blank tab.
    pub(crate) fn new(
        settings: Settings,
        bookmarks: BookmarkStore,
        coordinator: FetchCoordinator,
        events: EventReceiver,
        renderer: Box<dyn Renderer>,
        persistence: Box<dyn Persistence>,
    ) -> Self {
        let first = TabId::FIRST;
        let mut tabs = FxHashMap::default();
        tabs.insert(first, Tab::new(first));

        Self {
            tabs,
            order: vec![first],
            active: first,
            next_tab_id: first.next(),
            coordinator,
            events,
            history_log: HistoryLog::new(settings.save_history),
            bookmarks,
            settings,
            renderer,
            persistence,
            downloads: Vec::new(),
            next_download_id: DownloadId::FIRST,
        }
    }
}

// ============================================================================
// Session - Tabs
// ============================================================================

impl Session {
    /// Opens a tab, optionally navigating it, and makes it active.
    ///
    /// Bad initial input leaves the new tab blank; the error is logged.
    pub fn new_tab(&mut self, input: Option<&str>) -> TabId {
        let id = self.allocate_tab_id();
        let mut tab = Tab::new(id);

        if let Some(input) = input
            && let Err(e) = tab.navigate_to(input, &self.settings.search_template, &self.coordinator)
        {
            warn!(tab_id = %id, input = %input, error = %e, "Initial navigation failed");
        }

        self.tabs.insert(id, tab);
        self.order.push(id);
        self.active = id;
        debug!(tab_id = %id, tab_count = self.order.len(), "Opened tab");
        id
    }

    /// Closes a tab and cancels its in-flight fetch.
    ///
    /// Closing the active tab activates its left neighbour, or the new
    /// leftmost tab when it was first. Closing the last tab opens a fresh
    /// blank one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTab`] if no such tab exists.
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<()> {
        let mut tab = self
            .tabs
            .remove(&tab_id)
            .ok_or_else(|| Error::unknown_tab(tab_id))?;
        tab.close();

        let index = self
            .order
            .iter()
            .position(|&id| id == tab_id)
            .unwrap_or_default();
        self.order.retain(|&id| id != tab_id);

        if self.order.is_empty() {
            let id = self.allocate_tab_id();
            self.tabs.insert(id, Tab::new(id));
            self.order.push(id);
            self.active = id;
            debug!(closed = %tab_id, tab_id = %id, "Closed last tab; opened blank tab");
        } else if self.active == tab_id {
            let neighbour = index.saturating_sub(1).min(self.order.len() - 1);
            self.active = self.order[neighbour];
            debug!(closed = %tab_id, active = %self.active, "Closed active tab");
        } else {
            debug!(closed = %tab_id, "Closed tab");
        }

        Ok(())
    }

    /// Makes a tab active. Does not fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTab`] if no such tab exists.
    pub fn select_tab(&mut self, tab_id: TabId) -> Result<()> {
        if !self.tabs.contains_key(&tab_id) {
            return Err(Error::unknown_tab(tab_id));
        }
        self.active = tab_id;
        trace!(tab_id = %tab_id, "Selected tab");
        Ok(())
    }

    /// Returns the active tab.
    #[inline]
    #[must_use]
    pub fn active_tab(&self) -> &Tab {
        &self.tabs[&self.active]
    }

    /// Returns the active tab ID.
    #[inline]
    #[must_use]
    pub fn active_tab_id(&self) -> TabId {
        self.active
    }

    /// Returns a tab by ID.
    #[inline]
    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.get(&tab_id)
    }

    /// Iterates tabs in display order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.order.iter().filter_map(|id| self.tabs.get(id))
    }

    /// Returns tab IDs in display order.
    #[inline]
    #[must_use]
    pub fn tab_ids(&self) -> &[TabId] {
        &self.order
    }

    /// Returns the number of open tabs.
    #[inline]
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.order.len()
    }

    fn allocate_tab_id(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id = id.next();
        id
    }
}

// ============================================================================
// Session - Navigation
// ============================================================================

impl Session {
    /// Navigates the active tab to address bar input.
    ///
    /// Returns the URL being fetched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank input.
    pub fn navigate(&mut self, input: &str) -> Result<String> {
        self.navigate_tab(self.active, input)
    }

    /// Navigates a specific tab.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownTab`] if no such tab exists
    /// - [`Error::InvalidInput`] for blank input
    pub fn navigate_tab(&mut self, tab_id: TabId, input: &str) -> Result<String> {
        tab_mut(&mut self.tabs, tab_id)?.navigate_to(
            input,
            &self.settings.search_template,
            &self.coordinator,
        )
    }

    /// Moves the active tab back and re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`] at the first entry.
    pub fn go_back(&mut self) -> Result<String> {
        tab_mut(&mut self.tabs, self.active)?.go_back(&self.coordinator)
    }

    /// Moves the active tab forward and re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHistory`] at the last entry.
    pub fn go_forward(&mut self) -> Result<String> {
        tab_mut(&mut self.tabs, self.active)?.go_forward(&self.coordinator)
    }

    /// Re-fetches the active tab's current page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`] if the tab never navigated.
    pub fn reload(&mut self) -> Result<String> {
        tab_mut(&mut self.tabs, self.active)?.reload(&self.coordinator)
    }

    /// Navigates the active tab to the homepage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no homepage is set.
    pub fn go_home(&mut self) -> Result<String> {
        let homepage = self
            .settings
            .homepage()
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_input("no homepage set"))?;
        self.navigate(&homepage)
    }
}

/// Looks up a tab for mutation while the caller borrows other fields.
fn tab_mut(tabs: &mut FxHashMap<TabId, Tab>, tab_id: TabId) -> Result<&mut Tab> {
    tabs.get_mut(&tab_id)
        .ok_or_else(|| Error::unknown_tab(tab_id))
}

// ============================================================================
// Session - Updates
// ============================================================================

impl Session {
    /// Applies every queued result without waiting.
    pub fn poll_updates(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            updates.push(self.apply_event(event));
        }
        updates
    }

    /// Waits for the next queued result and applies it.
    ///
    /// Returns `None` at once when nothing is queued and no fetch or
    /// download is outstanding.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        if let Ok(event) = self.events.try_recv() {
            return Some(self.apply_event(event));
        }
        if !self.has_outstanding_work() {
            return None;
        }

        let event = self.events.recv().await?;
        Some(self.apply_event(event))
    }

    /// Returns `true` while any tab is loading or any download is pending.
    #[must_use]
    pub fn has_outstanding_work(&self) -> bool {
        self.tabs.values().any(Tab::is_loading)
            || self.downloads.iter().any(|d| d.state().is_pending())
    }

    fn apply_event(&mut self, event: Event) -> SessionUpdate {
        match event {
            Event::Fetch(event) => self.apply_fetch(event),
            Event::Download(event) => self.apply_download(event),
        }
    }

    fn apply_fetch(&mut self, event: FetchEvent) -> SessionUpdate {
        let FetchEvent {
            tab_id,
            generation,
            url,
            outcome,
        } = event;

        let Some(tab) = self
            .tabs
            .get_mut(&tab_id)
            .filter(|tab| tab.is_current(generation))
        else {
            trace!(tab_id = %tab_id, generation = %generation, url = %url, "Discarding stale result");
            return SessionUpdate::Discarded { tab_id, generation };
        };

        let update = match &outcome {
            FetchOutcome::Loaded { title, body, .. } => {
                self.renderer.render(tab_id, body);
                self.history_log.record(url.clone(), title.clone());
                debug!(tab_id = %tab_id, url = %url, title = %title, "Page loaded");
                SessionUpdate::Loaded { tab_id, url }
            }
            FetchOutcome::Failed { reason } => {
                debug!(tab_id = %tab_id, url = %url, reason = %reason, "Page failed");
                SessionUpdate::Failed {
                    tab_id,
                    url,
                    reason: reason.clone(),
                }
            }
        };

        tab.apply_outcome(outcome);
        update
    }

    fn apply_download(&mut self, event: DownloadEvent) -> SessionUpdate {
        let DownloadEvent { id, path, outcome } = event;

        match self.downloads.iter_mut().find(|d| d.id() == id) {
            Some(record) => record.finish(outcome.clone()),
            None => warn!(download_id = %id, "Result for unknown download"),
        }
        debug!(download_id = %id, path = %path.display(), outcome = ?outcome, "Download finished");

        SessionUpdate::DownloadFinished { id, path, outcome }
    }
}

// ============================================================================
// Session - Bookmarks & History
// ============================================================================

impl Session {
    /// Bookmarks a page and saves bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBookmarked`] if `url` is already saved.
    pub fn add_bookmark(&mut self, url: &str, title: &str) -> Result<()> {
        self.bookmarks.add(url, title)?;
        debug!(url = %url, "Bookmarked");
        self.save_bookmarks();
        Ok(())
    }

    /// Bookmarks the active tab's page. Returns the bookmarked URL.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyHistory`] if the active tab never navigated
    /// - [`Error::AlreadyBookmarked`] if the page is already saved
    pub fn bookmark_active(&mut self) -> Result<String> {
        let tab = self.active_tab();
        let url = tab.url().ok_or(Error::EmptyHistory)?.to_string();
        let title = tab.title().to_string();

        self.add_bookmark(&url, &title)?;
        Ok(url)
    }

    /// Removes a bookmark. Returns `false` if it was absent.
    pub fn remove_bookmark(&mut self, url: &str) -> bool {
        let removed = self.bookmarks.remove(url);
        if removed {
            debug!(url = %url, "Removed bookmark");
            self.save_bookmarks();
        }
        removed
    }

    /// Returns the bookmarks.
    #[inline]
    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    /// Returns the global visit log.
    #[inline]
    #[must_use]
    pub fn history_log(&self) -> &HistoryLog {
        &self.history_log
    }

    /// Empties the global visit log. Tab histories are kept.
    pub fn clear_history(&mut self) {
        debug!(entries = self.history_log.len(), "Clearing history");
        self.history_log.clear();
    }

    fn save_bookmarks(&self) {
        if let Err(e) = self.persistence.save_bookmarks(self.bookmarks.entries()) {
            warn!(error = %e, "Failed to save bookmarks");
        }
    }
}

// ============================================================================
// Session - Settings
// ============================================================================

impl Session {
    /// Returns the current settings.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings and saves them.
    ///
    /// A new fetch timeout applies to fetches started afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `settings` fail validation; the current
    /// settings are kept.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;

        self.history_log.set_enabled(settings.save_history);
        self.coordinator.set_fetch_timeout(settings.fetch_timeout());
        self.settings = settings;
        debug!(settings = ?self.settings, "Settings updated");

        self.save_settings();
        Ok(())
    }

    /// Switches between light and dark theme and saves. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.settings.theme = self.settings.theme.toggled();
        debug!(theme = %self.settings.theme, "Theme toggled");
        self.save_settings();
        self.settings.theme
    }

    fn save_settings(&self) {
        if let Err(e) = self.persistence.save_settings(&self.settings) {
            warn!(error = %e, "Failed to save settings");
        }
    }
}

// ============================================================================
// Session - Downloads
// ============================================================================

impl Session {
    /// Downloads the active tab's current page into `dest`.
    ///
    /// Completion arrives as [`SessionUpdate::DownloadFinished`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`] if the active tab never navigated.
    pub fn download(&mut self, dest: impl Into<PathBuf>) -> Result<DownloadId> {
        let url = self.active_tab().history().current()?.to_string();
        let path = dest.into();

        let id = self.next_download_id;
        self.next_download_id = id.next();

        self.coordinator.start_download(id, url.clone(), path.clone());
        self.downloads.push(DownloadRecord::pending(id, url, path));
        Ok(id)
    }

    /// Returns downloads in start order.
    #[inline]
    #[must_use]
    pub fn downloads(&self) -> &[DownloadRecord] {
        &self.downloads
    }

    /// Forgets completed and failed downloads. Returns how many were removed.
    pub fn clear_finished_downloads(&mut self) -> usize {
        let before = self.downloads.len();
        self.downloads.retain(|d| d.state().is_pending());
        before - self.downloads.len()
    }
}

// ============================================================================
// Session - Shutdown
// ============================================================================

impl Session {
    /// Cancels in-flight fetches and saves bookmarks and settings.
    ///
    /// # Errors
    ///
    /// Returns the first persistence error. Fetches are cancelled either way.
    pub fn shutdown(mut self) -> Result<()> {
        for tab in self.tabs.values_mut() {
            tab.close();
        }

        let bookmarks = self.persistence.save_bookmarks(self.bookmarks.entries());
        let settings = self.persistence.save_settings(&self.settings);
        info!(
            tabs = self.order.len(),
            bookmarks = self.bookmarks.len(),
            "Session shut down"
        );

        bookmarks.and(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::browser::TabStatus;
    use crate::browser::download::DownloadState;
    use crate::protocol::FetchResponse;
    use crate::store::MemoryStore;
    use crate::transport::Transport;

    /// Titles every page with its URL; `/missing` is a 404.
    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn fetch(&self, url: &str) -> crate::Result<FetchResponse> {
            if url.ends_with("/missing") {
                return Ok(FetchResponse::new(404, Vec::new()));
            }
            Ok(FetchResponse::ok(format!("<title>{url}</title>")))
        }
    }

    /// Counts calls and echoes like [`EchoTransport`].
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn fetch(&self, url: &str) -> crate::Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            EchoTransport.fetch(url).await
        }
    }

    /// Panics on every call.
    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn fetch(&self, _url: &str) -> crate::Result<FetchResponse> {
            panic!("transport bug")
        }
    }

    fn session() -> Session {
        Session::builder()
            .transport(Arc::new(EchoTransport))
            .settings(Settings::new().without_homepage())
            .build()
            .expect("build session")
    }

    async fn drain(session: &mut Session) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(update) = session.next_update().await {
                updates.push(update);
            }
        })
        .await
        .expect("updates drain");
        updates
    }

    #[tokio::test]
    async fn test_navigate_loads_active_tab() {
        let mut session = session();
        session.navigate("example.com").unwrap();

        let updates = drain(&mut session).await;
        assert_eq!(
            updates,
            vec![SessionUpdate::Loaded {
                tab_id: TabId::FIRST,
                url: "http://example.com/".into()
            }]
        );

        let tab = session.active_tab();
        assert_eq!(tab.title(), "http://example.com/");
        assert_eq!(tab.status(), &TabStatus::Loaded { status: 200 });
        assert_eq!(session.history_log().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_updates_status_only() {
        let mut session = session();
        session.navigate("http://a.test/missing").unwrap();

        let updates = drain(&mut session).await;
        assert!(matches!(updates[..], [SessionUpdate::Failed { .. }]));
        assert_eq!(
            session.active_tab().status().text(),
            "Failed to load page: HTTP status 404"
        );
        assert!(session.history_log().is_empty());
    }

    #[tokio::test]
    async fn test_stale_result_never_overwrites_newer() {
        let mut session = session();
        let stale_sender = session.coordinator.sender();

        session.navigate("a.test").unwrap();
        let stale_generation = session.active_tab().generation();
        session.navigate("b.test").unwrap();
        drain(&mut session).await;
        assert_eq!(session.active_tab().title(), "http://b.test/");

        stale_sender
            .send(Event::Fetch(FetchEvent {
                tab_id: TabId::FIRST,
                generation: stale_generation,
                url: "http://a.test/".into(),
                outcome: FetchOutcome::Loaded {
                    status: 200,
                    title: "stale".into(),
                    body: "stale".into(),
                },
            }))
            .unwrap();

        let updates = session.poll_updates();
        assert_eq!(
            updates,
            vec![SessionUpdate::Discarded {
                tab_id: TabId::FIRST,
                generation: stale_generation
            }]
        );
        assert_eq!(session.active_tab().title(), "http://b.test/");
        assert_eq!(session.active_tab().content(), Some("<title>http://b.test/</title>"));
    }

    #[tokio::test]
    async fn test_result_for_closed_tab_is_discarded() {
        let mut session = session();
        let sender = session.coordinator.sender();
        let tab_id = session.new_tab(None);
        session.close_tab(tab_id).unwrap();

        sender
            .send(Event::Fetch(FetchEvent {
                tab_id,
                generation: Generation::initial(),
                url: "http://a.test/".into(),
                outcome: FetchOutcome::Failed {
                    reason: "late".into(),
                },
            }))
            .unwrap();

        assert!(matches!(
            session.poll_updates()[..],
            [SessionUpdate::Discarded { .. }]
        ));
    }

    #[tokio::test]
    async fn test_closing_only_tab_leaves_one_blank_tab() {
        let mut session = session();
        session.navigate("a.test").unwrap();

        session.close_tab(TabId::FIRST).unwrap();

        assert_eq!(session.tab_count(), 1);
        let tab = session.active_tab();
        assert_ne!(tab.id(), TabId::FIRST);
        assert!(tab.is_blank());
        assert!(!session.has_outstanding_work());
    }

    #[tokio::test]
    async fn test_close_activates_left_neighbour() {
        let mut session = session();
        let second = session.new_tab(None);
        let third = session.new_tab(None);

        session.close_tab(third).unwrap();
        assert_eq!(session.active_tab_id(), second);

        session.select_tab(TabId::FIRST).unwrap();
        session.close_tab(TabId::FIRST).unwrap();
        assert_eq!(session.active_tab_id(), second);

        let fourth = session.new_tab(None);
        session.select_tab(second).unwrap();
        session.close_tab(fourth).unwrap();
        assert_eq!(session.active_tab_id(), second);
        assert_eq!(session.tab_ids(), [second]);
    }

    #[tokio::test]
    async fn test_unknown_tab_errors() {
        let mut session = session();
        let missing = TabId::new(99).unwrap();

        assert!(matches!(session.close_tab(missing), Err(Error::UnknownTab { .. })));
        assert!(matches!(session.select_tab(missing), Err(Error::UnknownTab { .. })));
        assert!(matches!(
            session.navigate_tab(missing, "a.test"),
            Err(Error::UnknownTab { .. })
        ));
        assert_eq!(session.tab_count(), 1);
    }

    #[tokio::test]
    async fn test_new_tab_with_bad_input_stays_blank() {
        let mut session = session();
        let id = session.new_tab(Some("   "));

        assert_eq!(session.active_tab_id(), id);
        assert!(session.active_tab().is_blank());
        assert_eq!(session.tab_count(), 2);
    }

    #[tokio::test]
    async fn test_select_tab_does_not_fetch() {
        let mut session = session();
        session.navigate("a.test").unwrap();
        drain(&mut session).await;
        let generation = session.active_tab().generation();

        session.new_tab(None);
        session.select_tab(TabId::FIRST).unwrap();

        assert_eq!(session.active_tab().generation(), generation);
        assert!(!session.has_outstanding_work());
    }

    #[tokio::test]
    async fn test_renderer_sees_applied_bodies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut session = Session::builder()
            .transport(Arc::new(EchoTransport))
            .settings(Settings::new().without_homepage())
            .renderer(move |tab_id: TabId, body: &str| sink.lock().push((tab_id, body.to_string())))
            .build()
            .unwrap();

        session.navigate("a.test").unwrap();
        drain(&mut session).await;

        assert_eq!(
            *seen.lock(),
            vec![(TabId::FIRST, "<title>http://a.test/</title>".to_string())]
        );
    }

    #[tokio::test]
    async fn test_bookmark_active_twice() {
        let mut session = session();
        assert!(matches!(session.bookmark_active(), Err(Error::EmptyHistory)));

        session.navigate("a.test").unwrap();
        drain(&mut session).await;

        assert_eq!(session.bookmark_active().unwrap(), "http://a.test/");
        assert!(matches!(
            session.bookmark_active(),
            Err(Error::AlreadyBookmarked { .. })
        ));
        assert_eq!(session.bookmarks().len(), 1);
        assert_eq!(session.bookmarks().entries()[0].title, "http://a.test/");

        assert!(session.remove_bookmark("http://a.test/"));
        assert!(!session.remove_bookmark("http://a.test/"));
    }

    #[tokio::test]
    async fn test_history_recording_follows_settings() {
        let mut session = session();
        let settings = session.settings().clone().with_save_history(false);
        session.update_settings(settings).unwrap();

        session.navigate("a.test").unwrap();
        drain(&mut session).await;
        assert!(session.history_log().is_empty());

        let invalid = session.settings().clone().with_search_template("nope");
        assert!(session.update_settings(invalid).is_err());
        assert!(!session.settings().save_history);
    }

    #[tokio::test]
    async fn test_go_home_and_toggle_theme() {
        let mut session = session();
        assert!(matches!(session.go_home(), Err(Error::InvalidInput { .. })));

        let settings = session.settings().clone().with_homepage("home.test");
        session.update_settings(settings).unwrap();
        assert_eq!(session.go_home().unwrap(), "http://home.test/");

        assert_eq!(session.toggle_theme(), Theme::Dark);
        assert_eq!(session.toggle_theme(), Theme::Light);
    }

    #[tokio::test]
    async fn test_download_reports_through_queue() {
        let dir = tempfile::tempdir().expect("temp dir");
        let dest = dir.path().join("a.html");
        let mut session = session();
        assert!(matches!(session.download(&dest), Err(Error::EmptyHistory)));

        session.navigate("a.test").unwrap();
        drain(&mut session).await;

        let id = session.download(&dest).unwrap();
        assert!(session.has_outstanding_work());
        let updates = drain(&mut session).await;

        assert!(matches!(
            updates[..],
            [SessionUpdate::DownloadFinished { id: done, .. }] if done == id
        ));
        assert!(matches!(
            session.downloads()[0].state(),
            DownloadState::Completed { bytes } if *bytes > 0
        ));
        assert!(dest.is_file());
    }

    #[tokio::test]
    async fn test_clear_finished_downloads_keeps_pending() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = session();
        session.navigate("a.test").unwrap();
        drain(&mut session).await;

        session.download(dir.path().join("a.html")).unwrap();
        assert_eq!(session.clear_finished_downloads(), 0);
        assert_eq!(session.downloads().len(), 1);

        drain(&mut session).await;
        session.download(dir.path().join("b.html")).unwrap();
        assert_eq!(session.clear_finished_downloads(), 1);
        assert_eq!(session.downloads().len(), 1);
        assert!(session.downloads()[0].state().is_pending());

        drain(&mut session).await;
        assert_eq!(session.clear_finished_downloads(), 1);
        assert!(session.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_reload_refetches_without_new_history_entry() {
        let transport = Arc::new(CountingTransport::default());
        let mut session = Session::builder()
            .transport(Arc::clone(&transport) as Arc<dyn Transport>)
            .settings(Settings::new().without_homepage())
            .build()
            .unwrap();

        session.navigate("a.test").unwrap();
        drain(&mut session).await;

        assert_eq!(session.reload().unwrap(), "http://a.test/");
        assert!(session.active_tab().is_loading());
        let updates = drain(&mut session).await;

        assert_eq!(
            updates,
            vec![SessionUpdate::Loaded {
                tab_id: TabId::FIRST,
                url: "http://a.test/".into()
            }]
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        let tab = session.active_tab();
        assert_eq!(tab.history().len(), 1);
        assert_eq!(tab.status(), &TabStatus::Loaded { status: 200 });
    }

    #[tokio::test]
    async fn test_panicking_transport_fails_the_load() {
        let mut session = Session::builder()
            .transport(Arc::new(PanickingTransport))
            .settings(Settings::new().without_homepage())
            .build()
            .unwrap();

        session.navigate("a.test").unwrap();
        let update = tokio::time::timeout(Duration::from_secs(2), session.next_update())
            .await
            .expect("panic is reported");

        assert!(matches!(
            update,
            Some(SessionUpdate::Failed { ref reason, .. }) if reason.contains("transport panicked")
        ));
        assert!(!session.active_tab().is_loading());
        assert!(!session.has_outstanding_work());
        assert_eq!(session.next_update().await, None);
    }

    #[tokio::test]
    async fn test_next_update_returns_none_when_idle() {
        let mut session = session();
        assert_eq!(session.next_update().await, None);
    }

    #[tokio::test]
    async fn test_shutdown_saves_state() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::builder()
            .transport(Arc::new(EchoTransport))
            .settings(Settings::new().without_homepage())
            .persistence(Arc::clone(&store))
            .build()
            .unwrap();

        session.add_bookmark("http://a.test/", "A").unwrap();
        session.toggle_theme();
        session.shutdown().unwrap();

        assert_eq!(store.load_bookmarks().unwrap().len(), 1);
        assert_eq!(store.load_settings().unwrap().theme, Theme::Dark);
    }
}

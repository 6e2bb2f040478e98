//! Core Tab struct and accessors.

use std::fmt;

use crate::browser::NavigationHistory;
use crate::identifiers::{Generation, TabId};
use crate::protocol::{FetchJob, FetchOutcome};

// ============================================================================
// Constants
// ============================================================================

/// Title shown before anything has loaded.
pub const BLANK_TITLE: &str = "New Tab";

// ============================================================================
// TabStatus
// ============================================================================

/// Load state of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabStatus {
    /// Nothing requested yet.
    Blank,
    /// A fetch is in flight.
    Loading {
        /// URL being fetched.
        url: String,
    },
    /// The latest fetch succeeded.
    Loaded {
        /// HTTP status code.
        status: u16,
    },
    /// The latest fetch failed.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
    /// The tab was closed.
    Closed,
}

impl TabStatus {
    /// Returns the status line shown to the user.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Loading { url } => format!("Loading {url}"),
            Self::Loaded { status } => format!("Done ({status})"),
            Self::Failed { reason } => format!("Failed to load page: {reason}"),
            Self::Closed => "Closed".to_string(),
        }
    }
}

impl fmt::Display for TabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

// ============================================================================
// Tab
// ============================================================================

/// An independently navigable browsing context.
///
/// A tab owns its [`NavigationHistory`] and at most one live [`FetchJob`].
/// Tabs are created and destroyed by the [`Session`](crate::Session).
pub struct Tab {
    /// Tab ID.
    pub(super) id: TabId,
    /// Display title.
    pub(super) title: String,
    /// URL of the most recent navigation.
    pub(super) url: Option<String>,
    /// Load state.
    pub(super) status: TabStatus,
    /// Body of the last successful fetch.
    pub(super) content: Option<String>,
    /// Back/forward history.
    pub(super) history: NavigationHistory,
    /// Current navigation generation.
    pub(super) generation: Generation,
    /// In-flight fetch, if any.
    pub(super) pending: Option<FetchJob>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("url", &self.url)
            .field("status", &self.status)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Creates a blank tab.
    pub(crate) fn new(id: TabId) -> Self {
        Self {
            id,
            title: BLANK_TITLE.to_string(),
            url: None,
            status: TabStatus::Blank,
            content: None,
            history: NavigationHistory::new(),
            generation: Generation::initial(),
            pending: None,
        }
    }
}

// ============================================================================
// Tab - Accessors
// ============================================================================

impl Tab {
    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Returns the display title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the URL of the most recent navigation.
    #[inline]
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the load state.
    #[inline]
    #[must_use]
    pub fn status(&self) -> &TabStatus {
        &self.status
    }

    /// Returns the body of the last successful fetch.
    #[inline]
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the back/forward history.
    #[inline]
    #[must_use]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// Returns the current generation.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the in-flight fetch, if any.
    #[inline]
    #[must_use]
    pub fn pending_fetch(&self) -> Option<&FetchJob> {
        self.pending.as_ref()
    }

    /// Returns `true` while a fetch is in flight.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `true` if no navigation ever happened.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.history.is_empty()
    }
}

// ============================================================================
// Tab - Result Application
// ============================================================================

impl Tab {
    /// Returns `true` if a result tagged `generation` may be applied.
    #[inline]
    #[must_use]
    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation && self.status != TabStatus::Closed
    }

    /// Applies a current-generation outcome.
    ///
    /// Failures only change the status; the previous content stays.
    pub(crate) fn apply_outcome(&mut self, outcome: FetchOutcome) {
        self.pending = None;
        match outcome {
            FetchOutcome::Loaded {
                status,
                title,
                body,
            } => {
                self.title = title;
                self.content = Some(body);
                self.status = TabStatus::Loaded { status };
            }
            FetchOutcome::Failed { reason } => {
                self.status = TabStatus::Failed { reason };
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tab() -> Tab {
        Tab::new(TabId::FIRST)
    }

    #[test]
    fn test_new_tab_is_blank() {
        let tab = tab();
        assert!(tab.is_blank());
        assert!(!tab.is_loading());
        assert_eq!(tab.title(), BLANK_TITLE);
        assert_eq!(tab.url(), None);
        assert_eq!(tab.status(), &TabStatus::Blank);
        assert_eq!(tab.generation(), Generation::initial());
    }

    #[test]
    fn test_apply_loaded() {
        let mut tab = tab();
        tab.apply_outcome(FetchOutcome::Loaded {
            status: 200,
            title: "Example".into(),
            body: "<p>hi</p>".into(),
        });
        assert_eq!(tab.title(), "Example");
        assert_eq!(tab.content(), Some("<p>hi</p>"));
        assert_eq!(tab.status().text(), "Done (200)");
    }

    #[test]
    fn test_apply_failed_keeps_content() {
        let mut tab = tab();
        tab.apply_outcome(FetchOutcome::Loaded {
            status: 200,
            title: "Example".into(),
            body: "old".into(),
        });
        tab.apply_outcome(FetchOutcome::Failed {
            reason: "HTTP status 500".into(),
        });
        assert_eq!(tab.content(), Some("old"));
        assert_eq!(tab.title(), "Example");
        assert_eq!(
            tab.status().to_string(),
            "Failed to load page: HTTP status 500"
        );
    }

    #[test]
    fn test_tab_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Tab>();
    }
}

//! Builder pattern for session configuration.
//!
//! Provides a fluent API for configuring and creating [`Session`] instances.
//!
//! # Example
//!
//! ```no_run
//! use tab_session::{JsonFileStore, Session, Settings};
//!
//! # async fn example() -> tab_session::Result<()> {
//! let session = Session::builder()
//!     .settings(Settings::new().with_homepage("https://example.com"))
//!     .persistence(JsonFileStore::default_location()?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::browser::{NoopRenderer, Renderer, Session};
use crate::error::{Error, Result};
use crate::store::{BookmarkStore, MemoryStore, Persistence};
use crate::transport::{FetchCoordinator, HttpTransport, Transport};

use super::Settings;

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring a [`Session`].
///
/// Use [`Session::builder()`] to create a new builder.
pub struct SessionBuilder {
    /// Explicit settings; loaded from persistence when unset.
    settings: Option<Settings>,
    /// Fetch transport; [`HttpTransport`] when unset.
    transport: Option<Arc<dyn Transport>>,
    /// Display hook.
    renderer: Box<dyn Renderer>,
    /// Saved state; [`MemoryStore`] when unset.
    persistence: Option<Box<dyn Persistence>>,
    /// Runtime for workers; the current runtime when unset.
    runtime: Option<Handle>,
    /// Navigate the first tab to the homepage.
    open_homepage: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            settings: None,
            transport: None,
            renderer: Box::new(NoopRenderer),
            persistence: None,
            runtime: None,
            open_homepage: true,
        }
    }
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("settings", &self.settings)
            .field("transport", &self.transport.is_some())
            .field("persistence", &self.persistence.is_some())
            .field("runtime", &self.runtime.is_some())
            .field("open_homepage", &self.open_homepage)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a builder with defaults.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses these settings instead of the persisted ones.
    #[inline]
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets the fetch transport.
    #[inline]
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the display hook.
    #[inline]
    #[must_use]
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Sets where bookmarks and settings are loaded from and saved to.
    #[inline]
    #[must_use]
    pub fn persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Some(Box::new(persistence));
        self
    }

    /// Spawns workers on `runtime` instead of the current one.
    #[inline]
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Controls whether the first tab opens the homepage. Default `true`.
    #[inline]
    #[must_use]
    pub fn open_homepage(mut self, open_homepage: bool) -> Self {
        self.open_homepage = open_homepage;
        self
    }

    /// Builds the session.
    ///
    /// Loads persisted state, validates settings and opens the first tab.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if settings are invalid
    /// - [`Error::Config`] if called outside a tokio runtime with no
    ///   [`runtime`](Self::runtime) set
    /// - [`Error::Io`] if saved state exists but cannot be read
    /// - [`Error::Http`] if the default transport cannot be created
    pub fn build(self) -> Result<Session> {
        let runtime = self.resolve_runtime()?;
        let persistence = self
            .persistence
            .unwrap_or_else(|| Box::new(MemoryStore::new()));

        let settings = match self.settings {
            Some(settings) => settings,
            None => persistence.load_settings()?,
        };
        settings.validate()?;

        let bookmarks = BookmarkStore::from_entries(persistence.load_bookmarks()?);
        debug!(bookmarks = bookmarks.len(), "Loaded bookmarks");

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let (coordinator, events) =
            FetchCoordinator::new(transport, runtime, settings.fetch_timeout());
        let open_homepage = self.open_homepage && settings.homepage().is_some();

        let mut session = Session::new(
            settings,
            bookmarks,
            coordinator,
            events,
            self.renderer,
            persistence,
        );
        if open_homepage {
            session.go_home()?;
        }

        info!(
            homepage = open_homepage,
            bookmarks = session.bookmarks().len(),
            "Session started"
        );
        Ok(session)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    /// Returns the configured runtime or the current one.
    fn resolve_runtime(&self) -> Result<Handle> {
        if let Some(runtime) = &self.runtime {
            return Ok(runtime.clone());
        }
        Handle::try_current().map_err(|_| {
            Error::config(
                "No tokio runtime. Call build() inside a runtime or use .runtime().\n\
                 Example: Session::builder().runtime(runtime.handle().clone())",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

//! User settings consulted by the session.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tab_session::config::{Settings, Theme};
//!
//! let settings = Settings::new()
//!     .with_homepage("https://example.com")
//!     .with_search_template("https://duckduckgo.com/?q={query}")
//!     .with_fetch_timeout(Duration::from_secs(15))
//!     .with_theme(Theme::Dark);
//!
//! assert!(settings.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::browser::query;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default homepage.
pub const DEFAULT_HOMEPAGE: &str = "https://www.google.com";

/// Default search template.
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://www.google.com/search?q={query}";

// ============================================================================
// Theme
// ============================================================================

/// Colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on light background.
    #[default]
    Light,
    /// Light text on dark background.
    Dark,
}

impl Theme {
    /// Returns the other theme.
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Session configuration.
///
/// Missing fields take their default when deserialized, so older settings
/// files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page opened in the first tab and by `go_home`; empty for none.
    pub homepage: String,

    /// Search URL with a `{query}` placeholder.
    pub search_template: String,

    /// Record successful loads in the history log.
    pub save_history: bool,

    /// Upper bound on one fetch in milliseconds; `None` for no limit.
    pub fetch_timeout_ms: Option<u64>,

    /// Colour scheme.
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            save_history: true,
            fetch_timeout_ms: None,
            theme: Theme::Light,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl Settings {
    /// Creates default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the homepage.
    #[inline]
    #[must_use]
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = homepage.into();
        self
    }

    /// Disables the homepage; new sessions start on a blank tab.
    #[inline]
    #[must_use]
    pub fn without_homepage(mut self) -> Self {
        self.homepage.clear();
        self
    }

    /// Sets the search template.
    #[inline]
    #[must_use]
    pub fn with_search_template(mut self, template: impl Into<String>) -> Self {
        self.search_template = template.into();
        self
    }

    /// Enables or disables history recording.
    #[inline]
    #[must_use]
    pub fn with_save_history(mut self, save_history: bool) -> Self {
        self.save_history = save_history;
        self
    }

    /// Sets the fetch timeout.
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        let millis = u64::try_from(fetch_timeout.as_millis()).unwrap_or(u64::MAX);
        self.fetch_timeout_ms = Some(millis);
        self
    }

    /// Sets the theme.
    #[inline]
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Settings {
    /// Returns the fetch timeout as a duration.
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the homepage, or `None` when disabled.
    #[inline]
    #[must_use]
    pub fn homepage(&self) -> Option<&str> {
        let homepage = self.homepage.trim();
        (!homepage.is_empty()).then_some(homepage)
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the search template has no `{query}`
    /// - [`Error::Config`] if the homepage is not a URL
    /// - [`Error::Config`] if the fetch timeout is zero
    pub fn validate(&self) -> Result<()> {
        query::validate_template(&self.search_template)
            .map_err(|e| Error::config(format!("invalid search template: {e}")))?;

        if let Some(homepage) = self.homepage() {
            query::resolve(homepage, &self.search_template)
                .and_then(|url| Url::parse(&url).map_err(Error::from))
                .map_err(|e| Error::config(format!("invalid homepage {homepage}: {e}")))?;
        }

        if self.fetch_timeout_ms == Some(0) {
            return Err(Error::config("fetch timeout must be greater than zero"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

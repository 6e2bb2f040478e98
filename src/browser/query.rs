//! Address bar input classification.
//!
//! Input typed by the user is either a URL to load directly or text to hand
//! to the configured search engine.
//!
//! # Example
//!
//! ```
//! use tab_session::browser::query::{classify, Destination};
//!
//! assert!(matches!(classify("example.com").unwrap(), Destination::DirectUrl(_)));
//! assert!(matches!(classify("rust borrow checker").unwrap(), Destination::SearchQuery(_)));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Placeholder replaced by the encoded query in a search template.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Schemes accepted as-is.
const DIRECT_SCHEMES: &[&str] = &["http", "https", "file", "ftp", "about", "data"];

/// Scheme prepended to bare host input.
const DEFAULT_SCHEME: &str = "http://";

/// Bare host with optional port and path: `example.com`, `localhost:3000/x`,
/// `10.0.0.1/status`.
static BARE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(localhost|[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}|\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .expect("bare host pattern is valid")
});

// ============================================================================
// Destination
// ============================================================================

/// Where a piece of address bar input leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Input is (or was normalized into) an absolute URL.
    DirectUrl(Url),
    /// Input is free text for the search engine.
    SearchQuery(String),
}

impl Destination {
    /// Turns the destination into the URL to fetch.
    ///
    /// Search queries are percent-encoded into `search_template` at its
    /// `{query}` placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the template has no placeholder, or
    /// [`Error::Url`] if the filled template is not a URL.
    pub fn into_url(self, search_template: &str) -> Result<String> {
        match self {
            Self::DirectUrl(url) => Ok(url.into()),
            Self::SearchQuery(text) => search_url(search_template, &text),
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Classifies address bar input.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for blank input.
pub fn classify(input: &str) -> Result<Destination> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::invalid_input("address is empty"));
    }

    if input.chars().any(char::is_whitespace) {
        return Ok(Destination::SearchQuery(input.to_string()));
    }

    if let Ok(url) = Url::parse(input)
        && DIRECT_SCHEMES.contains(&url.scheme())
    {
        return Ok(Destination::DirectUrl(url));
    }

    if BARE_HOST.is_match(input)
        && let Ok(url) = Url::parse(&format!("{DEFAULT_SCHEME}{input}"))
    {
        return Ok(Destination::DirectUrl(url));
    }

    Ok(Destination::SearchQuery(input.to_string()))
}

/// Classifies `input` and resolves it to the URL to fetch.
///
/// # Errors
///
/// See [`classify`] and [`Destination::into_url`].
pub fn resolve(input: &str, search_template: &str) -> Result<String> {
    classify(input)?.into_url(search_template)
}

/// Checks that a search template can produce URLs.
///
/// # Errors
///
/// Returns [`Error::Config`] if the placeholder is missing or the template
/// does not form a URL.
pub fn validate_template(search_template: &str) -> Result<()> {
    search_url(search_template, "test").map(|_| ())
}

/// Fills the search template with an encoded query.
fn search_url(search_template: &str, text: &str) -> Result<String> {
    if !search_template.contains(QUERY_PLACEHOLDER) {
        return Err(Error::config(format!(
            "search template must contain {QUERY_PLACEHOLDER}: {search_template}"
        )));
    }

    let filled = search_template.replace(QUERY_PLACEHOLDER, &urlencoding::encode(text));
    Ok(Url::parse(&filled)?.into())
}

// ============================================================================
// Tests
// ============================================================================

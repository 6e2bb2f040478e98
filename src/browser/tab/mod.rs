//! Browser tabs.
//!
//! Each [`Tab`] is an independent browsing context with its own history
//! and at most one in-flight fetch.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Tab struct, status, accessors, result application |
//! | `navigation` | Navigate, back/forward, reload, close |
//!
//! # Example
//!
//! ```ignore
//! let url = tab.navigate_to("example.com", &settings.search_template, &fetcher)?;
//! tab.go_back(&fetcher)?;
//! println!("{}", tab.status());
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod navigation;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::{BLANK_TITLE, Tab, TabStatus};

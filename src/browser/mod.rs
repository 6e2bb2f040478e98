//! Browser entities module.
//!
//! This module provides the session-side browser types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Ordered tab set, routing and result application |
//! | [`Tab`] | One browsing context with its own history |
//! | [`NavigationHistory`] | Back/forward stack of one tab |
//! | [`Renderer`] | Display hook for loaded pages |
//!
//! # Example
//!
//! ```no_run
//! use tab_session::{Result, Session};
//!
//! # async fn example() -> Result<()> {
//! let mut session = Session::builder().open_homepage(false).build()?;
//!
//! session.navigate("rust-lang.org")?;
//! let second = session.new_tab(Some("how do tabs work"));
//! session.select_tab(second)?;
//!
//! while session.next_update().await.is_some() {}
//!
//! for tab in session.tabs() {
//!     println!("{} {} [{}]", tab.id(), tab.title(), tab.status());
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Download bookkeeping.
pub mod download;

/// Per-tab back/forward history.
pub mod history;

/// Address bar input classification.
pub mod query;

/// Display hook.
pub mod render;

/// Tab set and delivery-queue draining.
pub mod session;

/// Browser tab.
pub mod tab;

// ============================================================================
// Re-exports
// ============================================================================

pub use download::{DownloadRecord, DownloadState};
pub use history::NavigationHistory;
pub use query::Destination;
pub use render::{NoopRenderer, Renderer};
pub use session::{Session, SessionUpdate};
pub use tab::{BLANK_TITLE, Tab, TabStatus};

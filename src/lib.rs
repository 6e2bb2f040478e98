//! Tab Session - multi-tab browsing session engine.
//!
//! This library owns the state of a tabbed browser: the set of tabs, each
//! tab's back/forward history, and the sequencing of concurrent page
//! fetches against that state. Rendering and UI are left to the caller.
//!
//! # Architecture
//!
//! The session follows a single-owner model:
//!
//! - **Owner**: holds the [`Session`] and is the only code that mutates it
//! - **Workers**: tokio tasks that fetch pages through a [`Transport`] and
//!   send results on one delivery queue
//!
//! Key design principles:
//!
//! - Every navigation bumps the tab's [`Generation`]; stale results are dropped
//! - Workers never touch session state, they only send immutable events
//! - Results are applied in delivery order when the owner drains the queue
//! - Back and forward always re-fetch
//!
//! # Quick Start
//!
//! ```no_run
//! use tab_session::{Result, Session, SessionUpdate};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut session = Session::builder().open_homepage(false).build()?;
//!
//!     // Bare hosts load directly, anything else is searched
//!     session.navigate("example.com")?;
//!     session.new_tab(Some("rust async tabs"));
//!
//!     while let Some(update) = session.next_update().await {
//!         match update {
//!             SessionUpdate::Loaded { tab_id, url } => println!("{tab_id} loaded {url}"),
//!             SessionUpdate::Failed { reason, .. } => eprintln!("{reason}"),
//!             _ => {}
//!         }
//!     }
//!
//!     session.shutdown()
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Browser entities: [`Session`], [`Tab`], [`NavigationHistory`] |
//! | [`config`] | [`Settings`] and [`SessionBuilder`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Delivery queue message types |
//! | [`store`] | History log, bookmarks and persistence |
//! | [`transport`] | Page retrieval and worker scheduling |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Session, Tab, NavigationHistory.
///
/// This module contains the core types for session state:
///
/// - [`Session`] - Ordered set of tabs with one active
/// - [`Tab`] - Browsing context with its own history
/// - [`NavigationHistory`] - Back/forward stack
pub mod browser;

/// Settings and session builder.
///
/// Use [`Session::builder()`] to create a configured session.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for session entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Delivery queue message types.
///
/// Events sent by fetch workers and the jobs that produce them.
pub mod protocol;

/// Session-wide stores.
///
/// Global visit log, bookmarks and their persistence.
pub mod store;

/// Page retrieval.
///
/// The [`Transport`] trait, its HTTP implementation and the worker pool.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{
    DownloadRecord, DownloadState, NavigationHistory, NoopRenderer, Renderer, Session,
    SessionUpdate, Tab, TabStatus,
};

// Config types
pub use config::{SessionBuilder, Settings, Theme};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{DownloadId, Generation, TabId};

// Store types
pub use store::{
    Bookmark, BookmarkStore, HistoryEntry, HistoryLog, JsonFileStore, MemoryStore, Persistence,
};

// Transport types
pub use transport::{HttpTransport, Transport};

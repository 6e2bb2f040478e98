//! Content retrieval and the fetch worker pool.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `coordinator` | Spawns fetch workers and owns the delivery queue sender |
//! | `http` | [`Transport`] over HTTP(S) |
//!
//! # Architecture
//!
//! ```text
//! Session ──start_fetch──▶ FetchCoordinator ──spawn──▶ worker task
//!    ▲                                                   │
//!    │                                          Transport::fetch
//!    └──────────── delivery queue (Event) ◀──────────────┘
//! ```

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::FetchResponse;

// ============================================================================
// Submodules
// ============================================================================

/// Fetch worker pool and delivery queue.
pub mod coordinator;

/// HTTP transport.
pub mod http;

// ============================================================================
// Re-exports
// ============================================================================

pub use coordinator::FetchCoordinator;
pub use http::HttpTransport;

// ============================================================================
// Transport
// ============================================================================

/// Retrieval mechanism used by fetch workers.
///
/// Implementations run on worker tasks and must not block the runtime.
/// Any error returned is shown in the requesting tab's status; it never
/// reaches the session as an `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Retrieves `url`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

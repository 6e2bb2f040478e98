//! Messages exchanged between the session and its fetch workers.
//!
//! # Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `FetchJob` | Session (kept) | Handle of an in-flight fetch |
//! | `FetchResponse` | Transport → Worker | Raw retrieval result |
//! | `Event` | Worker → Session | Finished unit of work |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Delivery queue events and outcomes |
//! | `request` | Fetch job and transport response types |

// ============================================================================
// Submodules
// ============================================================================

/// Delivery queue event types.
pub mod event;

/// Fetch job and response types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{DownloadEvent, DownloadOutcome, Event, FetchEvent, FetchOutcome, extract_title};
pub use request::{CancelFlag, FetchJob, FetchResponse};

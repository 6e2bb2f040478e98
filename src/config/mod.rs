//! Session configuration.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Settings`] | User-facing options, persisted between runs |
//! | [`Theme`] | Light or dark colour scheme |
//! | [`SessionBuilder`] | Assembles a [`Session`](crate::Session) |

// ============================================================================
// Submodules
// ============================================================================

/// Session builder.
pub mod builder;

/// Settings and theme.
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use settings::{DEFAULT_HOMEPAGE, DEFAULT_SEARCH_TEMPLATE, Settings, Theme};

//! Granary Core - Shared facilities for the granary persistence crates
//!
//! Provides:
//! - Canonical error taxonomy with stable error codes
//! - Logging initialization profiles

pub mod errors;
pub mod logging;

// Re-export key types
pub use errors::{GranaryError, Result};

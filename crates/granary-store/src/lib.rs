//! Granary Store - SQLite-backed persistence context
//!
//! Provides:
//! - Typed and generic configuration for the backing store
//! - Model builder through which callers register table mappings
//! - Base context behavior owning the connection and applying models
//! - `StoreContext`, the per-unit-of-work handle composing the base

pub mod base;
pub mod config;
pub mod context;
pub mod db;
pub mod model;

// Re-export key types
pub use config::{ContextOptions, GenericOptions, JournalMode, Location, SettingValue, StoreOptions};
pub use context::StoreContext;
pub use granary_core::Result;
pub use model::{ModelBuilder, TableModel};

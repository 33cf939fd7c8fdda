//! Store configuration
//!
//! Two construction paths feed a context:
//! - `StoreOptions` is the strongly-typed configuration used by application
//!   code that knows this store.
//! - `GenericOptions` is a loosely-typed settings document (TOML or JSON)
//!   that design-time tooling and generic factories can produce without
//!   naming the typed struct. It resolves into `StoreOptions` after
//!   validation.
//!
//! `ContextOptions` is the sum over both paths.

use granary_core::errors::{GranaryError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the backing database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// On-disk database file
    Path(PathBuf),
    /// Private in-memory database (for testing and tooling)
    InMemory,
}

/// SQLite journal mode applied at connection time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Write-ahead log, the default for on-disk databases
    Wal,
    /// Rollback journal kept in memory; the only mode in-memory databases support
    Memory,
    /// Classic delete-on-commit rollback journal
    Delete,
}

impl JournalMode {
    /// The value handed to `PRAGMA journal_mode`
    pub fn as_pragma_value(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
            JournalMode::Delete => "DELETE",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "wal" => Ok(JournalMode::Wal),
            "memory" => Ok(JournalMode::Memory),
            "delete" => Ok(JournalMode::Delete),
            other => Err(GranaryError::invalid_config(format!(
                "Unknown journal_mode '{}' (expected wal, memory, or delete)",
                other
            ))),
        }
    }
}

/// Strongly-typed store configuration
///
/// Read-only once handed to a context; the context never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    location: Location,
    foreign_keys: bool,
    journal_mode: JournalMode,
    busy_timeout: Duration,
}

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl StoreOptions {
    /// Options for an on-disk database at `path`
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            location: Location::Path(path.as_ref().to_path_buf()),
            foreign_keys: true,
            journal_mode: JournalMode::Wal,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Options for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            location: Location::InMemory,
            foreign_keys: true,
            // WAL is not available for in-memory databases
            journal_mode: JournalMode::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Enable or disable foreign-key enforcement (on by default)
    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Override the journal mode
    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Override the busy timeout (5s by default)
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn foreign_keys(&self) -> bool {
        self.foreign_keys
    }

    pub fn journal_mode(&self) -> JournalMode {
        // In-memory databases only support the MEMORY journal
        match self.location {
            Location::InMemory => JournalMode::Memory,
            Location::Path(_) => self.journal_mode,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

/// A single loosely-typed setting value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Integer(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

/// Loosely-typed settings document for generic tooling
///
/// Recognized keys:
/// - `path` (string) or `in_memory` (bool) — exactly one location source
/// - `foreign_keys` (bool)
/// - `journal_mode` (string: `wal`, `memory`, `delete`)
/// - `busy_timeout_ms` (integer)
///
/// Unknown keys and mistyped values are rejected at resolve time, not at
/// parse time, so tooling can round-trip documents it does not understand.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct GenericOptions {
    entries: BTreeMap<String, SettingValue>,
}

impl GenericOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML settings document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GranaryError::Serialization {
            message: format!("Invalid TOML options: {}", e),
        })
    }

    /// Parse a JSON settings document
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| GranaryError::Serialization {
            message: format!("Invalid JSON options: {}", e),
        })
    }

    /// Set a single entry, replacing any previous value for the key
    pub fn set(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// Validate the document and convert it to typed options
    pub fn resolve(&self) -> Result<StoreOptions> {
        for key in self.entries.keys() {
            match key.as_str() {
                "path" | "in_memory" | "foreign_keys" | "journal_mode" | "busy_timeout_ms" => {}
                other => {
                    return Err(GranaryError::invalid_config(format!(
                        "Unknown option key '{}'",
                        other
                    )))
                }
            }
        }

        let path = match self.entries.get("path") {
            None => None,
            Some(SettingValue::Text(s)) => Some(PathBuf::from(s)),
            Some(other) => {
                return Err(GranaryError::invalid_config(format!(
                    "Option 'path' must be a string, got {:?}",
                    other
                )))
            }
        };
        let in_memory = self.bool_entry("in_memory")?.unwrap_or(false);

        let mut options = match (path, in_memory) {
            (Some(_), true) => {
                return Err(GranaryError::invalid_config(
                    "Options 'path' and 'in_memory' are mutually exclusive",
                ))
            }
            (Some(p), false) => StoreOptions::at(p),
            (None, true) => StoreOptions::in_memory(),
            (None, false) => {
                return Err(GranaryError::invalid_config(
                    "One of 'path' or 'in_memory' is required",
                ))
            }
        };

        if let Some(enabled) = self.bool_entry("foreign_keys")? {
            options = options.with_foreign_keys(enabled);
        }
        if let Some(SettingValue::Text(mode)) = self.entries.get("journal_mode") {
            options = options.with_journal_mode(JournalMode::parse(mode)?);
        } else if let Some(other) = self.entries.get("journal_mode") {
            return Err(GranaryError::invalid_config(format!(
                "Option 'journal_mode' must be a string, got {:?}",
                other
            )));
        }
        match self.entries.get("busy_timeout_ms") {
            None => {}
            Some(SettingValue::Integer(ms)) if *ms >= 0 => {
                options = options.with_busy_timeout(Duration::from_millis(*ms as u64));
            }
            Some(other) => {
                return Err(GranaryError::invalid_config(format!(
                    "Option 'busy_timeout_ms' must be a non-negative integer, got {:?}",
                    other
                )))
            }
        }

        Ok(options)
    }

    fn bool_entry(&self, key: &str) -> Result<Option<bool>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(SettingValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(GranaryError::invalid_config(format!(
                "Option '{}' must be a boolean, got {:?}",
                key, other
            ))),
        }
    }
}

/// Sum over the two construction paths
#[derive(Debug, Clone, PartialEq)]
pub enum ContextOptions {
    Typed(StoreOptions),
    Generic(GenericOptions),
}

impl ContextOptions {
    /// Resolve either path to typed options
    pub fn into_store_options(self) -> Result<StoreOptions> {
        match self {
            ContextOptions::Typed(options) => Ok(options),
            ContextOptions::Generic(generic) => generic.resolve(),
        }
    }
}

impl From<StoreOptions> for ContextOptions {
    fn from(options: StoreOptions) -> Self {
        ContextOptions::Typed(options)
    }
}

impl From<GenericOptions> for ContextOptions {
    fn from(options: GenericOptions) -> Self {
        ContextOptions::Generic(options)
    }
}

//! Error handling for granary
//!
//! A single structured error type shared by the configuration, model, and
//! context layers. Each variant maps to a stable error code usable for
//! programmatic handling, testing, and external reporting.

use thiserror::Error;

/// Result type alias using GranaryError
pub type Result<T> = std::result::Result<T, GranaryError>;

/// Error taxonomy for granary operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GranaryError {
    // ===== Configuration Errors =====
    /// Configuration value is malformed or fails validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Model Errors =====
    /// A table model with this name is already registered, or an applied
    /// model's DDL no longer matches its recorded checksum
    #[error("Model conflict for table '{table}': {reason}")]
    ModelConflict { table: String, reason: String },

    /// A table model expected by the caller was never registered
    #[error("No model registered for table '{table}'")]
    MissingModel { table: String },

    // ===== Integration/IO Errors =====
    /// Underlying database operation failed
    #[error("Persistence error in operation '{op}': {message}")]
    Persistence { op: String, message: String },

    /// Serialization error (JSON/TOML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Filesystem operation failed
    #[error("IO error in operation '{op}': {message}")]
    Io { op: String, message: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GranaryError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            GranaryError::InvalidConfig { .. } => "ERR_INVALID_CONFIG",
            GranaryError::ModelConflict { .. } => "ERR_MODEL_CONFLICT",
            GranaryError::MissingModel { .. } => "ERR_MISSING_MODEL",
            GranaryError::Persistence { .. } => "ERR_PERSISTENCE",
            GranaryError::Serialization { .. } => "ERR_SERIALIZATION",
            GranaryError::Io { .. } => "ERR_IO",
            GranaryError::Internal { .. } => "ERR_INTERNAL",
        }
    }

    /// Create a persistence error with operation context
    pub fn persistence(op: impl Into<String>, message: impl Into<String>) -> Self {
        GranaryError::Persistence {
            op: op.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        GranaryError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a model conflict error
    pub fn model_conflict(table: impl Into<String>, reason: impl Into<String>) -> Self {
        GranaryError::ModelConflict {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

//! Model builder
//!
//! The collaborator handed to a context at initialization time. Callers
//! register table mappings (name + DDL) on it; the base context behavior
//! later applies whatever was registered. Each registered model carries a
//! SHA-256 checksum of its DDL so re-application against a drifted schema
//! definition can be detected.

use granary_core::errors::{GranaryError, Result};
use sha2::{Digest, Sha256};

/// One entity-to-storage mapping: a table and the DDL that creates it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    name: String,
    ddl: String,
    checksum: String,
}

impl TableModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ddl(&self) -> &str {
        &self.ddl
    }

    /// SHA-256 of the DDL, hex encoded
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// Compute the SHA-256 checksum of a DDL string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Collects table models in registration order
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    models: Vec<TableModel>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table mapping
    ///
    /// Registration order is preserved; models are applied in the order they
    /// were registered. Registering the same table name twice is a conflict.
    pub fn register(&mut self, name: impl Into<String>, ddl: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        let ddl = ddl.into();
        if name.trim().is_empty() {
            return Err(GranaryError::invalid_config(
                "Table model name cannot be empty",
            ));
        }
        if self.models.iter().any(|m| m.name == name) {
            return Err(GranaryError::model_conflict(
                name,
                "table is already registered",
            ));
        }
        let checksum = compute_checksum(&ddl);
        self.models.push(TableModel {
            name,
            ddl,
            checksum,
        });
        Ok(self)
    }

    /// Registered models, in registration order
    pub fn models(&self) -> &[TableModel] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("CREATE TABLE t (id INTEGER)");
        assert_eq!(checksum.len(), 64); // SHA256 is 64 hex chars
    }

    #[test]
    fn test_checksum_deterministic() {
        let a = compute_checksum("CREATE TABLE t (id INTEGER)");
        let b = compute_checksum("CREATE TABLE t (id INTEGER)");
        assert_eq!(a, b);
    }

    #[test]
    fn test_register_preserves_order() {
        let mut builder = ModelBuilder::new();
        builder
            .register("alpha", "CREATE TABLE alpha (id INTEGER PRIMARY KEY)")
            .unwrap()
            .register("beta", "CREATE TABLE beta (id INTEGER PRIMARY KEY)")
            .unwrap();
        let names: Vec<&str> = builder.models().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["alpha", "beta"]);
    }

    #[test]
    fn test_register_duplicate_is_conflict() {
        let mut builder = ModelBuilder::new();
        builder.register("alpha", "CREATE TABLE alpha (id INTEGER)").unwrap();
        let err = builder
            .register("alpha", "CREATE TABLE alpha (id TEXT)")
            .unwrap_err();
        assert_eq!(err.code(), "ERR_MODEL_CONFLICT");
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_register_empty_name_rejected() {
        let mut builder = ModelBuilder::new();
        let err = builder.register("  ", "CREATE TABLE x (id INTEGER)").unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_CONFIG");
        assert!(builder.is_empty());
    }
}

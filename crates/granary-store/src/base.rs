//! Base context behavior
//!
//! `BaseContext` is the framework half of the context: it owns the
//! connection, applies connection pragmas at open time, and carries the
//! model-building behavior that applies registered table models
//! idempotently, recording each application in a `model_registry`
//! bookkeeping table.

use crate::config::StoreOptions;
use crate::db;
use crate::model::{ModelBuilder, TableModel};
use granary_core::errors::{GranaryError, Result};
use rusqlite::{Connection, OptionalExtension};

/// Framework-side context behavior: connection ownership plus model application
#[derive(Debug)]
pub struct BaseContext {
    conn: Connection,
    options: StoreOptions,
}

impl BaseContext {
    /// Open and configure a connection per the options
    pub fn open(options: StoreOptions) -> Result<Self> {
        let conn = db::open_from_options(&options)?;
        db::configure(&conn, &options)?;
        tracing::debug!(location = ?options.location(), "base context opened");
        Ok(Self { conn, options })
    }

    /// Apply every registered table model, exactly once each
    ///
    /// Idempotent: a model whose checksum matches its recorded application is
    /// skipped. A model whose DDL has drifted from what was applied is a
    /// conflict, never a silent re-run.
    pub fn on_model_building(&mut self, builder: &ModelBuilder) -> Result<()> {
        self.ensure_model_registry()?;

        for model in builder.models() {
            self.apply_model(model)?;
        }

        tracing::debug!(models = builder.len(), "model building complete");
        Ok(())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Close the connection, surfacing any close-time failure
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| GranaryError::persistence("close", err.to_string()))
    }

    /// Create the model_registry bookkeeping table if it doesn't exist
    fn ensure_model_registry(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS model_registry (
                    id INTEGER PRIMARY KEY,
                    table_name TEXT NOT NULL UNIQUE,
                    checksum TEXT NOT NULL,
                    applied_at INTEGER NOT NULL
                )",
                [],
            )
            .map_err(db::from_rusqlite("ensure_model_registry"))?;

        Ok(())
    }

    /// Apply a single table model if not already applied
    fn apply_model(&mut self, model: &TableModel) -> Result<()> {
        let recorded: Option<String> = self
            .conn
            .query_row(
                "SELECT checksum FROM model_registry WHERE table_name = ?1",
                [model.name()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db::from_rusqlite("apply_model"))?;

        if let Some(recorded) = recorded {
            if recorded == model.checksum() {
                // Idempotent: already applied
                return Ok(());
            }
            return Err(GranaryError::model_conflict(
                model.name(),
                format!(
                    "applied checksum {} does not match registered DDL checksum {}",
                    recorded,
                    model.checksum()
                ),
            ));
        }

        let tx = self
            .conn
            .transaction()
            .map_err(db::from_rusqlite("apply_model"))?;

        tx.execute_batch(model.ddl()).map_err(|e| {
            GranaryError::model_conflict(model.name(), format!("DDL failed: {}", e))
        })?;

        let now = chrono::Utc::now().timestamp();
        tx.execute(
            "INSERT INTO model_registry (table_name, checksum, applied_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![model.name(), model.checksum(), now],
        )
        .map_err(db::from_rusqlite("apply_model"))?;

        tx.commit().map_err(db::from_rusqlite("apply_model"))?;

        tracing::debug!(table = model.name(), "table model applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with_notes() -> ModelBuilder {
        let mut builder = ModelBuilder::new();
        builder
            .register(
                "notes",
                "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL)",
            )
            .unwrap();
        builder
    }

    #[test]
    fn test_open_in_memory() {
        let base = BaseContext::open(StoreOptions::in_memory());
        assert!(base.is_ok());
    }

    #[test]
    fn test_model_building_applies_registered_tables() {
        let mut base = BaseContext::open(StoreOptions::in_memory()).unwrap();
        base.on_model_building(&builder_with_notes()).unwrap();

        let count: i64 = base
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='notes'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_model_building_idempotent() {
        let mut base = BaseContext::open(StoreOptions::in_memory()).unwrap();
        let builder = builder_with_notes();
        base.on_model_building(&builder).unwrap();
        base.on_model_building(&builder).unwrap();

        let rows: i64 = base
            .connection()
            .query_row("SELECT COUNT(*) FROM model_registry", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_drifted_ddl_is_conflict() {
        let mut base = BaseContext::open(StoreOptions::in_memory()).unwrap();
        base.on_model_building(&builder_with_notes()).unwrap();

        let mut drifted = ModelBuilder::new();
        drifted
            .register(
                "notes",
                "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT, extra TEXT)",
            )
            .unwrap();
        let err = base.on_model_building(&drifted).unwrap_err();
        assert_eq!(err.code(), "ERR_MODEL_CONFLICT");
    }

    #[test]
    fn test_close_succeeds() {
        let base = BaseContext::open(StoreOptions::in_memory()).unwrap();
        assert!(base.close().is_ok());
    }
}

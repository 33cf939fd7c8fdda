//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::config::{Location, StoreOptions};
use granary_core::errors::{GranaryError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite("open"))
}

/// Open a private in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite("open_in_memory"))
}

/// Open the database the options describe
pub fn open_from_options(options: &StoreOptions) -> Result<Connection> {
    match options.location() {
        Location::Path(path) => open(path),
        Location::InMemory => open_in_memory(),
    }
}

/// Configure a connection with the pragmas the options carry
pub fn configure(conn: &Connection, options: &StoreOptions) -> Result<()> {
    conn.pragma_update(
        None,
        "busy_timeout",
        options.busy_timeout().as_millis() as i64,
    )
    .map_err(from_rusqlite("configure"))?;

    conn.pragma_update(
        None,
        "foreign_keys",
        if options.foreign_keys() { "ON" } else { "OFF" },
    )
    .map_err(from_rusqlite("configure"))?;

    // journal_mode returns the resulting mode as a row
    let mode: String = conn
        .query_row(
            &format!(
                "PRAGMA journal_mode = {}",
                options.journal_mode().as_pragma_value()
            ),
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite("configure"))?;
    tracing::debug!(journal_mode = %mode, "connection configured");

    Ok(())
}

/// Map a rusqlite error into the persistence taxonomy
pub fn from_rusqlite(op: &'static str) -> impl Fn(rusqlite::Error) -> GranaryError {
    move |err| GranaryError::persistence(op, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalMode;

    #[test]
    fn test_configure_in_memory() {
        let options = StoreOptions::in_memory();
        let conn = open_from_options(&options).unwrap();
        configure(&conn, &options).unwrap();

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_configure_respects_disabled_foreign_keys() {
        let options = StoreOptions::in_memory().with_foreign_keys(false);
        let conn = open_from_options(&options).unwrap();
        configure(&conn, &options).unwrap();

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 0);
    }

    #[test]
    fn test_in_memory_journal_mode_is_memory() {
        let options = StoreOptions::in_memory().with_journal_mode(JournalMode::Wal);
        let conn = open_from_options(&options).unwrap();
        configure(&conn, &options).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "memory");
    }
}

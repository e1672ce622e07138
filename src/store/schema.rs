//! Table definition and versioned migrations
//!
//! The schema version lives in `PRAGMA user_version`. Each migration runs at
//! most once; opening a database at a newer version is left untouched.

use rusqlite::Connection;

use super::errors::{StoreError, StoreResult};

/// Latest schema version this build knows how to create
pub const SCHEMA_VERSION: i64 = 1;

/// Bring the database up to [`SCHEMA_VERSION`], returning the resulting version
pub fn migrate(conn: &Connection) -> StoreResult<i64> {
    let mut version: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(StoreError::Migration)?;

    if version < 1 {
        apply_migration_1(conn).map_err(StoreError::Migration)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)
            .map_err(StoreError::Migration)?;
    }

    Ok(version)
}

fn apply_migration_1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS modifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            deadline TEXT NOT NULL,
            link_status TEXT NOT NULL DEFAULT 'unlinked',
            issue_number TEXT NOT NULL DEFAULT '',
            details TEXT
        );
        ",
    )
}

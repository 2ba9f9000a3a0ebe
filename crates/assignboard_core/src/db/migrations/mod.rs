//! Snapshot schema installation.
//!
//! The schema ships as one script. A fresh file (`user_version = 0`) gets the
//! whole script inside one transaction; an up-to-date file is left alone.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("0001_init.sql");

/// Brings `conn` to [`SCHEMA_VERSION`].
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
/// - `Migration` when the schema script fails.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Equal => Ok(()),
        Ordering::Less => install_schema(conn),
    }
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn install_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)
        .map_err(|source| DbError::Migration {
            version: SCHEMA_VERSION,
            source,
        })?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

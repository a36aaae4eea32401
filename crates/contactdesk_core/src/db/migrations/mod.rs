//! Embedded `contacts` schema migrations.
//!
//! # Invariants
//! - Versions in `MIGRATIONS` are strictly increasing, starting at 1.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Pending migrations run in one transaction; a failing script leaves the
//!   previous schema version in place.

use crate::db::DbError;
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_contacts.sql"),
}];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    latest_of(MIGRATIONS)
}

/// Reads the schema version recorded on `conn`.
pub fn current_user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> Result<(), DbError> {
    apply_registered(conn, MIGRATIONS)
}

fn latest_of(registry: &[Migration]) -> u32 {
    registry.last().map_or(0, |migration| migration.version)
}

fn apply_registered(conn: &mut Connection, registry: &[Migration]) -> Result<(), DbError> {
    let current = current_user_version(conn)?;
    let latest = latest_of(registry);

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending = registry
        .iter()
        .filter(|migration| migration.version > current)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok from={current} to={}",
            migration.version
        );
    }
    tx.commit()?;

    Ok(())
}

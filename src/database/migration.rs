use rusqlite::Connection;

use crate::database::queries;
use crate::error::AppResult;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL for schema version tracking table
const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)
"#;

/// Check if a table exists
fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Get current schema version from database
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;

    Ok(version.unwrap_or(0))
}

/// Record a migration as applied
fn record_migration(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> AppResult<()> {
    conn.execute_batch(CREATE_SCHEMA_VERSION_TABLE)?;

    let current_version = get_schema_version(conn)?;

    // Migration 1: repair cover state, then enforce one cover per album
    if current_version < 1 {
        let tx = conn.transaction()?;
        migrate_v1(&tx)?;
        record_migration(&tx, 1)?;
        tx.commit()?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: databases written before the cover index may carry several
/// cover rows per album, linked albums without a cover, and stale image urls.
fn migrate_v1(conn: &Connection) -> AppResult<()> {
    let demoted = conn.execute(queries::covers::DEMOTE_EXTRA_COVERS, [])?;
    let promoted = conn.execute(queries::covers::PROMOTE_MISSING_COVERS, [])?;
    conn.execute(queries::covers::RESYNC_IMAGE_URLS, [])?;
    conn.execute_batch(queries::covers::CREATE_UNIQUE_COVER_INDEX)?;

    if demoted > 0 || promoted > 0 {
        tracing::info!(
            "Cover repair: demoted {} duplicate covers, promoted {} missing covers",
            demoted,
            promoted
        );
    }

    Ok(())
}

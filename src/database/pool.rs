use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

pub fn create_pool(path: &Path, config: &DatabaseConfig) -> AppResult<DbPool> {
    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        conn.busy_timeout(busy_timeout)?;
        Ok(())
    });

    Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .map_err(|e| AppError::Internal(format!("Failed to create database pool: {}", e)))
}

pub fn get_connection(pool: &DbPool) -> AppResult<DbConn> {
    pool.get().map_err(AppError::Pool)
}

/// Runs `f` inside a `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken before the first statement, so read-then-write
/// sequences in `f` cannot interleave with another writer. Any error rolls
/// the whole transaction back.
pub fn with_transaction<T, F>(pool: &DbPool, f: F) -> AppResult<T>
where
    F: FnOnce(&Transaction<'_>) -> AppResult<T>,
{
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

pub fn fetch_one<T, F>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
    mapper: F,
) -> AppResult<Option<T>>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;

    match rows.next()? {
        Some(row) => Ok(Some(mapper(row)?)),
        None => Ok(None),
    }
}

pub fn fetch_all<T, F>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
    mapper: F,
) -> AppResult<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, mapper)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn execute_query(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> AppResult<usize> {
    conn.execute(sql, params).map_err(AppError::Database)
}

pub fn insert_returning_id(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> AppResult<i64> {
    conn.execute(sql, params)?;
    Ok(conn.last_insert_rowid())
}

/// Ids bound per `IN ({})` statement. SQLite caps a statement at 32766
/// variables, so longer lists are split across several statements.
pub const IN_CLAUSE_CHUNK: usize = 500;

/// Parameters for an `IN ({})` query: `leading` first, then one chunk of ids.
pub fn in_clause_params<'a>(leading: &'a i64, ids: &'a [i64]) -> Vec<&'a dyn rusqlite::ToSql> {
    let mut params: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(ids.len() + 1);
    params.push(leading);
    params.extend(ids.iter().map(|id| id as &dyn rusqlite::ToSql));
    params
}

/// Expands the `{}` marker of an `IN ({})` query into `count` placeholders.
pub fn expand_in_clause(sql: &str, count: usize) -> String {
    let placeholders = vec!["?"; count].join(",");
    sql.replace("{}", &placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_db;

    #[test]
    fn test_expand_in_clause() {
        assert_eq!(
            expand_in_clause("SELECT id FROM t WHERE id IN ({})", 3),
            "SELECT id FROM t WHERE id IN (?,?,?)"
        );
    }

    #[test]
    fn test_in_clause_params_leads_with_scope() {
        let owner = 7;
        let ids = [1, 2, 3];

        assert_eq!(in_clause_params(&owner, &ids).len(), 4);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let pool = create_test_db();

        let result: AppResult<()> = with_transaction(&pool, |tx| {
            execute_query(
                tx,
                "INSERT INTO hashtags (name) VALUES (?)",
                &[&"rolled-back"],
            )?;
            Err(AppError::Conflict("abort".to_string()))
        });
        assert!(result.is_err());

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM hashtags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let pool = create_test_db();

        let id = with_transaction(&pool, |tx| {
            insert_returning_id(tx, "INSERT INTO hashtags (name) VALUES (?)", &[&"kept"])
        })
        .unwrap();

        let conn = pool.get().unwrap();
        let name = fetch_one(&conn, "SELECT name FROM hashtags WHERE id = ?", &[&id], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(name.as_deref(), Some("kept"));
    }
}

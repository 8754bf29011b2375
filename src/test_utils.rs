#![cfg(test)]

use crate::app::create_app;
use crate::auth::jwt::Claims;
use crate::config::{Config, DatabaseConfig};
use crate::database::{create_pool, fetch_all, fetch_one, init_database, run_migrations, DbPool};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(1);

fn prepare_schema(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get connection from pool");
    init_database(&conn).expect("Failed to initialize test database schema");
    run_migrations(&mut conn).expect("Failed to migrate test database");
}

/// Create a shared in-memory SQLite database pool with full schema applied.
/// Every pooled connection sees the same database.
pub fn create_test_db() -> DbPool {
    let uri = format!(
        "file:gallery_test_{}?mode=memory&cache=shared",
        DB_COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let manager = SqliteConnectionManager::file(uri).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .expect("Failed to create test database pool");

    prepare_schema(&pool);
    pool
}

/// File-backed database for tests that need real cross-connection locking.
pub fn create_file_test_db() -> (DbPool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(&dir.path().join("gallery.sqlite"), &DatabaseConfig::default())
        .expect("Failed to create file-backed pool");

    prepare_schema(&pool);
    (pool, dir)
}

/// Create a test app with an in-memory database
pub fn create_test_app() -> (Router, DbPool, Arc<Config>) {
    let pool = create_test_db();
    let config = Arc::new(Config::default());
    let app = create_app(Arc::clone(&config), pool.clone());
    (app, pool, config)
}

/// Bearer token as the external auth service would issue it.
pub fn create_test_token(config: &Config, user_id: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::minutes(30)).timestamp(),
        token_type: "access".to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.security.secret_key.as_bytes()),
    )
    .expect("Failed to encode test token")
}

pub fn create_test_user(pool: &DbPool, email: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)",
        rusqlite::params![email, "hashed_password_placeholder", email],
    )
    .expect("Failed to insert test user");
    conn.last_insert_rowid()
}

pub fn create_test_photo(pool: &DbPool, user_id: i64, url: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO photos (user_id, url, name) VALUES (?, ?, ?)",
        rusqlite::params![user_id, url, url],
    )
    .expect("Failed to insert test photo");
    conn.last_insert_rowid()
}

pub fn create_test_album(pool: &DbPool, user_id: i64, name: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO albums (user_id, name) VALUES (?, ?)",
        rusqlite::params![user_id, name],
    )
    .expect("Failed to insert test album");
    conn.last_insert_rowid()
}

pub fn create_test_favourite(pool: &DbPool, user_id: i64, photo_id: i64) {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT INTO favourites (user_id, photo_id) VALUES (?, ?)",
        rusqlite::params![user_id, photo_id],
    )
    .expect("Failed to insert test favourite");
}

pub fn linked_photo_ids(pool: &DbPool, album_id: i64) -> Vec<i64> {
    let conn = pool.get().expect("Failed to get connection");
    fetch_all(
        &conn,
        "SELECT photo_id FROM album_photos WHERE album_id = ? ORDER BY photo_id",
        &[&album_id],
        |row| row.get(0),
    )
    .expect("Failed to query links")
}

pub fn cover_photo_ids(pool: &DbPool, album_id: i64) -> Vec<i64> {
    let conn = pool.get().expect("Failed to get connection");
    fetch_all(
        &conn,
        "SELECT photo_id FROM album_photos WHERE album_id = ? AND is_cover = 1",
        &[&album_id],
        |row| row.get(0),
    )
    .expect("Failed to query covers")
}

pub fn album_image_url(pool: &DbPool, album_id: i64) -> String {
    let conn = pool.get().expect("Failed to get connection");
    fetch_one(
        &conn,
        "SELECT image_url FROM albums WHERE id = ?",
        &[&album_id],
        |row| row.get(0),
    )
    .expect("Failed to query album")
    .expect("Album should exist")
}

pub fn count_rows_referencing_photo(pool: &DbPool, table: &str, photo_id: i64) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE photo_id = ?", table),
        [photo_id],
        |row| row.get(0),
    )
    .expect("Failed to count rows")
}

/// At most one cover row, and the album url mirrors it (empty without one).
pub fn assert_cover_invariant(pool: &DbPool, album_id: i64) {
    let covers = cover_photo_ids(pool, album_id);
    assert!(covers.len() <= 1, "album {} has covers {:?}", album_id, covers);

    let expected_url = match covers.first() {
        Some(photo_id) => {
            let conn = pool.get().expect("Failed to get connection");
            conn.query_row("SELECT url FROM photos WHERE id = ?", [photo_id], |row| {
                row.get::<_, String>(0)
            })
            .expect("Cover photo should exist")
        }
        None => String::new(),
    };
    assert_eq!(album_image_url(pool, album_id), expected_url);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_db() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='album_photos'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_pooled_connections_share_one_database() {
        let pool = create_test_db();
        let first = pool.get().unwrap();
        let second = pool.get().unwrap();

        first
            .execute("INSERT INTO hashtags (name) VALUES ('shared')", [])
            .unwrap();
        let count: i64 = second
            .query_row("SELECT COUNT(*) FROM hashtags", [], |row| row.get(0))
            .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_fixtures_link_to_owner() {
        let pool = create_test_db();
        let user_id = create_test_user(&pool, "fixture@example.com");
        let photo_id = create_test_photo(&pool, user_id, "https://img/f.jpg");
        let album_id = create_test_album(&pool, user_id, "Fixture");

        assert!(photo_id > 0);
        assert_eq!(album_image_url(&pool, album_id), "");
        assert_cover_invariant(&pool, album_id);
    }
}

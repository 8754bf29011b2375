use std::collections::HashSet;

use rusqlite::Connection;
use tracing::debug;

use crate::database::{execute_query, fetch_all, fetch_one, get_connection, queries, with_transaction, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::Hashtag;
use crate::services::photos::load_owned_photo;

/// Trims and lower-cases a tag; `None` when nothing is left.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes a batch, keeping first-seen order and dropping duplicates.
/// A single blank tag rejects the whole batch.
pub fn normalize_tags(tags: &[String]) -> AppResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tags.len());

    for tag in tags {
        let name = normalize_tag(tag)
            .ok_or_else(|| AppError::InvalidArgument("Tags must not be blank".to_string()))?;
        if seen.insert(name.clone()) {
            normalized.push(name);
        }
    }

    Ok(normalized)
}

#[derive(Clone)]
pub struct HashtagResolver {
    pool: DbPool,
}

impl HashtagResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolves or creates each tag and links it to the photo. Re-tagging is a
    /// no-op. Returns the hashtags in the order they were first given.
    pub fn add_tags(&self, owner_id: i64, photo_id: i64, tags: &[String]) -> AppResult<Vec<Hashtag>> {
        if tags.is_empty() {
            return Err(AppError::InvalidArgument("At least one tag is required".to_string()));
        }
        let names = normalize_tags(tags)?;

        with_transaction(&self.pool, |tx| {
            load_owned_photo(tx, owner_id, photo_id)?;

            let mut hashtags = Vec::with_capacity(names.len());
            for name in names {
                let id = resolve_or_create(tx, &name)?;
                let linked = execute_query(tx, queries::hashtags::LINK_PHOTO, &[&photo_id, &id])?;
                if linked == 0 {
                    debug!("Photo {} already tagged with '{}'", photo_id, name);
                }
                hashtags.push(Hashtag { id, name });
            }

            Ok(hashtags)
        })
    }

    pub fn photo_tags(&self, owner_id: i64, photo_id: i64) -> AppResult<Vec<Hashtag>> {
        let conn = get_connection(&self.pool)?;
        load_owned_photo(&conn, owner_id, photo_id)?;

        fetch_all(
            &conn,
            queries::hashtags::SELECT_FOR_PHOTO,
            &[&photo_id],
            |row| {
                Ok(Hashtag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
    }
}

/// A concurrent creator's row wins the unique name; we re-read whichever
/// row exists after the ignored insert.
fn resolve_or_create(conn: &Connection, name: &str) -> AppResult<i64> {
    execute_query(conn, queries::hashtags::INSERT_IF_MISSING, &[&name])?;

    fetch_one(conn, queries::hashtags::SELECT_ID_BY_NAME, &[&name], |row| {
        row.get(0)
    })?
    .ok_or_else(|| AppError::Internal(format!("Hashtag '{}' vanished after insert", name)))
}

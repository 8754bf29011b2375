//! Album ↔ photo links and the cover-image policy.
//!
//! An album's cover is the single `album_photos` row with `is_cover = 1`, and
//! `albums.image_url` mirrors that photo's url (empty string without a cover).
//! Nothing outside this module writes either of them.

use std::collections::BTreeSet;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::database::{
    execute_query, expand_in_clause, fetch_all, fetch_one, get_connection, in_clause_params,
    queries, with_transaction, DbPool, IN_CLAUSE_CHUNK,
};
use crate::error::{AppError, AppResult};
use crate::models::{AlbumLinkResult, AlbumPhotoEntry};

#[derive(Clone)]
pub struct AlbumPhotoLinkManager {
    pool: DbPool,
}

impl AlbumPhotoLinkManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Links every photo into every album in one transaction.
    ///
    /// Albums without a cover get the first element of `photo_ids` as their
    /// cover. Albums that already have one keep it, whatever `want_cover` says.
    pub fn add_photos(
        &self,
        owner_id: i64,
        album_ids: &[i64],
        photo_ids: &[i64],
        want_cover: bool,
    ) -> AppResult<Vec<AlbumLinkResult>> {
        let album_ids: BTreeSet<i64> = album_ids.iter().copied().collect();
        if album_ids.is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one album id is required".to_string(),
            ));
        }
        let cover_candidate = *photo_ids.first().ok_or_else(|| {
            AppError::InvalidArgument("At least one photo id is required".to_string())
        })?;
        let distinct_photos: BTreeSet<i64> = photo_ids.iter().copied().collect();

        with_transaction(&self.pool, |tx| {
            let owned = owned_album_ids(tx, owner_id, &album_ids)?;
            if owned.len() < album_ids.len() {
                return Err(AppError::Forbidden(
                    "You do not have access to one or more of these albums".to_string(),
                ));
            }
            ensure_photos_owned(tx, owner_id, &distinct_photos)?;

            let mut results = Vec::with_capacity(owned.len());
            for album_id in owned {
                let mut linked_count = 0;
                for photo_id in &distinct_photos {
                    linked_count += execute_query(
                        tx,
                        queries::album_photos::INSERT,
                        &[&album_id, photo_id],
                    )?;
                }

                let cover_photo_id = match current_cover(tx, album_id)? {
                    Some(existing) => {
                        if want_cover && existing != cover_candidate {
                            debug!(
                                "Album {} keeps cover {}; requested cover {} ignored",
                                album_id, existing, cover_candidate
                            );
                        }
                        existing
                    }
                    None => {
                        assign_cover(tx, album_id, cover_candidate)?;
                        info!("Album {} cover set to photo {}", album_id, cover_candidate);
                        cover_candidate
                    }
                };

                results.push(AlbumLinkResult {
                    album_id,
                    linked_count,
                    cover_photo_id: Some(cover_photo_id),
                });
            }

            Ok(results)
        })
    }

    /// Unlinks photos from one album, promoting a new cover if the old one
    /// was among them. Returns the number of links removed.
    pub fn remove_photos(&self, owner_id: i64, album_id: i64, photo_ids: &[i64]) -> AppResult<usize> {
        let photo_ids: BTreeSet<i64> = photo_ids.iter().copied().collect();
        if photo_ids.is_empty() {
            return Err(AppError::InvalidArgument(
                "At least one photo id is required".to_string(),
            ));
        }

        with_transaction(&self.pool, |tx| {
            ensure_album_owned(tx, owner_id, album_id)?;

            let photo_ids: Vec<i64> = photo_ids.iter().copied().collect();
            let mut covers_removed = 0;
            let mut removed = 0;

            for chunk in photo_ids.chunks(IN_CLAUSE_CHUNK) {
                let params = in_clause_params(&album_id, chunk);

                covers_removed += fetch_one(
                    tx,
                    &expand_in_clause(queries::album_photos::COUNT_COVERS_AMONG, chunk.len()),
                    &params,
                    |row| row.get::<_, i64>(0),
                )?
                .unwrap_or(0);

                removed += execute_query(
                    tx,
                    &expand_in_clause(queries::album_photos::DELETE_AMONG, chunk.len()),
                    &params,
                )?;
            }

            if removed == 0 {
                return Err(AppError::NotFound(
                    "None of these photos are in the album".to_string(),
                ));
            }

            if covers_removed > 0 {
                repair_cover(tx, album_id)?;
            }

            Ok(removed)
        })
    }

    /// Photos linked into an album, ordered by photo id.
    pub fn album_photos(&self, owner_id: i64, album_id: i64) -> AppResult<Vec<AlbumPhotoEntry>> {
        let conn = get_connection(&self.pool)?;
        ensure_album_owned(&conn, owner_id, album_id)?;

        fetch_all(
            &conn,
            queries::album_photos::SELECT_PHOTOS,
            &[&album_id],
            |row| {
                Ok(AlbumPhotoEntry {
                    photo_id: row.get(0)?,
                    url: row.get(1)?,
                    name: row.get(2)?,
                    is_cover: row.get::<_, i64>(3)? != 0,
                })
            },
        )
    }
}

/// Missing and foreign albums are both reported as `Forbidden`.
fn ensure_album_owned(conn: &Connection, owner_id: i64, album_id: i64) -> AppResult<()> {
    let album_owner = fetch_one(conn, queries::albums::SELECT_OWNER, &[&album_id], |row| {
        row.get::<_, i64>(0)
    })?;

    match album_owner {
        Some(user_id) if user_id == owner_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "You do not have access to this album".to_string(),
        )),
    }
}

fn owned_album_ids(
    conn: &Connection,
    owner_id: i64,
    album_ids: &BTreeSet<i64>,
) -> AppResult<Vec<i64>> {
    let album_ids: Vec<i64> = album_ids.iter().copied().collect();
    let mut owned = Vec::with_capacity(album_ids.len());

    for chunk in album_ids.chunks(IN_CLAUSE_CHUNK) {
        owned.extend(fetch_all(
            conn,
            &expand_in_clause(queries::albums::SELECT_OWNED_IDS, chunk.len()),
            &in_clause_params(&owner_id, chunk),
            |row| row.get::<_, i64>(0),
        )?);
    }

    Ok(owned)
}

fn ensure_photos_owned(conn: &Connection, owner_id: i64, photo_ids: &BTreeSet<i64>) -> AppResult<()> {
    let ids: Vec<i64> = photo_ids.iter().copied().collect();
    let mut owned: i64 = 0;

    for chunk in ids.chunks(IN_CLAUSE_CHUNK) {
        owned += fetch_one(
            conn,
            &expand_in_clause(queries::photos::COUNT_OWNED, chunk.len()),
            &in_clause_params(&owner_id, chunk),
            |row| row.get::<_, i64>(0),
        )?
        .unwrap_or(0);
    }

    if (owned as usize) < photo_ids.len() {
        return Err(AppError::Forbidden(
            "You do not have access to one or more of these photos".to_string(),
        ));
    }
    Ok(())
}

fn current_cover(conn: &Connection, album_id: i64) -> AppResult<Option<i64>> {
    fetch_one(
        conn,
        queries::album_photos::SELECT_COVER,
        &[&album_id],
        |row| row.get(0),
    )
}

/// Marks `photo_id` as the album cover and copies its url into the album.
/// The caller guarantees the album has no cover row yet.
fn assign_cover(conn: &Connection, album_id: i64, photo_id: i64) -> AppResult<()> {
    execute_query(
        conn,
        queries::album_photos::SET_COVER,
        &[&album_id, &photo_id],
    )?;

    let url: String = fetch_one(conn, queries::photos::SELECT_URL, &[&photo_id], |row| {
        row.get(0)
    })?
    .ok_or_else(|| AppError::Internal(format!("Cover photo {} has no row", photo_id)))?;

    execute_query(conn, queries::albums::UPDATE_IMAGE_URL, &[&url, &album_id])?;
    Ok(())
}

/// Re-establishes the cover after the cover link was removed: the remaining
/// link with the lowest photo id is promoted, or the url is cleared when the
/// album is empty. Returns the new cover, if any.
pub(crate) fn repair_cover(conn: &Connection, album_id: i64) -> AppResult<Option<i64>> {
    let next_cover: Option<i64> = fetch_one(
        conn,
        queries::album_photos::SELECT_LOWEST_REMAINING,
        &[&album_id],
        |row| row.get(0),
    )?;

    match next_cover {
        Some(photo_id) => {
            assign_cover(conn, album_id, photo_id)?;
            info!("Album {} cover promoted to photo {}", album_id, photo_id);
        }
        None => {
            execute_query(conn, queries::albums::UPDATE_IMAGE_URL, &[&"", &album_id])?;
            info!("Album {} is empty, cover cleared", album_id);
        }
    }

    Ok(next_cover)
}

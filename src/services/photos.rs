use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use crate::constants::GENERATED_PHOTO_NAME_PREFIX;
use crate::database::{
    execute_query, fetch_all, fetch_one, get_connection, insert_returning_id, queries,
    with_transaction, DbPool,
};
use crate::error::{AppError, AppResult};
use crate::models::Photo;
use crate::services::album_photos::repair_cover;

#[derive(Clone)]
pub struct PhotoLifecycleManager {
    pool: DbPool,
}

impl PhotoLifecycleManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn create_photo(&self, owner_id: i64, url: &str, name: Option<&str>) -> AppResult<Photo> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidArgument("Photo url is required".to_string()));
        }
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => generate_photo_name(),
        };

        let conn = get_connection(&self.pool)?;
        let photo_id = insert_returning_id(&conn, queries::photos::INSERT, &[&owner_id, &url, &name])?;

        fetch_one(&conn, queries::photos::SELECT_BY_ID, &[&photo_id], Photo::from_row)?
            .ok_or_else(|| AppError::Internal("Failed to create photo".to_string()))
    }

    pub fn list_photos(&self, owner_id: i64) -> AppResult<Vec<Photo>> {
        let conn = get_connection(&self.pool)?;
        fetch_all(
            &conn,
            queries::photos::SELECT_ALL_FOR_USER,
            &[&owner_id],
            Photo::from_row,
        )
    }

    pub fn rename_photo(&self, owner_id: i64, photo_id: i64, new_name: &str) -> AppResult<Photo> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::InvalidArgument("New name is required".to_string()));
        }

        with_transaction(&self.pool, |tx| {
            let mut photo = load_owned_photo(tx, owner_id, photo_id)?;

            let updated = execute_query(tx, queries::photos::UPDATE_NAME, &[&new_name, &photo_id])?;
            if updated == 0 {
                return Err(AppError::NotFound("Photo not found".to_string()));
            }

            photo.name = new_name.to_string();
            Ok(photo)
        })
    }

    /// Deletes a photo together with its album links, favourites and tag
    /// links. Albums that used the photo as cover get a replacement cover.
    pub fn delete_photo(&self, owner_id: i64, photo_id: i64) -> AppResult<()> {
        with_transaction(&self.pool, |tx| {
            load_owned_photo(tx, owner_id, photo_id)?;

            let covered_albums: Vec<i64> = fetch_all(
                tx,
                queries::album_photos::SELECT_COVERED_ALBUMS_FOR_PHOTO,
                &[&photo_id],
                |row| row.get(0),
            )?;

            let links = execute_query(tx, queries::album_photos::DELETE_FOR_PHOTO, &[&photo_id])?;
            let favourites = execute_query(tx, queries::favourites::DELETE_FOR_PHOTO, &[&photo_id])?;
            let tags = execute_query(tx, queries::hashtags::DELETE_LINKS_FOR_PHOTO, &[&photo_id])?;
            execute_query(tx, queries::photos::DELETE, &[&photo_id])?;

            for album_id in covered_albums {
                repair_cover(tx, album_id)?;
            }

            info!(
                "Deleted photo {} ({} album links, {} favourites, {} tag links)",
                photo_id, links, favourites, tags
            );
            Ok(())
        })
    }
}

fn generate_photo_name() -> String {
    format!("{}{}", GENERATED_PHOTO_NAME_PREFIX, Uuid::new_v4().simple())
}

/// Loads a photo for `owner_id`: `NotFound` when absent, `Forbidden` when it
/// belongs to someone else.
pub(crate) fn load_owned_photo(conn: &Connection, owner_id: i64, photo_id: i64) -> AppResult<Photo> {
    let photo = fetch_one(conn, queries::photos::SELECT_BY_ID, &[&photo_id], Photo::from_row)?
        .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

    if photo.user_id != owner_id {
        return Err(AppError::Forbidden(
            "You do not have permission to modify this photo".to_string(),
        ));
    }
    Ok(photo)
}

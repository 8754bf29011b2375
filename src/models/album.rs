use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Url of the cover photo, empty when the album has no cover.
    pub image_url: String,
    pub photo_count: i64,
    pub created_at: String,
}

impl AlbumResponse {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            image_url: row.get(4)?,
            photo_count: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPhotoEntry {
    pub photo_id: i64,
    pub url: String,
    pub name: String,
    pub is_cover: bool,
}

/// Per-album result of linking photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumLinkResult {
    pub album_id: i64,
    pub linked_count: usize,
    pub cover_photo_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotosResponse {
    pub albums: Vec<AlbumLinkResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePhotosResponse {
    pub album_id: i64,
    pub removed_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPhotosResponse {
    pub album_id: i64,
    pub photos: Vec<AlbumPhotoEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListResponse {
    pub albums: Vec<AlbumResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumCreateRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdateRequest {
    pub album_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDeleteRequest {
    pub album_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPhotosRequest {
    pub album_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAddPhotosRequest {
    pub album_id: Option<i64>,
    pub album_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub photo_ids: Vec<i64>,
    #[serde(default)]
    pub is_cover: bool,
}

impl AlbumAddPhotosRequest {
    /// Accepts either a single `albumId` or an `albumIds` list, or both.
    pub fn target_album_ids(&self) -> Vec<i64> {
        let mut ids = self.album_ids.clone().unwrap_or_default();
        if let Some(album_id) = self.album_id {
            ids.push(album_id);
        }
        ids
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRemovePhotosRequest {
    pub album_id: i64,
    pub photo_ids: Option<Vec<i64>>,
    pub photo_id: Option<i64>,
}

impl AlbumRemovePhotosRequest {
    pub fn target_photo_ids(&self) -> Vec<i64> {
        let mut ids = self.photo_ids.clone().unwrap_or_default();
        if let Some(photo_id) = self.photo_id {
            ids.push(photo_id);
        }
        ids
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::{ApiJson, AppState, CurrentUser};
use crate::database::{
    execute_query, fetch_all, fetch_one, get_connection, insert_returning_id, queries,
    with_transaction,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddPhotosResponse, AlbumAddPhotosRequest, AlbumCreateRequest, AlbumDeleteRequest,
    AlbumListResponse, AlbumPhotosRequest, AlbumPhotosResponse, AlbumRemovePhotosRequest,
    AlbumResponse, AlbumUpdateRequest, RemovePhotosResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/album/create", post(create_album))
        .route("/album/list", get(list_albums))
        .route("/album/update", put(update_album))
        .route("/album/delete", post(delete_album))
        .route("/album/photos", post(album_photos))
        .route("/album/add-photos", post(add_photos))
        .route("/album/remove-photos", post(remove_photos))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn create_album(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumCreateRequest>,
) -> AppResult<(StatusCode, Json<AlbumResponse>)> {
    let name = non_blank(Some(&request.name))
        .ok_or_else(|| AppError::InvalidArgument("Album name is required".to_string()))?;
    let description = non_blank(request.description.as_deref());

    let conn = get_connection(&state.pool)?;
    let album_id = insert_returning_id(
        &conn,
        queries::albums::INSERT,
        &[&current_user.id, &name, &description],
    )?;

    let album = fetch_one(
        &conn,
        queries::albums::SELECT_WITH_COUNT,
        &[&album_id],
        AlbumResponse::from_row,
    )?
    .ok_or_else(|| AppError::Internal("Failed to create album".to_string()))?;

    Ok((StatusCode::CREATED, Json(album)))
}

async fn list_albums(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AlbumListResponse>> {
    let conn = get_connection(&state.pool)?;

    let albums = fetch_all(
        &conn,
        queries::albums::SELECT_ALL_FOR_USER,
        &[&current_user.id],
        AlbumResponse::from_row,
    )?;

    Ok(Json(AlbumListResponse { albums }))
}

/// Updates name and description only; the cover url is owned by the link
/// manager and cannot be set here.
async fn update_album(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumUpdateRequest>,
) -> AppResult<Json<AlbumResponse>> {
    let album = with_transaction(&state.pool, |tx| {
        let existing = fetch_one(
            tx,
            queries::albums::SELECT_WITH_COUNT,
            &[&request.album_id],
            AlbumResponse::from_row,
        )?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if existing.user_id != current_user.id {
            return Err(AppError::Forbidden(
                "You do not have permission to update this album".to_string(),
            ));
        }

        let name = non_blank(request.name.as_deref()).unwrap_or(&existing.name);
        let description = non_blank(request.description.as_deref())
            .or(existing.description.as_deref());

        execute_query(
            tx,
            queries::albums::UPDATE_DETAILS,
            &[&name, &description, &request.album_id],
        )?;

        Ok(AlbumResponse {
            name: name.to_string(),
            description: description.map(str::to_string),
            ..existing
        })
    })?;

    Ok(Json(album))
}

async fn delete_album(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    with_transaction(&state.pool, |tx| {
        let owner = fetch_one(
            tx,
            queries::albums::SELECT_OWNER,
            &[&request.album_id],
            |row| row.get::<_, i64>(0),
        )?
        .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if owner != current_user.id {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this album".to_string(),
            ));
        }

        execute_query(
            tx,
            queries::album_photos::DELETE_FOR_ALBUM,
            &[&request.album_id],
        )?;
        execute_query(tx, queries::albums::DELETE, &[&request.album_id])?;
        Ok(())
    })?;

    Ok(Json(
        serde_json::json!({"message": "Album deleted successfully"}),
    ))
}

async fn album_photos(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumPhotosRequest>,
) -> AppResult<Json<AlbumPhotosResponse>> {
    let photos = state
        .album_photos
        .album_photos(current_user.id, request.album_id)?;

    Ok(Json(AlbumPhotosResponse {
        album_id: request.album_id,
        photos,
    }))
}

async fn add_photos(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumAddPhotosRequest>,
) -> AppResult<Json<AddPhotosResponse>> {
    let albums = state.album_photos.add_photos(
        current_user.id,
        &request.target_album_ids(),
        &request.photo_ids,
        request.is_cover,
    )?;

    Ok(Json(AddPhotosResponse { albums }))
}

async fn remove_photos(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AlbumRemovePhotosRequest>,
) -> AppResult<Json<RemovePhotosResponse>> {
    let removed_count = state.album_photos.remove_photos(
        current_user.id,
        request.album_id,
        &request.target_photo_ids(),
    )?;

    Ok(Json(RemovePhotosResponse {
        album_id: request.album_id,
        removed_count,
    }))
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::auth::{ApiJson, AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::{
    AddTagsRequest, HashtagListResponse, Photo, PhotoCreateRequest, PhotoDeleteRequest,
    PhotoListResponse, PhotoRenameRequest, PhotoTagsRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photo/create", post(create_photo))
        .route("/photo/list", get(list_photos))
        .route("/photo/delete", post(delete_photo))
        .route("/photo/rename", put(rename_photo))
        .route("/photo/add-tags", post(add_tags))
        .route("/photo/tags", post(photo_tags))
}

async fn create_photo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<PhotoCreateRequest>,
) -> AppResult<(StatusCode, Json<Photo>)> {
    let photo = state
        .photos
        .create_photo(current_user.id, &request.url, request.name.as_deref())?;

    Ok((StatusCode::CREATED, Json(photo)))
}

async fn list_photos(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<PhotoListResponse>> {
    let photos = state.photos.list_photos(current_user.id)?;
    Ok(Json(PhotoListResponse { photos }))
}

async fn delete_photo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<PhotoDeleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    state.photos.delete_photo(current_user.id, request.photo_id)?;
    Ok(Json(json!({"message": "Photo deleted successfully"})))
}

async fn rename_photo(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<PhotoRenameRequest>,
) -> AppResult<Json<Photo>> {
    let photo = state
        .photos
        .rename_photo(current_user.id, request.photo_id, &request.new_name)?;

    Ok(Json(photo))
}

async fn add_tags(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<AddTagsRequest>,
) -> AppResult<Json<HashtagListResponse>> {
    let hashtags = state
        .hashtags
        .add_tags(current_user.id, request.photo_id, &request.tags)?;

    Ok(Json(HashtagListResponse {
        photo_id: request.photo_id,
        hashtags,
    }))
}

async fn photo_tags(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(request): ApiJson<PhotoTagsRequest>,
) -> AppResult<Json<HashtagListResponse>> {
    let hashtags = state
        .hashtags
        .photo_tags(current_user.id, request.photo_id)?;

    Ok(Json(HashtagListResponse {
        photo_id: request.photo_id,
        hashtags,
    }))
}

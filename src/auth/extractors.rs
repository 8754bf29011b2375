use crate::auth::jwt::decode_access_token;
use crate::config::Config;
use crate::database::{fetch_one, queries, DbPool};
use crate::error::AppError;
use crate::services::{AlbumPhotoLinkManager, HashtagResolver, PhotoLifecycleManager};
use axum::{
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;

/// The authenticated caller. Every core operation is authorized against `id`.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub id: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DbPool,
    pub album_photos: AlbumPhotoLinkManager,
    pub photos: PhotoLifecycleManager,
    pub hashtags: HashtagResolver,
}

impl AppState {
    pub fn new(config: Arc<Config>, pool: DbPool) -> Self {
        Self {
            album_photos: AlbumPhotoLinkManager::new(pool.clone()),
            photos: PhotoLifecycleManager::new(pool.clone()),
            hashtags: HashtagResolver::new(pool.clone()),
            config,
            pool,
        }
    }
}

/// JSON body whose rejections surface as `InvalidArgument`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header_token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    header_token.or_else(|| {
        parts
            .uri
            .query()
            .and_then(|query| serde_urlencoded::from_str::<TokenQuery>(query).ok())
            .and_then(|params| params.token)
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?;

        let claims = decode_access_token(&token, &app_state.config)?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthenticated("Invalid token".to_string()))?;

        let conn = app_state.pool.get().map_err(AppError::Pool)?;

        fetch_one(&conn, queries::users::SELECT_FOR_TOKEN, &[&user_id], |row| {
            Ok(CurrentUser { id: row.get(0)? })
        })?
        .ok_or_else(|| AppError::Unauthenticated("User not found".to_string()))
    }
}

mod albums;
mod photos;

use crate::auth::AppState;
use axum::Router;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(albums::router())
        .merge(photos::router())
}

use axum::{middleware, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AppState;
use crate::config::Config;
use crate::database::DbPool;
use crate::logging::request_logger;
use crate::routes::api_router;
use crate::VERSION;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthcheckResponse {
    status: String,
    version: String,
    server_time: String,
}

async fn healthcheck() -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        server_time: Utc::now().to_rfc3339(),
    })
}

pub fn create_app(config: Arc<Config>, pool: DbPool) -> Router {
    let state = AppState::new(config, pool);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(api_router());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn test_healthcheck_needs_no_auth() {
        let (app, _pool, _config) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/healthcheck").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], crate::VERSION);
        assert!(body["serverTime"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _pool, _config) = create_test_app();
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/v1/nothing-here")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

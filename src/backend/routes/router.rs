/**
 * Router Configuration
 *
 * Combines the API sub-routers with the top-level routes and the shared
 * tower layers into a single Axum router.
 *
 * # Layers
 *
 * Outermost first:
 * 1. `CatchPanicLayer` - a panicking handler becomes a 500
 * 2. `TraceLayer` - one span per request
 * 3. `CorsLayer` - the configured SPA origin, with credentials
 * 4. `DefaultBodyLimit` - JSON bodies up to 50 KiB
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::response::Reply;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use crate::shared::envelope::ApiErrorBody;

/// Request body limit for JSON payloads
pub const BODY_LIMIT_BYTES: usize = 50 * 1024;

async fn banner() -> &'static str {
    "CampusConnect Backend API is running"
}

async fn health() -> Reply<Value> {
    Reply::ok(json!({ "status": "ok" }), "Server is healthy")
}

async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

async fn method_not_allowed() -> BackendError {
    BackendError::handler(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    tracing::error!("Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ApiErrorBody::new("Internal Server Error", vec![])),
    )
        .into_response()
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}: {}", config.cors_origin, e);
            cors
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let api = configure_api_routes(&app_state);
    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(app_state)
}

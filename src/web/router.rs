//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::dto::{CreateUserRequest, MessageResponse, UpdateUserRequest, UploadResponse, UserResponse};
use super::handlers::{
    create_user, delete_user, file_stats, get_user, list_files, list_users, serve_file,
    serve_missing_path, update_user, upload_file, AppState,
};
use super::middleware::{create_cors_layer, security_headers};
use crate::config::ServerConfig;
use crate::file::{KindCounts, KindStats, PUBLIC_PREFIX};
use crate::user::Role;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// OpenAPI document for the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Filebay API", description = "File manager backend"),
    servers((url = "/api")),
    paths(
        super::handlers::file::upload_file,
        super::handlers::file::list_files,
        super::handlers::file::file_stats,
        super::handlers::file::serve_file,
        super::handlers::user::list_users,
        super::handlers::user::create_user,
        super::handlers::user::get_user,
        super::handlers::user::update_user,
        super::handlers::user::delete_user,
    ),
    components(schemas(
        UploadResponse,
        KindStats,
        KindCounts,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        MessageResponse,
        Role,
    )),
    tags(
        (name = "files", description = "Upload, listing and streaming"),
        (name = "users", description = "User directory")
    )
)]
pub struct ApiDoc;

/// Create the main API router.
///
/// Serves the JSON API under `/api` and the storage root under `/storage`.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let upload_limit = usize::try_from(app_state.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let file_routes = Router::new()
        .route(
            "/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/files/list", get(list_files))
        .route("/files/stats", get(file_stats));

    // File bodies keep their exact Content-Length, so no compression here.
    let serve_routes = Router::new()
        .route("/files/serve", get(serve_missing_path))
        .route("/files/serve/", get(serve_missing_path))
        .route("/files/serve/*path", get(serve_file));

    let user_routes = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        );

    let api_routes = Router::new()
        .merge(file_routes)
        .merge(user_routes)
        .layer(CompressionLayer::new())
        .merge(serve_routes);

    let storage_dir = ServeDir::new(app_state.storage.base_path());

    Router::new()
        .nest("/api", api_routes)
        .nest_service(PUBLIC_PREFIX, storage_dir)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router that serves the OpenAPI document.
pub fn create_openapi_router() -> Router {
    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CompressionLayer::new())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create a fallback router for the prebuilt frontend.
///
/// Unknown paths get `index.html` so client-side routes resolve. Returns
/// `None` if the directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }

    let serve_dir = ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html")));
    Some(
        Router::new()
            .fallback_service(serve_dir)
            .layer(CompressionLayer::new()),
    )
}

/// Assemble the complete application.
///
/// Only JSON endpoints and frontend assets are compressed. File serving,
/// `/storage` and `/health` send plain bodies with a `Content-Length`.
pub fn create_app(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut router = create_router(app_state, config)
        .merge(create_health_router())
        .merge(create_openapi_router());

    if config.serve_static {
        if let Some(static_router) = create_static_router(&config.static_path) {
            router = router.merge(static_router);
        }
    }

    router
}

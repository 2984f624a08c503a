//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_infra::request_id_middleware;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Ceiling for JSON request bodies.
pub const MAX_JSON_BODY_BYTES: usize = 64 * 1024;

/// Each ingest runs ffprobe and ffmpeg; cap how many run at once.
const MAX_CONCURRENT_INGESTS: usize = 8;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let limits = state.config.limits;

    let video_upload = Router::new()
        .route(
            "/api/videos/{id}/upload",
            post(handlers::video_upload::upload_video),
        )
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_INGESTS))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            limits.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    let thumbnail_upload = Router::new()
        .route(
            "/api/videos/{id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            limits.max_thumbnail_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    let api = Router::new()
        .route(
            "/api/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/api/videos/{id}", get(handlers::videos::get_video))
        .layer(DefaultBodyLimit::max(MAX_JSON_BODY_BYTES))
        .merge(video_upload)
        .merge(thumbnail_upload);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/storage/{bucket}/{*key}",
            get(handlers::storage_get::get_object),
        )
        .merge(api)
        .nest_service("/assets", ServeDir::new(&state.config.assets_root))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

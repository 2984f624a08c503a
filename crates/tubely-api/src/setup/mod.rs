//! Application wiring

pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;
use tubely_core::{Config, MediaToolsConfig, StorageBackend};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{
    FastStartTranscoder, FfmpegFastStart, FfprobeProbe, IngestionPipeline, MediaProbe,
    ThumbnailStore,
};
use tubely_storage::{create_local_storage, create_storage, LocalStorage, SignedUrlIssuer, Storage};

/// External media tools used by the ingestion pipeline.
pub struct MediaTools {
    pub probe: Arc<dyn MediaProbe>,
    pub transcoder: Arc<dyn FastStartTranscoder>,
}

impl MediaTools {
    /// ffprobe and ffmpeg at the configured paths.
    pub fn from_config(config: &MediaToolsConfig) -> Self {
        Self {
            probe: Arc::new(FfprobeProbe::new(config)),
            transcoder: Arc::new(FfmpegFastStart::new(config)),
        }
    }
}

/// Build the state from already-constructed collaborators.
pub fn build_state(
    config: Config,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    local_storage: Option<LocalStorage>,
    tools: MediaTools,
) -> Arc<AppState> {
    let pipeline = IngestionPipeline::new(
        tools.probe,
        tools.transcoder,
        storage.clone(),
        repository.clone(),
        config.storage.bucket.clone(),
    );
    let thumbnails = ThumbnailStore::new(
        config.assets_root.clone(),
        config.assets_base_url(),
        repository.clone(),
    );

    Arc::new(AppState {
        issuer: SignedUrlIssuer::new(storage),
        pipeline,
        thumbnails,
        repository,
        local_storage,
        config,
    })
}

/// Initialize storage, the record store and the router.
pub async fn initialize_app(config: Config) -> anyhow::Result<(Arc<AppState>, Router)> {
    tokio::fs::create_dir_all(&config.assets_root).await?;

    let local_storage = match config.storage.backend {
        StorageBackend::Local => Some(create_local_storage(&config.storage).await?),
        StorageBackend::S3 => None,
    };
    let storage: Arc<dyn Storage> = match &local_storage {
        Some(local) => Arc::new(local.clone()),
        None => create_storage(&config.storage).await?,
    };
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.storage.bucket,
        "Storage initialized"
    );

    let repository: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::new());

    let tools = MediaTools::from_config(&config.media_tools);
    let state = build_state(config, storage, repository, local_storage, tools);
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{IngestionPipeline, ThumbnailStore};
use tubely_storage::{LocalStorage, SignedUrlIssuer};

pub struct AppState {
    pub config: Config,
    pub repository: Arc<dyn VideoRepository>,
    pub pipeline: IngestionPipeline,
    pub issuer: SignedUrlIssuer,
    pub thumbnails: ThumbnailStore,
    /// Set when objects live on local disk; serves the URLs it signs.
    pub local_storage: Option<LocalStorage>,
}

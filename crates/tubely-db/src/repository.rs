//! Video record store contract

use async_trait::async_trait;
use thiserror::Error;
use tubely_core::{CreateVideoParams, VideoRecord};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Video not found: {0}")]
    NotFound(Uuid),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Record store for videos.
///
/// Writes are last-write-wins; no transactional guarantee is assumed.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, params: CreateVideoParams) -> RepositoryResult<VideoRecord>;

    async fn get_video(&self, id: Uuid) -> RepositoryResult<Option<VideoRecord>>;

    /// Replace the stored record with `video`. Fails if the id is unknown.
    async fn update_video(&self, video: &VideoRecord) -> RepositoryResult<()>;

    /// All videos owned by `user_id`, newest first.
    async fn list_videos(&self, user_id: Uuid) -> RepositoryResult<Vec<VideoRecord>>;
}

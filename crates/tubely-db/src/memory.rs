use crate::repository::{RepositoryError, RepositoryResult, VideoRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::{CreateVideoParams, VideoRecord};
use uuid::Uuid;

/// Process-local video store.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, params: CreateVideoParams) -> RepositoryResult<VideoRecord> {
        let video = VideoRecord::new(params);
        self.videos.write().await.insert(video.id, video.clone());
        tracing::debug!(video_id = %video.id, user_id = %video.user_id, "Video record created");
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> RepositoryResult<Option<VideoRecord>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &VideoRecord) -> RepositoryResult<()> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(stored) => {
                *stored = video.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(video.id)),
        }
    }

    async fn list_videos(&self, user_id: Uuid) -> RepositoryResult<Vec<VideoRecord>> {
        let mut videos: Vec<VideoRecord> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}

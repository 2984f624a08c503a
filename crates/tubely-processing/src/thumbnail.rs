//! Thumbnail storage
//!
//! Thumbnails are small and public, so they skip the object store: the image is
//! written under the assets root with a random name and the record points at
//! its public URL.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::{resolve_thumbnail_extension, AppError, VideoRecord};
use tubely_db::VideoRepository;

const NAME_BYTES: usize = 32;

#[derive(Clone)]
pub struct ThumbnailStore {
    assets_root: PathBuf,
    assets_base_url: String,
    repository: Arc<dyn VideoRepository>,
}

impl ThumbnailStore {
    pub fn new(
        assets_root: PathBuf,
        assets_base_url: String,
        repository: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            assets_root,
            assets_base_url,
            repository,
        }
    }

    /// Write the image, point the record at it and persist the record.
    #[tracing::instrument(skip(self, record, bytes), fields(video_id = %record.id, size = bytes.len()))]
    pub async fn save(
        &self,
        mut record: VideoRecord,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<VideoRecord, AppError> {
        let extension = resolve_thumbnail_extension(content_type)?;
        let file_name = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(rand::random::<[u8; NAME_BYTES]>()),
            extension
        );

        tokio::fs::create_dir_all(&self.assets_root).await?;
        let path = self.assets_root.join(&file_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to write thumbnail");
            AppError::Internal(format!("failed to write thumbnail: {}", e))
        })?;

        record.thumbnail_url = Some(format!(
            "{}/{}",
            self.assets_base_url.trim_end_matches('/'),
            file_name
        ));
        record.updated_at = Utc::now();

        if let Err(e) = self.repository.update_video(&record).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(AppError::PersistFailure(e.to_string()));
        }

        tracing::info!(file = %file_name, "Thumbnail stored");
        Ok(record)
    }
}

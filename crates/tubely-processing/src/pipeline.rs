//! Video ingestion pipeline
//!
//! ```text
//! Received -> Probed -> Classified -> Transcoded -> Uploaded -> Recorded
//!     \_________\___________\_____________\____________\____-> Failed
//! ```
//!
//! The caller has already checked ownership and the declared content type and
//! spooled the upload to a temporary file. The pipeline owns that file from then
//! on: the raw upload and the fast-start copy are both held as [`TempPath`]
//! guards, so neither outlives [`IngestionPipeline::ingest`] whichever way it
//! returns. Dropping the future mid-stage also kills any running ffprobe or
//! ffmpeg child before the guards run.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempPath;
use tubely_core::{AppError, MediaDimensions, Orientation, StorageLocator, VideoRecord};
use tubely_db::VideoRepository;
use tubely_storage::Storage;
use uuid::Uuid;

use crate::faststart::{fast_start_output_path, FastStartTranscoder};
use crate::orientation::classify;
use crate::probe::MediaProbe;

/// Where an ingestion currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStage {
    Received,
    Probed,
    Classified,
    Transcoded,
    Uploaded,
    Recorded,
    Failed,
}

impl IngestionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStage::Received => "received",
            IngestionStage::Probed => "probed",
            IngestionStage::Classified => "classified",
            IngestionStage::Transcoded => "transcoded",
            IngestionStage::Uploaded => "uploaded",
            IngestionStage::Recorded => "recorded",
            IngestionStage::Failed => "failed",
        }
    }
}

impl Display for IngestionStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

pub struct IngestRequest {
    /// Record to attach the video to. Ownership is already verified.
    pub record: VideoRecord,
    /// The spooled upload. Deleted when the request is dropped.
    pub raw_file: TempPath,
    /// Declared content type, stored on the object.
    pub content_type: String,
    /// Extension for the object key, without the dot.
    pub extension: String,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub record: VideoRecord,
    pub orientation: Orientation,
    pub dimensions: MediaDimensions,
    pub locator: StorageLocator,
}

#[derive(Clone)]
pub struct IngestionPipeline {
    probe: Arc<dyn MediaProbe>,
    transcoder: Arc<dyn FastStartTranscoder>,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    bucket: String,
}

impl IngestionPipeline {
    pub fn new(
        probe: Arc<dyn MediaProbe>,
        transcoder: Arc<dyn FastStartTranscoder>,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        bucket: String,
    ) -> Self {
        Self {
            probe,
            transcoder,
            storage,
            repository,
            bucket,
        }
    }

    /// Run every stage in order, stopping at the first failure.
    #[tracing::instrument(skip(self, request), fields(video_id = %request.record.id))]
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, AppError> {
        let start = std::time::Instant::now();
        let mut stage = IngestionStage::Received;
        tracing::debug!(stage = %stage, "Ingestion started");

        let result = self.run(request, &mut stage).await;

        match &result {
            Ok(outcome) => tracing::info!(
                stage = %stage,
                locator = %outcome.locator,
                orientation = %outcome.orientation,
                duration_ms = start.elapsed().as_millis(),
                "Ingestion completed"
            ),
            Err(e) => tracing::warn!(
                stage = %IngestionStage::Failed,
                failed_after = %stage,
                error = %e,
                duration_ms = start.elapsed().as_millis(),
                "Ingestion failed"
            ),
        }

        result
    }

    async fn run(
        &self,
        request: IngestRequest,
        stage: &mut IngestionStage,
    ) -> Result<IngestOutcome, AppError> {
        let IngestRequest {
            mut record,
            raw_file,
            content_type,
            extension,
        } = request;

        // Guard the output before ffmpeg creates it, so a partial file from a
        // failed remux is removed too.
        let processed = TempPath::from_path(fast_start_output_path(&raw_file));

        let dimensions = self.probe.probe(&raw_file).await?;
        advance(stage, IngestionStage::Probed);

        let orientation = classify(dimensions);
        advance(stage, IngestionStage::Classified);

        let remuxed = self.transcoder.remux(&raw_file).await?;
        if remuxed.as_path() != &*processed {
            let stray = TempPath::from_path(remuxed);
            return Err(AppError::TranscodeFailure(format!(
                "remux wrote to unexpected path {}",
                stray.display()
            )));
        }
        advance(stage, IngestionStage::Transcoded);

        let key = format!("{}/{}.{}", orientation, Uuid::new_v4(), extension);
        let locator = StorageLocator::new(self.bucket.as_str(), key)?;
        self.upload(&processed, &locator, &content_type).await?;
        advance(stage, IngestionStage::Uploaded);

        record.video_url = Some(locator.encode());
        record.updated_at = Utc::now();
        self.repository
            .update_video(&record)
            .await
            .map_err(|e| AppError::PersistFailure(e.to_string()))?;
        advance(stage, IngestionStage::Recorded);

        Ok(IngestOutcome {
            record,
            orientation,
            dimensions,
            locator,
        })
    }

    async fn upload(
        &self,
        path: &TempPath,
        locator: &StorageLocator,
        content_type: &str,
    ) -> Result<(), AppError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| AppError::UploadFailure(format!("failed to open processed file: {}", e)))?;
        let content_length = file.metadata().await.ok().map(|m| m.len());

        self.storage
            .put_object_stream(
                locator.bucket(),
                locator.key(),
                content_type,
                content_length,
                Box::pin(file),
            )
            .await
            .map_err(|e| AppError::UploadFailure(e.to_string()))
    }
}

fn advance(stage: &mut IngestionStage, next: IngestionStage) {
    tracing::debug!(from = %stage, to = %next, "Ingestion stage transition");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(IngestionStage::Received.to_string(), "received");
        assert_eq!(IngestionStage::Recorded.to_string(), "recorded");
        assert_eq!(IngestionStage::Failed.to_string(), "failed");
    }
}

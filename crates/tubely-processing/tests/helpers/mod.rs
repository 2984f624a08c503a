//! Fakes for the ingestion pipeline's collaborators.
//!
//! Each fake records what it saw so tests can assert on side effects (or their
//! absence) without touching ffmpeg or a real object store.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncReadExt;
use tubely_core::{AppError, CreateVideoParams, MediaDimensions, VideoRecord};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{
    fast_start_output_path, FastStartTranscoder, IngestRequest, IngestionPipeline, MediaProbe,
};
use tubely_storage::{ObjectReader, Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

pub const TEST_BUCKET: &str = "tubely-test";

/// Returns fixed dimensions, or a probe failure.
pub struct FakeProbe {
    result: Result<MediaDimensions, String>,
}

impl FakeProbe {
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            result: Ok(MediaDimensions::new(width, height)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, _path: &Path) -> Result<MediaDimensions, AppError> {
        self.result.clone().map_err(AppError::ProbeFailure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemuxBehaviour {
    Copy,
    FailPartway,
    WrongPath,
}

/// Copies the input to the fast-start path, fails after writing a partial
/// output, or writes somewhere the pipeline did not ask for.
pub struct FakeTranscoder {
    behaviour: RemuxBehaviour,
    pub outputs: Mutex<Vec<PathBuf>>,
}

impl FakeTranscoder {
    fn with_behaviour(behaviour: RemuxBehaviour) -> Self {
        Self {
            behaviour,
            outputs: Mutex::new(Vec::new()),
        }
    }

    pub fn copying() -> Self {
        Self::with_behaviour(RemuxBehaviour::Copy)
    }

    pub fn failing() -> Self {
        Self::with_behaviour(RemuxBehaviour::FailPartway)
    }

    pub fn misplacing() -> Self {
        Self::with_behaviour(RemuxBehaviour::WrongPath)
    }

    pub fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl FastStartTranscoder for FakeTranscoder {
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError> {
        let output = match self.behaviour {
            RemuxBehaviour::WrongPath => input.with_extension("elsewhere"),
            _ => fast_start_output_path(input),
        };
        self.outputs.lock().unwrap().push(output.clone());

        if self.behaviour == RemuxBehaviour::FailPartway {
            // Simulate ffmpeg dying halfway through
            tokio::fs::write(&output, b"partial").await.unwrap();
            return Err(AppError::TranscodeFailure("moov atom not found".to_string()));
        }

        tokio::fs::copy(input, &output).await.unwrap();
        Ok(output)
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// In-memory object store that records every put.
#[derive(Default)]
pub struct FakeStorage {
    pub fail_puts: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Default::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn put_object_stream(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: ObjectReader,
    ) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::UploadFailed("connection reset".to_string()));
        }
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://{}.example.com/{}?expires_in={}&nonce={}",
            bucket,
            key,
            expires_in.as_secs(),
            Uuid::new_v4()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Wires fakes into a pipeline and keeps handles for assertions.
pub struct Harness {
    pub pipeline: IngestionPipeline,
    pub transcoder: Arc<FakeTranscoder>,
    pub storage: Arc<FakeStorage>,
    pub repository: InMemoryVideoRepository,
}

impl Harness {
    pub fn new(probe: FakeProbe, transcoder: FakeTranscoder, storage: FakeStorage) -> Self {
        Self::with_repository(probe, transcoder, storage, InMemoryVideoRepository::new())
    }

    pub fn with_repository(
        probe: FakeProbe,
        transcoder: FakeTranscoder,
        storage: FakeStorage,
        repository: InMemoryVideoRepository,
    ) -> Self {
        let transcoder = Arc::new(transcoder);
        let storage = Arc::new(storage);
        let pipeline = IngestionPipeline::new(
            Arc::new(probe),
            transcoder.clone(),
            storage.clone(),
            Arc::new(repository.clone()),
            TEST_BUCKET.to_string(),
        );

        Self {
            pipeline,
            transcoder,
            storage,
            repository,
        }
    }

    pub async fn create_record(&self) -> VideoRecord {
        self.repository
            .create_video(CreateVideoParams {
                user_id: Uuid::new_v4(),
                title: "Boots".to_string(),
                description: "A pair of boots".to_string(),
            })
            .await
            .unwrap()
    }
}

/// Spool `body` to a temp file the way the upload handler does.
pub fn spooled_upload(body: &[u8]) -> TempPath {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), body).unwrap();
    file.into_temp_path()
}

pub fn mp4_request(record: VideoRecord, raw_file: TempPath) -> IngestRequest {
    IngestRequest {
        record,
        raw_file,
        content_type: "video/mp4".to_string(),
        extension: "mp4".to_string(),
    }
}

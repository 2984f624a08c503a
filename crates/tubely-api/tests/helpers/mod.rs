//! Test helpers: build AppState and router for integration tests.
//!
//! Objects go to a `LocalStorage` in a temp directory and ffprobe/ffmpeg are
//! replaced by fakes, so these tests need nothing installed.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::{build_state, routes, MediaTools};
use tubely_api::state::AppState;
use tubely_core::{
    AppError, Config, CreateVideoParams, MediaDimensions, MediaToolsConfig, StorageBackend,
    StorageConfig, UploadLimits, VideoRecord,
};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{fast_start_output_path, FastStartTranscoder, MediaProbe};
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const TEST_BUCKET: &str = "tubely-test";
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-at-least-32-chars";

/// Counts calls and reports fixed dimensions.
pub struct FakeProbe {
    dimensions: MediaDimensions,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, _path: &Path) -> Result<MediaDimensions, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dimensions)
    }
}

/// Copies the input to the fast-start path.
pub struct CopyTranscoder;

#[async_trait]
impl FastStartTranscoder for CopyTranscoder {
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError> {
        let output = fast_start_output_path(input);
        tokio::fs::copy(input, &output)
            .await
            .map_err(|e| AppError::TranscodeFailure(e.to_string()))?;
        Ok(output)
    }
}

/// Test application: server plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub repository: InMemoryVideoRepository,
    pub storage: LocalStorage,
    pub probe: Arc<FakeProbe>,
    pub storage_dir: TempDir,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn create_video_for(&self, user_id: Uuid) -> VideoRecord {
        self.repository
            .create_video(CreateVideoParams {
                user_id,
                title: "Boots".to_string(),
                description: "A pair of boots".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn stored_video(&self, id: Uuid) -> VideoRecord {
        self.repository.get_video(id).await.unwrap().unwrap()
    }

    pub fn probe_calls(&self) -> usize {
        self.probe.calls.load(Ordering::SeqCst)
    }

    /// Number of files under the object storage root.
    pub fn stored_object_count(&self) -> usize {
        count_files(self.storage_dir.path())
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() {
                        count_files(&path)
                    } else {
                        1
                    }
                })
                .sum()
        })
        .unwrap_or(0)
}

fn create_test_config(storage_dir: &Path, assets_dir: &Path) -> Config {
    Config {
        environment: "test".to_string(),
        server_port: 8091,
        log_format: "pretty".to_string(),
        assets_root: assets_dir.to_path_buf(),
        storage: StorageConfig {
            backend: StorageBackend::Local,
            bucket: TEST_BUCKET.to_string(),
            region: None,
            endpoint: None,
            local_path: Some(storage_dir.to_path_buf()),
            local_base_url: Some("http://localhost:8091/storage".to_string()),
            signing_secret: Some(TEST_SIGNING_SECRET.to_string()),
        },
        media_tools: MediaToolsConfig::default(),
        limits: UploadLimits {
            max_video_size_bytes: 1024 * 1024,
            max_thumbnail_size_bytes: 1024 * 1024,
        },
    }
}

/// Setup test app with a portrait-reporting probe.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_dimensions(MediaDimensions::new(1080, 1920)).await
}

pub async fn setup_test_app_with_dimensions(dimensions: MediaDimensions) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage directory");
    let assets_dir = tempfile::tempdir().expect("Failed to create assets directory");
    let config = create_test_config(storage_dir.path(), assets_dir.path());

    let storage = LocalStorage::new(
        storage_dir.path(),
        "http://localhost:8091/storage".to_string(),
        TEST_SIGNING_SECRET,
    )
    .await
    .expect("Failed to create local storage");
    let repository = InMemoryVideoRepository::new();
    let probe = Arc::new(FakeProbe {
        dimensions,
        calls: AtomicUsize::new(0),
    });

    let shared_storage: Arc<dyn Storage> = Arc::new(storage.clone());
    let state = build_state(
        config,
        shared_storage,
        Arc::new(repository.clone()),
        Some(storage.clone()),
        MediaTools {
            probe: probe.clone(),
            transcoder: Arc::new(CopyTranscoder),
        },
    );
    let app = routes::setup_routes(state.clone());
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        repository,
        storage,
        probe,
        storage_dir,
        assets_dir,
    }
}

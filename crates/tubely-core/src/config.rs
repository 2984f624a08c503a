//! Configuration module
//!
//! The service reads its settings from the environment once at startup. Components
//! never read the environment themselves; they receive the narrow config struct they
//! need ([`MediaToolsConfig`], [`StorageConfig`], [`UploadLimits`]).

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_THUMBNAIL_SIZE_MB, DEFAULT_MAX_VIDEO_SIZE_MB, DEFAULT_SERVER_PORT,
    LOCATOR_DELIMITER,
};

const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Paths of the external media tools.
#[derive(Clone, Debug)]
pub struct MediaToolsConfig {
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
}

impl Default for MediaToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

/// Object store settings.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket every new upload lands in.
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, R2, ...)
    pub endpoint: Option<String>,
    pub local_path: Option<PathBuf>,
    pub local_base_url: Option<String>,
    /// HMAC key for locally signed URLs.
    pub signing_secret: Option<String>,
}

/// Size limits for multipart uploads.
#[derive(Clone, Copy, Debug)]
pub struct UploadLimits {
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: DEFAULT_MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    /// `pretty` or `json`.
    pub log_format: String,
    /// Directory that thumbnails are written to and served from.
    pub assets_root: PathBuf,
    pub storage: StorageConfig,
    pub media_tools: MediaToolsConfig,
    pub limits: UploadLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

        let assets_root = env::var("ASSETS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./assets"));

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let bucket = env::var("S3_BUCKET").unwrap_or_default();

        let storage = StorageConfig {
            backend,
            bucket,
            region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            local_path: env::var("LOCAL_STORAGE_PATH").ok().map(PathBuf::from),
            local_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            signing_secret: env::var("STORAGE_SIGNING_SECRET").ok(),
        };

        let media_tools = MediaToolsConfig {
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
        };

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB);
        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_THUMBNAIL_SIZE_MB);

        let config = Config {
            environment,
            server_port,
            log_format,
            assets_root,
            storage,
            media_tools,
            limits: UploadLimits {
                max_video_size_bytes: max_video_size_mb * 1024 * 1024,
                max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.bucket.is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must be set"));
        }

        // The bucket ends up inside persisted locators
        if self.storage.bucket.contains(LOCATOR_DELIMITER) {
            return Err(anyhow::anyhow!(
                "S3_BUCKET must not contain '{}'",
                LOCATOR_DELIMITER
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_path.is_none() || self.storage.local_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL"
                    ));
                }
                let secret_len = self
                    .storage
                    .signing_secret
                    .as_ref()
                    .map(|s| s.len())
                    .unwrap_or(0);
                if secret_len < MIN_SIGNING_SECRET_LEN {
                    return Err(anyhow::anyhow!(
                        "STORAGE_SIGNING_SECRET must be at least {} characters long",
                        MIN_SIGNING_SECRET_LEN
                    ));
                }
            }
        }

        Ok(())
    }

    /// Public base URL of the thumbnail assets.
    pub fn assets_base_url(&self) -> String {
        format!("http://localhost:{}/assets", self.server_port)
    }
}

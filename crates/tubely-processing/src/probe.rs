//! Media probe - stream dimensions via ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tubely_core::{AppError, MediaDimensions, MediaToolsConfig};

/// Reads the pixel dimensions of a video file.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<MediaDimensions, AppError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Only the first stream is considered; it must report a positive width and height.
pub fn parse_probe_output(stdout: &[u8]) -> Result<MediaDimensions, AppError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AppError::ProbeFailure(format!("could not parse ffprobe output: {}", e)))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| AppError::ProbeFailure("no streams found".to_string()))?;

    let dimension = |value: Option<i64>, name: &str| -> Result<u32, AppError> {
        value
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                AppError::ProbeFailure(format!("first stream has no positive {}", name))
            })
    };

    Ok(MediaDimensions::new(
        dimension(stream.width, "width")?,
        dimension(stream.height, "height")?,
    ))
}

pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(config: &MediaToolsConfig) -> Self {
        Self {
            ffprobe_path: config.ffprobe_path.clone(),
        }
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<MediaDimensions, AppError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::ProbeFailure(format!("failed to execute {}: {}", self.ffprobe_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ProbeFailure(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}

//! Fast-start remux via ffmpeg
//!
//! Moves the MP4 index (moov atom) ahead of the media data so players can start
//! before the whole file is downloaded. Streams are copied, not re-encoded.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tubely_core::constants::FAST_START_SUFFIX;
use tubely_core::{AppError, MediaToolsConfig};

const STDERR_TAIL_BYTES: usize = 2048;

#[async_trait]
pub trait FastStartTranscoder: Send + Sync {
    /// Write a fast-start copy of `input` to [`fast_start_output_path`] and return that path.
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError>;
}

/// `<input>.processing`, next to the input.
pub fn fast_start_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(FAST_START_SUFFIX);
    PathBuf::from(name)
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL_BYTES {
        return text.to_string();
    }
    let mut cut = text.len() - STDERR_TAIL_BYTES;
    while !text.is_char_boundary(cut) {
        cut += 1;
    }
    text[cut..].to_string()
}

pub struct FfmpegFastStart {
    ffmpeg_path: String,
}

impl FfmpegFastStart {
    pub fn new(config: &MediaToolsConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
        }
    }
}

#[async_trait]
impl FastStartTranscoder for FfmpegFastStart {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<PathBuf, AppError> {
        let start = std::time::Instant::now();
        let output_path = fast_start_output_path(input);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::TranscodeFailure(format!("failed to execute {}: {}", self.ffmpeg_path, e))
            })?;

        if !output.status.success() {
            return Err(AppError::TranscodeFailure(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}

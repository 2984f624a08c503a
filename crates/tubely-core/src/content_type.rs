//! Content-type checks for uploads.

use crate::constants::SUPPORTED_VIDEO_CONTENT_TYPE;
use crate::error::AppError;

/// Strip parameters and normalise case: `"Video/MP4; codecs=avc1"` -> `"video/mp4"`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Map a declared video content type to the stored file extension.
pub fn resolve_video_extension(content_type: &str) -> Result<&'static str, AppError> {
    match essence(content_type).as_str() {
        SUPPORTED_VIDEO_CONTENT_TYPE => Ok("mp4"),
        other => Err(AppError::UnsupportedMediaType(format!(
            "must upload an {} video, got '{}'",
            SUPPORTED_VIDEO_CONTENT_TYPE, other
        ))),
    }
}

/// Map a declared thumbnail content type to the stored file extension.
pub fn resolve_thumbnail_extension(content_type: &str) -> Result<&'static str, AppError> {
    match essence(content_type).as_str() {
        "image/png" => Ok("png"),
        "image/jpeg" => Ok("jpeg"),
        other => Err(AppError::UnsupportedMediaType(format!(
            "thumbnail must be image/png or image/jpeg, got '{}'",
            other
        ))),
    }
}

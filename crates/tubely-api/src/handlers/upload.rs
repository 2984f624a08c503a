//! Multipart helpers shared by the upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;

pub fn multipart_error(e: MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e))
    }
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File size exceeds maximum allowed size of {} MB",
        max_bytes / 1024 / 1024
    ))
}

/// Declared content type of a field, empty when absent.
pub fn field_content_type(field: &Field<'_>) -> String {
    field.content_type().unwrap_or_default().to_string()
}

/// Stream a field to a new temporary file, enforcing `max_bytes`.
///
/// The returned guard deletes the file when dropped; a failed spool leaves nothing behind.
pub async fn spool_to_temp_file(mut field: Field<'_>, max_bytes: usize) -> Result<TempPath, AppError> {
    let (file, path) = NamedTempFile::new()?.into_parts();
    let mut file = tokio::fs::File::from_std(file);
    let mut written: usize = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        written += chunk.len();
        if written > max_bytes {
            return Err(too_large(max_bytes));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(size_bytes = written, path = %path.display(), "Upload spooled to disk");
    Ok(path)
}

/// Read a small field fully into memory, enforcing `max_bytes`.
pub async fn read_field_bytes(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if data.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

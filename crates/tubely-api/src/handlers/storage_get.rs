//! Serves objects from the local storage backend.
//!
//! Only reachable with a URL minted by `LocalStorage::presigned_get_url`: the
//! signature and expiry in the query are checked before the file is opened.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tubely_core::AppError;
use tubely_storage::StorageError;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: u64,
    pub nonce: String,
    pub signature: String,
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, HttpAppError> {
    let storage = state
        .local_storage
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    storage
        .verify_signed_request(&bucket, &key, query.expires, &query.nonce, &query.signature)
        .map_err(|e| {
            tracing::debug!(error = %e, bucket = %bucket, key = %key, "Rejected signed URL");
            AppError::Forbidden("Invalid or expired URL".to_string())
        })?;

    let (file, len) = storage.open_object(&bucket, &key).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
            AppError::NotFound("Object not found".to_string())
        }
        other => {
            tracing::error!(error = %other, bucket = %bucket, key = %key, "Failed to open object");
            AppError::Internal(other.to_string())
        }
    })?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&key))
        .header(header::CONTENT_LENGTH, len)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

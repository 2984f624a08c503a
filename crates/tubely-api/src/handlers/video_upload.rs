use crate::auth::CallerIdentity;
use crate::error::HttpAppError;
use crate::handlers::upload::{field_content_type, multipart_error, spool_to_temp_file};
use crate::handlers::videos::load_owned_video;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tubely_core::{resolve_video_extension, AppError};
use tubely_processing::IngestRequest;
use uuid::Uuid;

const VIDEO_FIELD: &str = "video";

/// Accept an MP4 for an existing video record and run it through ingestion.
///
/// Ownership and the declared content type are checked before a single body byte
/// is written to disk.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<StatusCode, HttpAppError> {
    let video = load_owned_video(&state, &caller, id).await?;
    let max_bytes = state.config.limits.max_video_size_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field_content_type(&field);
        let extension = resolve_video_extension(&content_type)?;
        let raw_file = spool_to_temp_file(field, max_bytes).await?;

        tracing::info!(
            video_id = %video.id,
            user_id = %caller.user_id,
            content_type = %content_type,
            "Video upload received"
        );

        state
            .pipeline
            .ingest(IngestRequest {
                record: video,
                raw_file,
                content_type,
                extension: extension.to_string(),
            })
            .await?;

        return Ok(StatusCode::NO_CONTENT);
    }

    Err(AppError::InvalidInput(format!("No '{}' field provided", VIDEO_FIELD)).into())
}

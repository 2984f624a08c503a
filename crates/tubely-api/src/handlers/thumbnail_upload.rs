use crate::auth::CallerIdentity;
use crate::error::HttpAppError;
use crate::handlers::upload::{field_content_type, multipart_error, read_field_bytes};
use crate::handlers::videos::load_owned_video;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::{resolve_thumbnail_extension, AppError, VideoResponse};
use uuid::Uuid;

const THUMBNAIL_FIELD: &str = "thumbnail";

pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, &caller, id).await?;
    let max_bytes = state.config.limits.max_thumbnail_size_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let content_type = field_content_type(&field);
        resolve_thumbnail_extension(&content_type)?;
        let data = read_field_bytes(field, max_bytes).await?;

        let video = state.thumbnails.save(video, &data, &content_type).await?;
        let response = state.issuer.sign_record(video).await?;
        return Ok(Json(response));
    }

    Err(AppError::InvalidInput(format!("No '{}' field provided", THUMBNAIL_FIELD)).into())
}

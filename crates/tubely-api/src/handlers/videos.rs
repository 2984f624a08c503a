//! Video record endpoints
//!
//! Every read re-signs the stored locator, so a response never carries a URL
//! older than the request.

use crate::auth::CallerIdentity;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tubely_core::{AppError, CreateVideoParams, VideoRecord, VideoResponse};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_video(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    ValidatedJson(body): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()).into());
    }

    let video = state
        .repository
        .create_video(CreateVideoParams {
            user_id: caller.user_id,
            title: title.to_string(),
            description: body.description,
        })
        .await?;

    tracing::info!(video_id = %video.id, user_id = %caller.user_id, "Video created");
    Ok((
        StatusCode::CREATED,
        Json(VideoResponse::from_record(video, None)),
    ))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, &caller, id).await?;
    let response = state.issuer.sign_record(video).await?;
    Ok(Json(response))
}

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.repository.list_videos(caller.user_id).await?;
    let responses = state.issuer.sign_records(videos).await?;
    Ok(Json(responses))
}

/// Fetch a video and check that the caller owns it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    caller: &CallerIdentity,
    id: Uuid,
) -> Result<VideoRecord, HttpAppError> {
    let video = state
        .repository
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
    caller.ensure_owns(&video)?;
    Ok(video)
}

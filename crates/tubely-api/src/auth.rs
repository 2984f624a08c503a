//! Caller identity
//!
//! Authentication happens at the gateway in front of this service, which passes
//! the verified user id in `X-User-Id`. Handlers only see [`CallerIdentity`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tubely_core::constants::USER_ID_HEADER;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

use crate::error::HttpAppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
}

impl CallerIdentity {
    /// Fail with `Forbidden` unless the caller owns `video`.
    pub fn ensure_owns(&self, video: &VideoRecord) -> Result<(), AppError> {
        if video.is_owned_by(self.user_id) {
            Ok(())
        } else {
            tracing::debug!(
                video_id = %video.id,
                caller = %self.user_id,
                "Caller does not own video"
            );
            Err(AppError::Forbidden(
                "You do not have access to this video".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing caller identity".to_string()))?;

        let user_id = value
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid caller identity".to_string()))?;

        Ok(CallerIdentity { user_id })
    }
}

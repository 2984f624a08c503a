use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video owned by one user.
///
/// `video_url` holds an encoded storage locator (`"<bucket>,<key>"`), never a
/// fetchable URL. It is turned into a signed URL on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn new(params: CreateVideoParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            title: params.title,
            description: params.description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideoParams {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A retrieval URL that stops working at `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Video as returned to clients, with the locator replaced by a fresh signed URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build the response for a record, attaching `signed` when the record has a video.
    pub fn from_record(record: VideoRecord, signed: Option<SignedUrl>) -> Self {
        let (video_url, video_url_expires_at) = match signed {
            Some(s) => (Some(s.url), Some(s.expires_at)),
            None => (None, None),
        };

        VideoResponse {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            thumbnail_url: record.thumbnail_url,
            video_url,
            video_url_expires_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

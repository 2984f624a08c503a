pub mod health;
pub mod storage_get;
pub mod thumbnail_upload;
pub(crate) mod upload;
pub mod video_upload;
pub mod videos;

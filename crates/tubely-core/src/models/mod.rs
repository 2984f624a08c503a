//! Data models for the application
//!
//! `video` holds the persisted record and its read model; `media` holds the
//! transient values derived while ingesting a file.

mod media;
mod video;

// Re-export all models for convenient imports
pub use media::{MediaDimensions, Orientation};
pub use video::{CreateVideoParams, SignedUrl, VideoRecord, VideoResponse};

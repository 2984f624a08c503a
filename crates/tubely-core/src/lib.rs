//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! storage locator codec shared by every Tubely component.

pub mod config;
pub mod constants;
pub mod content_type;
pub mod error;
pub mod locator;
pub mod models;

// Re-export commonly used types
pub use config::{Config, MediaToolsConfig, StorageBackend, StorageConfig, UploadLimits};
pub use content_type::{resolve_thumbnail_extension, resolve_video_extension};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use locator::StorageLocator;
pub use models::{
    CreateVideoParams, MediaDimensions, Orientation, SignedUrl, VideoRecord, VideoResponse,
};

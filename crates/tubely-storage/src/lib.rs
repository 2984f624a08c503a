//! Tubely Storage Library
//!
//! This crate provides the object store abstraction used by the ingestion
//! pipeline and the signed-URL issuer that turns persisted locators into
//! short-lived retrieval URLs.
//!
//! Every operation takes an explicit bucket: the bucket travels inside the
//! persisted locator, so reads must not assume the bucket currently configured
//! for new uploads.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signed_url;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use factory::create_local_storage;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signed_url::SignedUrlIssuer;
pub use traits::{ObjectReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;

#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::StorageConfig;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = config.region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage =
                S3Storage::new(config.bucket.clone(), region, config.endpoint.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = create_local_storage(config).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

/// Build the concrete local backend. The API keeps a typed handle to it so it can
/// verify and serve the URLs it signs.
#[cfg(feature = "storage-local")]
pub async fn create_local_storage(config: &StorageConfig) -> StorageResult<LocalStorage> {
    let base_path = config
        .local_path
        .clone()
        .ok_or_else(|| StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string()))?;
    let base_url = config.local_base_url.clone().ok_or_else(|| {
        StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
    })?;
    let secret = config.signing_secret.clone().ok_or_else(|| {
        StorageError::ConfigError("STORAGE_SIGNING_SECRET not configured".to_string())
    })?;

    LocalStorage::new(base_path, base_url, secret.into_bytes()).await
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn local_config(path: std::path::PathBuf) -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::Local,
            bucket: "tubely".to_string(),
            region: None,
            endpoint: None,
            local_path: Some(path),
            local_base_url: Some("http://localhost:8091/storage".to_string()),
            signing_secret: Some("0123456789abcdef0123456789abcdef".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_local_storage() {
        let dir = tempdir().unwrap();
        let storage = create_storage(&local_config(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_local_storage_requires_secret() {
        let dir = tempdir().unwrap();
        let mut config = local_config(dir.path().to_path_buf());
        config.signing_secret = None;
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_s3_requires_region() {
        let dir = tempdir().unwrap();
        let mut config = local_config(dir.path().to_path_buf());
        config.backend = StorageBackend::S3;
        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}

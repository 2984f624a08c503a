use crate::traits::{ObjectReader, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const NONCE_LEN: usize = 16;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. Presigned URLs carry an expiry,
/// a random nonce and an HMAC-SHA256 signature:
/// `{base_url}/{bucket}/{key}?expires={unix}&nonce={hex}&signature={hex}`.
/// The API serves those URLs after [`LocalStorage::verify_signed_request`].
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tubely/objects")
    /// * `base_url` - Base URL the objects are served under (e.g., "http://localhost:8091/storage")
    /// * `signing_secret` - HMAC key for presigned URLs
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_secret: impl Into<Vec<u8>>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let signing_secret = signing_secret.into();
        if signing_secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Local storage signing secret must not be empty".to_string(),
            ));
        }

        Ok(LocalStorage {
            base_path,
            base_url,
            signing_secret,
        })
    }

    /// Convert bucket and key to a filesystem path, rejecting anything that could
    /// escape the base directory.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        for (label, value) in [("bucket", bucket), ("key", key)] {
            if value.is_empty() || value.starts_with('/') || value.contains('\\') {
                return Err(StorageError::InvalidKey(format!(
                    "{} contains invalid characters",
                    label
                )));
            }
            let escapes = Path::new(value)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if escapes {
                return Err(StorageError::InvalidKey(format!(
                    "{} contains path traversal",
                    label
                )));
            }
        }

        if bucket.contains('/') {
            return Err(StorageError::InvalidKey(
                "bucket must be a single path segment".to_string(),
            ));
        }

        Ok(self.base_path.join(bucket).join(key))
    }

    fn signature(&self, bucket: &str, key: &str, expires: u64, nonce: &str) -> StorageResult<Vec<u8>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.signing_secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(bucket.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(nonce.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Check a presigned request's signature and expiry.
    pub fn verify_signed_request(
        &self,
        bucket: &str,
        key: &str,
        expires: u64,
        nonce: &str,
        signature_hex: &str,
    ) -> StorageResult<()> {
        let provided = hex::decode(signature_hex)
            .map_err(|_| StorageError::InvalidSignature("signature is not hex".to_string()))?;
        let expected = self.signature(bucket, key, expires, nonce)?;

        if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            return Err(StorageError::InvalidSignature(
                "signature does not match".to_string(),
            ));
        }

        if unix_now() > expires {
            return Err(StorageError::InvalidSignature("URL has expired".to_string()));
        }

        Ok(())
    }

    /// Open a stored object for reading.
    pub async fn open_object(&self, bucket: &str, key: &str) -> StorageResult<(fs::File, u64)> {
        let path = self.object_path(bucket, key)?;
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("{}/{}", bucket, key)))
            }
            Err(e) => return Err(StorageError::DownloadFailed(e.to_string())),
        };
        let len = file.metadata().await?.len();
        Ok((file, len))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_object_stream(
        &self,
        bucket: &str,
        key: &str,
        _content_type: &str,
        _content_length: Option<u64>,
        mut reader: ObjectReader,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a sibling temp name so readers never see a half-written object
        let partial = path.with_extension("partial");
        let result = async {
            let mut file = fs::File::create(&partial).await?;
            let copied = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            fs::rename(&partial, &path).await?;
            Ok::<u64, std::io::Error>(copied)
        }
        .await;

        match result {
            Ok(size) => {
                tracing::info!(
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local stream upload successful"
                );
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                tracing::error!(error = %e, bucket = %bucket, key = %key, "Local stream upload failed");
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.object_path(bucket, key)?;

        let expires = unix_now() + expires_in.as_secs();
        let nonce = hex::encode(rand::random::<[u8; NONCE_LEN]>());
        let signature = hex::encode(self.signature(bucket, key, expires, &nonce)?);

        Ok(format!(
            "{}/{}/{}?expires={}&nonce={}&signature={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(bucket),
            encode_key(key),
            expires,
            nonce,
            signature
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Percent-encode each segment of `key`, keeping the `/` separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

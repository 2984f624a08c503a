//! Signed retrieval URLs
//!
//! Records persist a locator, never a URL. [`SignedUrlIssuer`] turns a locator
//! into a short-lived GET URL on every read, so nothing a client receives stays
//! valid for longer than [`SIGNED_URL_TTL`].

use crate::Storage;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::constants::SIGNED_URL_TTL;
use tubely_core::{AppError, SignedUrl, StorageLocator, VideoRecord, VideoResponse};

#[derive(Clone)]
pub struct SignedUrlIssuer {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl SignedUrlIssuer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            ttl: SIGNED_URL_TTL,
        }
    }

    /// Sign a GET for `locator`, valid for `expires_in` from now.
    ///
    /// Each call produces a new signature; nothing is cached.
    pub async fn issue(
        &self,
        locator: &StorageLocator,
        expires_in: Duration,
    ) -> Result<SignedUrl, AppError> {
        let issued_at = Utc::now();
        let url = self
            .storage
            .presigned_get_url(locator.bucket(), locator.key(), expires_in)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %locator.bucket(),
                    key = %locator.key(),
                    "Failed to sign retrieval URL"
                );
                AppError::SigningFailure(e.to_string())
            })?;

        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|e| AppError::SigningFailure(format!("invalid expiry: {}", e)))?;

        Ok(SignedUrl {
            url,
            expires_at: issued_at + ttl,
        })
    }

    /// Replace the record's locator with a signed URL.
    ///
    /// Records without an uploaded video pass through unchanged. A locator that
    /// does not decode fails the whole call; a raw URL is never handed back.
    pub async fn sign_record(&self, record: VideoRecord) -> Result<VideoResponse, AppError> {
        let Some(encoded) = record.video_url.as_deref() else {
            return Ok(VideoResponse::from_record(record, None));
        };

        let locator: StorageLocator = encoded.parse().map_err(|e| {
            tracing::error!(video_id = %record.id, error = %e, "Stored locator does not decode");
            e
        })?;
        let signed = self.issue(&locator, self.ttl).await?;

        Ok(VideoResponse::from_record(record, Some(signed)))
    }

    /// Sign every record in order, failing on the first that cannot be signed.
    pub async fn sign_records(
        &self,
        records: Vec<VideoRecord>,
    ) -> Result<Vec<VideoResponse>, AppError> {
        let mut responses = Vec::with_capacity(records.len());
        for record in records {
            responses.push(self.sign_record(record).await?);
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjectReader, StorageBackend, StorageError, StorageResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tubely_core::CreateVideoParams;
    use uuid::Uuid;

    /// Signs with a counter so every URL is distinct.
    #[derive(Default)]
    struct CountingSigner {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Storage for CountingSigner {
        async fn put_object_stream(
            &self,
            _bucket: &str,
            _key: &str,
            _content_type: &str,
            _content_length: Option<u64>,
            _reader: ObjectReader,
        ) -> StorageResult<()> {
            Ok(())
        }

        async fn presigned_get_url(
            &self,
            bucket: &str,
            key: &str,
            expires_in: Duration,
        ) -> StorageResult<String> {
            if self.fail {
                return Err(StorageError::SigningFailed("no credentials".to_string()));
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!(
                "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature={:04}",
                bucket,
                key,
                expires_in.as_secs(),
                n
            ))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::S3
        }
    }

    fn record_with(video_url: Option<&str>) -> VideoRecord {
        let mut record = VideoRecord::new(CreateVideoParams {
            user_id: Uuid::new_v4(),
            title: "Boots".to_string(),
            description: String::new(),
        });
        record.video_url = video_url.map(String::from);
        record
    }

    #[tokio::test]
    async fn test_issue_twice_gives_distinct_urls_for_same_object() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner::default()));
        let locator = StorageLocator::new("tubely", "portrait/a.mp4").unwrap();

        let first = issuer.issue(&locator, SIGNED_URL_TTL).await.unwrap();
        let second = issuer.issue(&locator, SIGNED_URL_TTL).await.unwrap();
        assert_ne!(first.url, second.url);

        for signed in [first, second] {
            let url = url::Url::parse(&signed.url).unwrap();
            assert_eq!(url.host_str(), Some("tubely.s3.amazonaws.com"));
            assert_eq!(url.path(), "/portrait/a.mp4");
        }
    }

    #[tokio::test]
    async fn test_issue_sets_expiry() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner::default()));
        let locator = StorageLocator::new("tubely", "portrait/a.mp4").unwrap();

        let before = Utc::now();
        let signed = issuer.issue(&locator, SIGNED_URL_TTL).await.unwrap();
        let after = Utc::now();

        let ttl = chrono::Duration::seconds(300);
        assert!(signed.expires_at >= before + ttl);
        assert!(signed.expires_at <= after + ttl);
        assert!(signed.url.contains("X-Amz-Expires=300"));
    }

    #[tokio::test]
    async fn test_issue_maps_backend_error() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner {
            fail: true,
            ..Default::default()
        }));
        let locator = StorageLocator::new("tubely", "portrait/a.mp4").unwrap();

        let err = issuer.issue(&locator, SIGNED_URL_TTL).await.unwrap_err();
        assert!(matches!(err, AppError::SigningFailure(_)));
    }

    #[tokio::test]
    async fn test_sign_record_without_video_passes_through() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner::default()));
        let response = issuer.sign_record(record_with(None)).await.unwrap();
        assert!(response.video_url.is_none());
        assert!(response.video_url_expires_at.is_none());
    }

    #[tokio::test]
    async fn test_sign_record_replaces_locator() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner::default()));
        let response = issuer
            .sign_record(record_with(Some("archive,landscape/b.mp4")))
            .await
            .unwrap();

        let url = response.video_url.unwrap();
        assert!(url.starts_with("https://archive.s3.amazonaws.com/landscape/b.mp4?"));
        assert!(response.video_url_expires_at.is_some());
    }

    #[tokio::test]
    async fn test_sign_record_rejects_malformed_locator() {
        let issuer = SignedUrlIssuer::new(Arc::new(CountingSigner::default()));
        for stored in ["tubely", "a,b,c", "https://example.com/a.mp4"] {
            let err = issuer
                .sign_record(record_with(Some(stored)))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::MalformedLocator(_)));
        }
    }
}

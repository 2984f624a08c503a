//! Storage locator codec
//!
//! A video record never stores a URL. It stores `"<bucket>,<key>"`, which is
//! decoded and re-signed on every read, so URL shape, region and signing scheme
//! can change without migrating stored records.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::LOCATOR_DELIMITER;
use crate::error::AppError;

/// Join a bucket and key into the persisted locator string.
pub fn encode(bucket: &str, key: &str) -> String {
    format!("{}{}{}", bucket, LOCATOR_DELIMITER, key)
}

/// Split a persisted locator back into `(bucket, key)`.
///
/// Fails unless the string contains exactly one delimiter.
pub fn decode(encoded: &str) -> Result<(String, String), AppError> {
    let parts: Vec<&str> = encoded.split(LOCATOR_DELIMITER).collect();
    if parts.len() != 2 {
        return Err(AppError::MalformedLocator(format!(
            "expected 2 parts but found {}",
            parts.len()
        )));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Physical location of a stored video.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    bucket: String,
    key: String,
}

impl StorageLocator {
    /// Build a locator, rejecting fields that would not survive a round trip.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, AppError> {
        let bucket = bucket.into();
        let key = key.into();

        if bucket.is_empty() || key.is_empty() {
            return Err(AppError::MalformedLocator(
                "bucket and key must be non-empty".to_string(),
            ));
        }
        if bucket.contains(LOCATOR_DELIMITER) || key.contains(LOCATOR_DELIMITER) {
            return Err(AppError::MalformedLocator(format!(
                "bucket and key must not contain '{}'",
                LOCATOR_DELIMITER
            )));
        }

        Ok(Self { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn encode(&self) -> String {
        encode(&self.bucket, &self.key)
    }
}

impl Display for StorageLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for StorageLocator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, key) = decode(s)?;
        StorageLocator::new(bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_inverts_encode() {
        let pairs = [
            ("tubely-videos", "portrait/0b1c.mp4"),
            ("b", "k"),
            ("my.bucket-01", "other/nested/path/file.mp4"),
            ("tubely", "landscape/with space.mp4"),
        ];

        for (bucket, key) in pairs {
            let decoded = decode(&encode(bucket, key)).unwrap();
            assert_eq!(decoded, (bucket.to_string(), key.to_string()));
        }
    }

    #[test]
    fn test_decode_rejects_missing_delimiter() {
        let err = decode("tubely-videos").unwrap_err();
        assert!(matches!(err, AppError::MalformedLocator(_)));
    }

    #[test]
    fn test_decode_rejects_extra_delimiters() {
        for input in ["a,b,c", ",,", "bucket,key,", "a,b,c,d"] {
            assert!(
                matches!(decode(input), Err(AppError::MalformedLocator(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_decode_rejects_raw_url() {
        // Older records may hold a plain URL; it has no delimiter
        let err = decode("https://tubely.s3.us-east-1.amazonaws.com/portrait/a.mp4").unwrap_err();
        assert!(matches!(err, AppError::MalformedLocator(_)));
    }

    #[test]
    fn test_locator_rejects_delimiter_in_fields() {
        assert!(StorageLocator::new("a,b", "key").is_err());
        assert!(StorageLocator::new("bucket", "k,ey").is_err());
        assert!(StorageLocator::new("", "key").is_err());
    }

    #[test]
    fn test_locator_parse_and_display() {
        let locator: StorageLocator = "tubely,portrait/abc.mp4".parse().unwrap();
        assert_eq!(locator.bucket(), "tubely");
        assert_eq!(locator.key(), "portrait/abc.mp4");
        assert_eq!(locator.to_string(), "tubely,portrait/abc.mp4");
    }
}

use std::time::Duration;

/// Lifetime of every signed retrieval URL handed to clients.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(5 * 60);

/// Suffix appended to the raw upload path for the fast-start copy.
pub const FAST_START_SUFFIX: &str = ".processing";

/// Separator between bucket and key in a persisted locator.
pub const LOCATOR_DELIMITER: char = ',';

/// The only video container accepted for ingestion.
pub const SUPPORTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

pub const DEFAULT_SERVER_PORT: u16 = 8091;
pub const DEFAULT_MAX_VIDEO_SIZE_MB: usize = 1024;
pub const DEFAULT_MAX_THUMBNAIL_SIZE_MB: usize = 10;

/// Header carrying the caller's user id, set by the authenticating gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

//! Error types module
//!
//! Every failure a request can hit is a variant of [`AppError`]. The ingestion
//! pipeline stages each own one variant (`ProbeFailure`, `TranscodeFailure`,
//! `UploadFailure`, `PersistFailure`) so callers can tell exactly where an upload
//! stopped; the remaining variants cover locator decoding, signing and the thin
//! HTTP surface.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues or bad client media
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PROBE_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Media probe failed: {0}")]
    ProbeFailure(String),

    #[error("Fast-start transcode failed: {0}")]
    TranscodeFailure(String),

    #[error("Object store upload failed: {0}")]
    UploadFailure(String),

    #[error("Failed to persist video record: {0}")]
    PersistFailure(String),

    #[error("Malformed storage locator: {0}")]
    MalformedLocator(String),

    #[error("Failed to sign retrieval URL: {0}")]
    SigningFailure(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::ProbeFailure(_) => (422, "PROBE_FAILURE", false, LogLevel::Warn),
        AppError::TranscodeFailure(_) => (500, "TRANSCODE_FAILURE", false, LogLevel::Error),
        AppError::UploadFailure(_) => (502, "UPLOAD_FAILURE", true, LogLevel::Error),
        AppError::PersistFailure(_) => (500, "PERSIST_FAILURE", true, LogLevel::Error),
        AppError::MalformedLocator(_) => (500, "MALFORMED_LOCATOR", false, LogLevel::Error),
        AppError::SigningFailure(_) => (500, "SIGNING_FAILURE", true, LogLevel::Error),
        AppError::UnsupportedMediaType(_) => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::ProbeFailure(_) => "ProbeFailure",
            AppError::TranscodeFailure(_) => "TranscodeFailure",
            AppError::UploadFailure(_) => "UploadFailure",
            AppError::PersistFailure(_) => "PersistFailure",
            AppError::MalformedLocator(_) => "MalformedLocator",
            AppError::SigningFailure(_) => "SigningFailure",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::ProbeFailure(_) => {
                "Could not read video dimensions from the uploaded file".to_string()
            }
            AppError::TranscodeFailure(_) => "Failed to prepare video for streaming".to_string(),
            AppError::UploadFailure(_) => "Failed to store video".to_string(),
            AppError::PersistFailure(_) => "Failed to save video".to_string(),
            AppError::MalformedLocator(_) => "Stored video reference is invalid".to_string(),
            AppError::SigningFailure(_) => "Failed to generate video URL".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
            AppError::UnsupportedMediaType(msg)
            | AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
        }
    }
}

//! Tubely Processing Library
//!
//! Turns an uploaded video into a stored, playback-ready object:
//! - [`probe`]: read stream dimensions with ffprobe
//! - [`orientation`]: bucket the aspect ratio into a key prefix
//! - [`faststart`]: remux with ffmpeg so the index atom comes first
//! - [`pipeline`]: run the stages in order and record the result
//!
//! [`thumbnail`] handles the much simpler thumbnail upload.

pub mod faststart;
pub mod orientation;
pub mod pipeline;
pub mod probe;
pub mod thumbnail;

pub use faststart::{fast_start_output_path, FastStartTranscoder, FfmpegFastStart};
pub use orientation::{classify, classify_ratio};
pub use pipeline::{IngestOutcome, IngestRequest, IngestionPipeline, IngestionStage};
pub use probe::{parse_probe_output, FfprobeProbe, MediaProbe};
pub use thumbnail::ThumbnailStore;

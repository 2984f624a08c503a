use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Pixel size of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

impl MediaDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `height / width`, or `None` for a zero width.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 {
            None
        } else {
            Some(f64::from(self.height) / f64::from(self.width))
        }
    }
}

/// Coarse aspect-ratio bucket used to namespace storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Other,
}

impl Orientation {
    /// Storage key prefix for this orientation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Other => "other",
        }
    }

    /// Recover the orientation from a key produced by the ingestion pipeline.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.split('/').next()? {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            "other" => Some(Orientation::Other),
            _ => None,
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let ratio = MediaDimensions::new(1080, 1920).aspect_ratio().unwrap();
        assert!((ratio - 1.7777).abs() < 0.001);
        assert_eq!(MediaDimensions::new(0, 1080).aspect_ratio(), None);
    }

    #[test]
    fn test_orientation_from_key() {
        assert_eq!(
            Orientation::from_key("portrait/abc.mp4"),
            Some(Orientation::Portrait)
        );
        assert_eq!(
            Orientation::from_key("landscape/abc.mp4"),
            Some(Orientation::Landscape)
        );
        assert_eq!(Orientation::from_key("other/abc.mp4"), Some(Orientation::Other));
        assert_eq!(Orientation::from_key("media/abc.mp4"), None);
    }

    #[test]
    fn test_orientation_serializes_lowercase() {
        let json = serde_json::to_string(&Orientation::Landscape).unwrap();
        assert_eq!(json, "\"landscape\"");
    }
}

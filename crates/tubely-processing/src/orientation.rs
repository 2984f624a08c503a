//! Aspect-ratio classification

use tubely_core::{MediaDimensions, Orientation};

const PORTRAIT_RANGE: (f64, f64) = (1.70, 1.80);
const LANDSCAPE_RANGE: (f64, f64) = (0.55, 0.57);

/// Classify a `height / width` ratio. Both bands are inclusive.
pub fn classify_ratio(ratio: f64) -> Orientation {
    if (PORTRAIT_RANGE.0..=PORTRAIT_RANGE.1).contains(&ratio) {
        Orientation::Portrait
    } else if (LANDSCAPE_RANGE.0..=LANDSCAPE_RANGE.1).contains(&ratio) {
        Orientation::Landscape
    } else {
        Orientation::Other
    }
}

/// Classify probed dimensions. A zero width is `Other`.
pub fn classify(dimensions: MediaDimensions) -> Orientation {
    dimensions
        .aspect_ratio()
        .map(classify_ratio)
        .unwrap_or(Orientation::Other)
}

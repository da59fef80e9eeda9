//! Parsing of the hOCR `title` property string.
//!
//! Word elements carry their geometry and confidence in a semicolon separated
//! property list, e.g. `bbox 299 432 422 465; x_wconf 97.01`. Producers disagree on
//! the details, so extraction is lenient: every value that is missing or does not
//! parse is left at zero and nothing here returns an error.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::BoundingBox;

// http://kba.cloud/hocr-spec/1.2/#x_wconf - e.g. `x_wconf 97`
static CONFIDENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"x_wconf (\d*\.?\d*)").expect("Confidence regex pattern is valid and should compile"));
// http://kba.cloud/hocr-spec/1.2/#bbox - e.g. `bbox 607 552 733 587`
static BOUNDING_BOX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"bbox (\d*) (\d*) (\d*) (\d*)").expect("Bounding box regex pattern is valid and should compile")
});

/// Extract the `x_wconf` value, or `0.0` when absent, unparsable or out of `f64` range.
pub fn confidence_from_title(title: &str) -> f64 {
    CONFIDENCE_PATTERN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|confidence| confidence.is_finite())
        .unwrap_or(0.0)
}

/// Extract the `bbox` coordinates.
///
/// Captures map in serialized order: x0, y0, x1, y1. Each coordinate is parsed on
/// its own, so one bad value does not discard the others.
pub fn bounding_box_from_title(title: &str) -> BoundingBox {
    let Some(caps) = BOUNDING_BOX_PATTERN.captures(title) else {
        return BoundingBox::default();
    };

    let coordinate = |index: usize| {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    BoundingBox {
        x0: coordinate(1),
        y0: coordinate(2),
        x1: coordinate(3),
        y1: coordinate(4),
    }
}

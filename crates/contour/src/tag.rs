//! Clipping projected contours to the tile and tagging major lines.

use dem_common::{BoundingBox, ContourError, ContourResult, LonLat, PolylineSet};
use serde::{Deserialize, Serialize};

use crate::clip::clip_polylines;
use crate::contour::ProjectedContour;

/// Default remainder tolerance when testing for a bold multiple.
pub const DEFAULT_MAJOR_TOLERANCE: f64 = 1e-9;

/// One output line feature: every clipped line of a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedFeature {
    /// Elevation of the level in meters
    pub value: f64,
    /// True when `value` is a multiple of the bold interval
    pub major: bool,
    /// Clipped lines, in tracing order
    pub lines: PolylineSet<LonLat>,
}

impl TaggedFeature {
    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

/// True when `value` is a multiple of `bold_interval` up to `tolerance`.
///
/// Remainders just below `bold_interval` count too, so a level that
/// accumulated rounding error on either side still qualifies.
pub fn is_major(value: f64, bold_interval: f64, tolerance: f64) -> bool {
    let r = value.rem_euclid(bold_interval);
    r < tolerance || bold_interval - r < tolerance
}

/// Clips contours to a box and tags them as major or minor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tagger {
    bold_interval: f64,
    tolerance: f64,
}

impl Tagger {
    pub fn new(bold_interval: f64) -> ContourResult<Self> {
        if !(bold_interval.is_finite() && bold_interval > 0.0) {
            return Err(ContourError::invalid_argument(format!(
                "bold_interval must be a positive number, got {}",
                bold_interval
            )));
        }
        Ok(Self {
            bold_interval,
            tolerance: DEFAULT_MAJOR_TOLERANCE,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn bold_interval(&self) -> f64 {
        self.bold_interval
    }

    pub fn is_major(&self, value: f64) -> bool {
        is_major(value, self.bold_interval, self.tolerance)
    }

    /// Clip one contour; `None` when nothing of it falls inside `bbox`.
    pub fn tag(&self, contour: &ProjectedContour, bbox: &BoundingBox) -> Option<TaggedFeature> {
        let lines = clip_polylines(&contour.rings, bbox);
        if lines.is_empty() {
            return None;
        }
        Some(TaggedFeature {
            value: contour.value,
            major: self.is_major(contour.value),
            lines,
        })
    }

    /// Clip and tag a set of contours, keeping their order.
    pub fn tag_all(&self, contours: &[ProjectedContour], bbox: &BoundingBox) -> Vec<TaggedFeature> {
        contours.iter().filter_map(|c| self.tag(c, bbox)).collect()
    }
}

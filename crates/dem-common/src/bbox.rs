//! Geographic bounding box used to clip contour lines.

use crate::geometry::LonLat;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in geographic coordinates (degrees).
///
/// Edges are inclusive: a point lying exactly on an edge is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from edge coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Create a bounding box from its south-west and north-east corners.
    pub fn from_corners(sw: LonLat, ne: LonLat) -> Self {
        Self::new(sw.lon, sw.lat, ne.lon, ne.lat)
    }

    /// Smallest box enclosing all points, or `None` for an empty slice.
    pub fn enclosing(points: &[LonLat]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first.lon, first.lat, first.lon, first.lat);
        Some(points[1..].iter().fold(init, |b, p| Self {
            min_lon: b.min_lon.min(p.lon),
            min_lat: b.min_lat.min(p.lat),
            max_lon: b.max_lon.max(p.lon),
            max_lat: b.max_lat.max(p.lat),
        }))
    }

    pub fn sw(&self) -> LonLat {
        LonLat::new(self.min_lon, self.min_lat)
    }

    pub fn ne(&self) -> LonLat {
        LonLat::new(self.max_lon, self.max_lat)
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// A box is valid when both spans are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.width().is_finite()
            && self.height().is_finite()
            && self.width() >= 0.0
            && self.height() >= 0.0
    }

    /// Check if this bbox touches or overlaps another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// Check if `other` lies entirely within this bbox.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.min_lon >= self.min_lon
            && other.max_lon <= self.max_lon
            && other.min_lat >= self.min_lat
            && other.max_lat <= self.max_lat
    }

    /// Check if a point is contained within this bbox.
    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min_lon
            && p.lon <= self.max_lon
            && p.lat >= self.min_lat
            && p.lat <= self.max_lat
    }
}

//! Typed geometry shared by the tracer, projector and clipper.
//!
//! Transforms are written once per level (point, polyline, polyline set)
//! instead of walking nested arrays of unknown depth.

use serde::{Deserialize, Serialize};

/// A point in mosaic pixel space.
///
/// Integer coordinates sit on sample centers; `x` grows to the right and
/// `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geographic coordinate in degrees (WGS84 longitude/latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// GeoJSON position order: `[lon, lat]`.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// An ordered sequence of points.
pub type Polyline<P> = Vec<P>;

/// An ordered sequence of polylines.
pub type PolylineSet<P> = Vec<Polyline<P>>;

/// True when the polyline ends where it starts.
pub fn is_closed<P: PartialEq>(line: &[P]) -> bool {
    line.len() > 2 && line.first() == line.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonlat_array_order() {
        let p = LonLat::new(139.5, 36.2);
        assert_eq!(p.to_array(), [139.5, 36.2]);
        assert_eq!(LonLat::from([139.5, 36.2]), p);
    }

    #[test]
    fn test_is_closed() {
        let a = PixelPoint::new(0.0, 0.0);
        let b = PixelPoint::new(1.0, 0.0);
        let c = PixelPoint::new(1.0, 1.0);
        assert!(is_closed(&[a, b, c, a]));
        assert!(!is_closed(&[a, b, c]));
        // A back-and-forth pair is not a ring
        assert!(!is_closed(&[a, a]));
    }
}

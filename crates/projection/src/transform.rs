//! Element-wise projection of typed geometry.
//!
//! `Project` is implemented for a single point and lifted to sequences, so
//! a polyline (`Vec<PixelPoint>`) and a polyline set
//! (`Vec<Vec<PixelPoint>>`) project to the same shape in lon/lat.

use dem_common::{LonLat, PixelPoint};

use crate::web_mercator::TileProjector;

/// Geometry that can be mapped from mosaic pixels to lon/lat.
pub trait Project {
    type Output;

    fn project(&self, projector: &TileProjector) -> Self::Output;
}

impl Project for PixelPoint {
    type Output = LonLat;

    fn project(&self, projector: &TileProjector) -> LonLat {
        projector.pixel_to_lonlat(*self)
    }
}

impl<T: Project> Project for [T] {
    type Output = Vec<T::Output>;

    fn project(&self, projector: &TileProjector) -> Self::Output {
        self.iter().map(|item| item.project(projector)).collect()
    }
}

impl<T: Project> Project for Vec<T> {
    type Output = Vec<T::Output>;

    fn project(&self, projector: &TileProjector) -> Self::Output {
        self.as_slice().project(projector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dem_common::{Polyline, PolylineSet, TileCoord};

    #[test]
    fn test_shapes_are_preserved() {
        let proj = TileProjector::new(TileCoord::new(10, 900, 400)).unwrap();

        let line: Polyline<PixelPoint> =
            vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(10.0, 5.0)];
        let set: PolylineSet<PixelPoint> = vec![line.clone(), vec![], line.clone()];

        let projected_line = line.project(&proj);
        assert_eq!(projected_line.len(), 2);

        let projected_set = set.project(&proj);
        assert_eq!(projected_set.len(), 3);
        assert!(projected_set[1].is_empty());
        assert_eq!(projected_set[0], projected_line);
        assert_eq!(projected_set[0][1], PixelPoint::new(10.0, 5.0).project(&proj));
    }
}

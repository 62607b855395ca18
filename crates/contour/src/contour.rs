//! Contour line (isoline) tracing using the marching squares algorithm.
//!
//! Each 2x2 cell of samples is classified against the level into one of 16
//! cases. A lookup table gives the cell edges the line crosses, oriented so
//! that samples at or above the level are always on the same side of the
//! segment. Crossing points are identified by the grid edge they lie on, so
//! two neighboring cells produce the exact same point and segments join by
//! key lookup rather than by distance.

use std::collections::{HashMap, VecDeque};

use dem_common::{ContourError, ContourResult, LonLat, PixelPoint, PolylineSet};
use projection::{Project, TileProjector};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decode::ElevationGrid;

/// A grid edge between two adjacent samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    /// Between `(x, y)` and `(x + 1, y)`
    Horizontal(usize, usize),
    /// Between `(x, y)` and `(x, y + 1)`
    Vertical(usize, usize),
}

impl EdgeKey {
    /// The two samples joined by this edge.
    fn samples(self) -> ((usize, usize), (usize, usize)) {
        match self {
            EdgeKey::Horizontal(x, y) => ((x, y), (x + 1, y)),
            EdgeKey::Vertical(x, y) => ((x, y), (x, y + 1)),
        }
    }
}

/// Side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Grid edge of this side for the cell whose top-left sample is `(x, y)`.
    fn edge(self, x: usize, y: usize) -> EdgeKey {
        match self {
            Side::Top => EdgeKey::Horizontal(x, y),
            Side::Right => EdgeKey::Vertical(x + 1, y),
            Side::Bottom => EdgeKey::Horizontal(x, y + 1),
            Side::Left => EdgeKey::Vertical(x, y),
        }
    }
}

use Side::{Bottom, Left, Right, Top};

type CellCase = &'static [(Side, Side)];

/// Oriented segments per case, indexed by `tl | tr << 1 | br << 2 | bl << 3`
/// where a bit is set when the corner is at or above the level.
///
/// Walking a segment from start to end, the "above" corners are on the
/// side of the normal `(dy, -dx)`. Saddles (5, 10) keep the two above
/// corners apart here; see [`SADDLE_JOINED`].
const CASES: [CellCase; 16] = [
    &[],                             // 0
    &[(Left, Top)],                  // 1: tl
    &[(Top, Right)],                 // 2: tr
    &[(Left, Right)],                // 3: tl tr
    &[(Right, Bottom)],              // 4: br
    &[(Left, Top), (Right, Bottom)], // 5: tl br
    &[(Top, Bottom)],                // 6: tr br
    &[(Left, Bottom)],               // 7: tl tr br
    &[(Bottom, Left)],               // 8: bl
    &[(Bottom, Top)],                // 9: tl bl
    &[(Top, Right), (Bottom, Left)], // 10: tr bl
    &[(Bottom, Right)],              // 11: tl tr bl
    &[(Right, Left)],                // 12: br bl
    &[(Right, Top)],                 // 13: tl br bl
    &[(Top, Left)],                  // 14: tr br bl
    &[],                             // 15
];

/// Saddle cases when the cell center is at or above the level, joining the
/// two above corners through the middle of the cell.
const SADDLE_JOINED: [CellCase; 2] = [
    &[(Right, Top), (Left, Bottom)], // 5
    &[(Top, Left), (Bottom, Right)], // 10
];

/// Segments for one cell given its case index and mean corner value.
fn cell_segments(case: usize, center_above: bool) -> CellCase {
    match (case, center_above) {
        (5, true) => SADDLE_JOINED[0],
        (10, true) => SADDLE_JOINED[1],
        _ => CASES[case],
    }
}

/// An oriented segment between two edge crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSegment {
    pub from: EdgeKey,
    pub to: EdgeKey,
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

/// All rings traced at one level, in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub value: f64,
    pub rings: PolylineSet<PixelPoint>,
}

impl Contour {
    /// Number of rings that close on themselves.
    pub fn closed_count(&self) -> usize {
        self.rings
            .iter()
            .filter(|r| dem_common::geometry::is_closed(r))
            .count()
    }

    /// Total number of points across all rings.
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Map every ring to lon/lat.
    pub fn project(&self, projector: &TileProjector) -> ProjectedContour {
        ProjectedContour {
            value: self.value,
            rings: self.rings.project(projector),
        }
    }
}

/// A contour whose points are longitude/latitude pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedContour {
    pub value: f64,
    pub rings: PolylineSet<LonLat>,
}

/// Tracer state for one grid and one level.
struct LevelTracer<'a> {
    grid: &'a ElevationGrid,
    level: f64,
}

impl<'a> LevelTracer<'a> {
    fn new(grid: &'a ElevationGrid, level: f64) -> Self {
        Self { grid, level }
    }

    #[inline]
    fn above(&self, x: usize, y: usize) -> bool {
        self.grid.value(x, y) >= self.level
    }

    /// Crossing point on an edge by linear interpolation.
    fn crossing(&self, key: EdgeKey) -> PixelPoint {
        let ((x0, y0), (x1, y1)) = key.samples();
        let v0 = self.grid.value(x0, y0);
        let v1 = self.grid.value(x1, y1);
        let t = if v1 == v0 {
            0.5
        } else {
            (self.level - v0) / (v1 - v0)
        };
        PixelPoint::new(
            x0 as f64 + t * (x1 as f64 - x0 as f64),
            y0 as f64 + t * (y1 as f64 - y0 as f64),
        )
    }

    fn on_boundary(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.grid.width() || y + 1 == self.grid.height()
    }

    /// True when an edge touches a no-data sample on the grid border.
    fn touches_border_gap(&self, key: EdgeKey) -> bool {
        let ((x0, y0), (x1, y1)) = key.samples();
        (self.grid.is_no_data(x0, y0) && self.on_boundary(x0, y0))
            || (self.grid.is_no_data(x1, y1) && self.on_boundary(x1, y1))
    }

    /// Classify every cell and collect its oriented segments, row by row.
    fn march(&self) -> Vec<CellSegment> {
        let (width, height) = (self.grid.width(), self.grid.height());
        if width < 2 || height < 2 {
            return vec![];
        }

        let mut segments = Vec::new();
        for y in 0..(height - 1) {
            for x in 0..(width - 1) {
                let mut case = 0;
                if self.above(x, y) {
                    case |= 1;
                }
                if self.above(x + 1, y) {
                    case |= 2;
                }
                if self.above(x + 1, y + 1) {
                    case |= 4;
                }
                if self.above(x, y + 1) {
                    case |= 8;
                }
                if case == 0 || case == 15 {
                    continue;
                }

                let center_above = if case == 5 || case == 10 {
                    let sum = self.grid.value(x, y)
                        + self.grid.value(x + 1, y)
                        + self.grid.value(x + 1, y + 1)
                        + self.grid.value(x, y + 1);
                    sum / 4.0 >= self.level
                } else {
                    false
                };

                for &(from, to) in cell_segments(case, center_above) {
                    let seg = CellSegment {
                        from: from.edge(x, y),
                        to: to.edge(x, y),
                    };
                    if self.touches_border_gap(seg.from) || self.touches_border_gap(seg.to) {
                        continue;
                    }
                    segments.push(seg);
                }
            }
        }
        segments
    }
}

/// Joins oriented segments into polylines by matching shared edge keys.
///
/// Rings are emitted in the order they close; fragments left open at the
/// end (lines that run into the grid border or a gap) follow in the order
/// they were started. A closed ring repeats its first key at the end.
pub fn stitch(segments: &[CellSegment]) -> ContourResult<Vec<Vec<EdgeKey>>> {
    let mut fragments: Vec<Option<VecDeque<EdgeKey>>> = Vec::new();
    let mut by_start: HashMap<EdgeKey, usize> = HashMap::new();
    let mut by_end: HashMap<EdgeKey, usize> = HashMap::new();
    let mut closed = Vec::new();

    for seg in segments {
        let f = by_end.remove(&seg.from);
        let g = by_start.remove(&seg.to);

        match (f, g) {
            (Some(f), Some(g)) if f == g => {
                let mut ring = take_fragment(&mut fragments, f)?;
                ring.push_back(seg.to);
                closed.push(Vec::from(ring));
            }
            (Some(f), Some(g)) => {
                let tail = take_fragment(&mut fragments, g)?;
                let end = *tail
                    .back()
                    .ok_or_else(|| ContourError::degenerate("empty fragment"))?;
                let head = fragment_mut(&mut fragments, f)?;
                head.extend(tail);
                by_end.insert(end, f);
            }
            (Some(f), None) => {
                fragment_mut(&mut fragments, f)?.push_back(seg.to);
                insert_unique(&mut by_end, seg.to, f)?;
            }
            (None, Some(g)) => {
                fragment_mut(&mut fragments, g)?.push_front(seg.from);
                insert_unique(&mut by_start, seg.from, g)?;
            }
            (None, None) => {
                let idx = fragments.len();
                fragments.push(Some(VecDeque::from(vec![seg.from, seg.to])));
                insert_unique(&mut by_start, seg.from, idx)?;
                insert_unique(&mut by_end, seg.to, idx)?;
            }
        }
    }

    let open = fragments.into_iter().flatten().map(Vec::from);
    Ok(closed.into_iter().chain(open).collect())
}

fn take_fragment(
    fragments: &mut [Option<VecDeque<EdgeKey>>],
    idx: usize,
) -> ContourResult<VecDeque<EdgeKey>> {
    fragments
        .get_mut(idx)
        .and_then(Option::take)
        .ok_or_else(|| ContourError::degenerate(format!("fragment {} already consumed", idx)))
}

fn fragment_mut(
    fragments: &mut [Option<VecDeque<EdgeKey>>],
    idx: usize,
) -> ContourResult<&mut VecDeque<EdgeKey>> {
    fragments
        .get_mut(idx)
        .and_then(Option::as_mut)
        .ok_or_else(|| ContourError::degenerate(format!("fragment {} already consumed", idx)))
}

fn insert_unique(map: &mut HashMap<EdgeKey, usize>, key: EdgeKey, idx: usize) -> ContourResult<()> {
    if map.insert(key, idx).is_some() {
        return Err(ContourError::degenerate(format!(
            "two fragments share endpoint {:?}",
            key
        )));
    }
    Ok(())
}

/// Oriented segments for one level, with interpolated end points.
pub fn march_squares(grid: &ElevationGrid, level: f64) -> Vec<Segment> {
    let tracer = LevelTracer::new(grid, level);
    tracer
        .march()
        .into_iter()
        .map(|s| Segment {
            start: tracer.crossing(s.from),
            end: tracer.crossing(s.to),
        })
        .collect()
}

/// Trace every ring of one level.
pub fn trace_level(grid: &ElevationGrid, level: f64) -> ContourResult<Contour> {
    let tracer = LevelTracer::new(grid, level);
    let segments = tracer.march();
    let paths = stitch(&segments)?;

    let rings: PolylineSet<PixelPoint> = paths
        .iter()
        .map(|keys| keys.iter().map(|&k| tracer.crossing(k)).collect())
        .collect();

    trace!(
        level = level,
        segments = segments.len(),
        rings = rings.len(),
        "Traced contour level"
    );

    Ok(Contour { value: level, rings })
}

/// Trace one contour per threshold, in threshold order.
pub fn trace_contours(grid: &ElevationGrid, thresholds: &[f64]) -> ContourResult<Vec<Contour>> {
    thresholds.iter().map(|&t| trace_level(grid, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize, values: Vec<f64>) -> ElevationGrid {
        ElevationGrid::from_values(width, height, values).unwrap()
    }

    #[test]
    fn test_case_table_orientation() {
        // For every non-saddle case, the normal (dy, -dx) of each segment
        // must point at an above corner.
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mid = |s: Side| match s {
            Side::Top => (0.5, 0.0),
            Side::Right => (1.0, 0.5),
            Side::Bottom => (0.5, 1.0),
            Side::Left => (0.0, 0.5),
        };

        for case in 1..15usize {
            for &(from, to) in CASES[case] {
                let (ax, ay) = mid(from);
                let (bx, by) = mid(to);
                let (nx, ny) = (by - ay, -(bx - ax));
                let cx = (ax + bx) / 2.0;
                let cy = (ay + by) / 2.0;
                let hits_above = (0..4).any(|bit| {
                    let (px, py) = corners[bit];
                    case & (1 << bit) != 0 && (px - cx) * nx + (py - cy) * ny > 0.0
                });
                assert!(hits_above, "case {} segment {:?}->{:?}", case, from, to);
            }
        }
    }

    #[test]
    fn test_crossing_interpolates() {
        let g = grid(2, 2, vec![0.0, 10.0, 0.0, 10.0]);
        let tracer = LevelTracer::new(&g, 2.5);
        let p = tracer.crossing(EdgeKey::Horizontal(0, 0));
        assert!((p.x - 0.25).abs() < 1e-12);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_crossing_equal_values_uses_midpoint() {
        let g = grid(2, 2, vec![3.0, 3.0, 3.0, 3.0]);
        let tracer = LevelTracer::new(&g, 3.0);
        let p = tracer.crossing(EdgeKey::Vertical(1, 0));
        assert_eq!(p, PixelPoint::new(1.0, 0.5));
    }

    #[test]
    fn test_stitch_closes_ring() {
        let a = EdgeKey::Horizontal(0, 0);
        let b = EdgeKey::Vertical(1, 0);
        let c = EdgeKey::Horizontal(0, 1);
        let segs = [
            CellSegment { from: a, to: b },
            CellSegment { from: c, to: a },
            CellSegment { from: b, to: c },
        ];
        let paths = stitch(&segs).unwrap();
        assert_eq!(paths, vec![vec![c, a, b, c]]);
    }

    #[test]
    fn test_stitch_joins_two_fragments() {
        let k: Vec<EdgeKey> = (0..4).map(|i| EdgeKey::Vertical(i, 0)).collect();
        let segs = [
            CellSegment { from: k[0], to: k[1] },
            CellSegment { from: k[2], to: k[3] },
            CellSegment { from: k[1], to: k[2] },
        ];
        let paths = stitch(&segs).unwrap();
        assert_eq!(paths, vec![k.clone()]);
    }

    #[test]
    fn test_stitch_rejects_shared_endpoint() {
        let a = EdgeKey::Horizontal(0, 0);
        let b = EdgeKey::Horizontal(1, 0);
        let c = EdgeKey::Horizontal(2, 0);
        let segs = [CellSegment { from: a, to: b }, CellSegment { from: c, to: b }];
        let err = stitch(&segs).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_single_peak_closes() {
        let g = grid(3, 3, vec![0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
        let contour = trace_level(&g, 5.0).unwrap();
        assert_eq!(contour.rings.len(), 1);
        assert_eq!(contour.closed_count(), 1);
        // Four crossings plus the repeated start
        assert_eq!(contour.rings[0].len(), 5);
    }

    #[test]
    fn test_saddle_disambiguation() {
        // tl and br above, center mean 5.0 >= 5.0 joins them
        let g = grid(2, 2, vec![10.0, 0.0, 0.0, 10.0]);
        let segs = march_squares(&g, 5.0);
        assert_eq!(segs.len(), 2);
        // Joined: segments cut off tr and bl
        let near_tr = segs.iter().any(|s| s.start.x == 1.0 && s.end.y == 0.0);
        assert!(near_tr);

        // Center below: segments cut off tl and br
        let segs = march_squares(&g, 6.0);
        assert_eq!(segs.len(), 2);
        let near_tl = segs.iter().any(|s| s.start.x == 0.0 && s.end.y == 0.0);
        assert!(near_tl);
    }
}

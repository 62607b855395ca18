//! Polyline clipping against a lon/lat rectangle (Liang–Barsky).
//!
//! A polyline that leaves and re-enters the box splits into several
//! pieces. Pieces that stay inside keep their original points bit for bit.

use dem_common::{BoundingBox, LonLat, Polyline, PolylineSet};

/// Portion of segment `a -> b` inside `bbox`.
///
/// Returns the clipped end points and the parameters `t0 <= t1` along the
/// segment, or `None` when the segment misses the box.
pub fn clip_segment(
    a: LonLat,
    b: LonLat,
    bbox: &BoundingBox,
) -> Option<(LonLat, LonLat, f64, f64)> {
    let dx = b.lon - a.lon;
    let dy = b.lat - a.lat;
    let checks = [
        (-dx, a.lon - bbox.min_lon),
        (dx, bbox.max_lon - a.lon),
        (-dy, a.lat - bbox.min_lat),
        (dy, bbox.max_lat - a.lat),
    ];

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let at = |t: f64| LonLat::new(a.lon + t * dx, a.lat + t * dy);
    let start = if t0 == 0.0 { a } else { at(t0) };
    let end = if t1 == 1.0 { b } else { at(t1) };
    Some((start, end, t0, t1))
}

/// Clip one polyline, returning the pieces inside `bbox` in order.
pub fn clip_polyline(line: &[LonLat], bbox: &BoundingBox) -> PolylineSet<LonLat> {
    let mut pieces = Vec::new();
    if line.len() < 2 {
        return pieces;
    }
    match BoundingBox::enclosing(line) {
        Some(envelope) if bbox.contains_box(&envelope) => return vec![line.to_vec()],
        Some(envelope) if !bbox.intersects(&envelope) => return pieces,
        _ => {}
    }

    let mut current: Polyline<LonLat> = Vec::new();
    for pair in line.windows(2) {
        match clip_segment(pair[0], pair[1], bbox) {
            Some((start, end, t0, t1)) => {
                if current.is_empty() {
                    // A lone touch point does not start a piece.
                    if start == end {
                        continue;
                    }
                    current.push(start);
                } else if start == end && t1 < 1.0 {
                    // Leaving the box from a point on its edge.
                    flush(&mut pieces, &mut current);
                    continue;
                } else if t0 > 0.0 {
                    flush(&mut pieces, &mut current);
                    current.push(start);
                }
                current.push(end);
                if t1 < 1.0 {
                    flush(&mut pieces, &mut current);
                }
            }
            None => flush(&mut pieces, &mut current),
        }
    }
    flush(&mut pieces, &mut current);
    pieces
}

/// Clip every polyline of a set, concatenating the pieces in order.
pub fn clip_polylines(lines: &[Polyline<LonLat>], bbox: &BoundingBox) -> PolylineSet<LonLat> {
    lines
        .iter()
        .flat_map(|line| clip_polyline(line, bbox))
        .collect()
}

fn flush(pieces: &mut PolylineSet<LonLat>, current: &mut Polyline<LonLat>) {
    if current.len() >= 2 {
        pieces.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

//! Slippy-map tile addressing and the 3x3 mosaic layout.
//!
//! The contour pipeline works on a mosaic made of a center tile and its
//! neighbors so that lines stay continuous across tile edges; only the
//! center tile's extent is kept after clipping.

use crate::error::{ContourError, ContourResult};
use crate::geometry::PixelPoint;
use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// Edge length of one tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level accepted by the projector.
pub const MAX_ZOOM: u32 = 24;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom.
    pub fn matrix_size(&self) -> u64 {
        1u64 << self.z.min(63)
    }

    /// The tile offset by `(dx, dy)`, or `None` when it falls off the world.
    pub fn neighbor(&self, dx: i64, dy: i64) -> Option<TileCoord> {
        let n = self.matrix_size() as i64;
        let x = self.x as i64 + dx;
        let y = self.y as i64 + dy;
        if x < 0 || y < 0 || x >= n || y >= n {
            return None;
        }
        Some(TileCoord {
            z: self.z,
            x: x as u32,
            y: y as u32,
        })
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// One tile's slot inside a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicSlot {
    /// Column offset from the center tile
    pub dx: i32,
    /// Row offset from the center tile
    pub dy: i32,
    /// Left pixel of the slot in the mosaic
    pub pixel_x: u32,
    /// Top pixel of the slot in the mosaic
    pub pixel_y: u32,
}

/// Layout of a square mosaic centered on one tile.
///
/// `expansion = 1` gives the 3x3 mosaic: pixel `(0, 0)` sits one tile
/// width before the center tile's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicLayout {
    /// Number of tiles added on each side of the center tile
    pub expansion: u32,
    /// Tile size in pixels
    pub tile_size: u32,
}

impl Default for MosaicLayout {
    fn default() -> Self {
        Self {
            expansion: 1, // 3x3 grid
            tile_size: TILE_SIZE,
        }
    }
}

impl MosaicLayout {
    /// Total edge length of the mosaic in pixels.
    pub fn expanded_size(&self) -> u32 {
        self.tile_size * (2 * self.expansion + 1)
    }

    /// Pixel offset where the center tile starts.
    pub fn center_offset(&self) -> u32 {
        self.tile_size * self.expansion
    }

    /// Slots for every tile of the mosaic, column by column
    /// (`dx` outer, `dy` inner), each with its pixel origin.
    pub fn neighbor_offsets(&self) -> Vec<MosaicSlot> {
        let e = self.expansion as i32;
        let mut slots = Vec::with_capacity(((2 * e + 1) * (2 * e + 1)) as usize);
        for dx in -e..=e {
            for dy in -e..=e {
                slots.push(MosaicSlot {
                    dx,
                    dy,
                    pixel_x: ((dx + e) as u32) * self.tile_size,
                    pixel_y: ((dy + e) as u32) * self.tile_size,
                });
            }
        }
        slots
    }

    /// South-west and north-east pixel corners of the center tile.
    ///
    /// For the default layout these are `(256, 512)` and `(512, 256)`.
    pub fn center_clip_pixels(&self) -> (PixelPoint, PixelPoint) {
        let lo = self.center_offset() as f64;
        let hi = (self.center_offset() + self.tile_size) as f64;
        (PixelPoint::new(lo, hi), PixelPoint::new(hi, lo))
    }
}

/// The tile containing a lat/lon point at `zoom`.
///
/// Latitudes beyond the Mercator limit land in the first or last row and
/// `lon = 180` lands in the last column.
pub fn latlon_to_tile(lat: f64, lon: f64, zoom: u32) -> ContourResult<TileCoord> {
    if zoom > MAX_ZOOM {
        return Err(ContourError::invalid_argument(format!(
            "zoom {} exceeds maximum {}",
            zoom, MAX_ZOOM
        )));
    }
    if !(lat.is_finite() && lon.is_finite()) {
        return Err(ContourError::invalid_argument(format!(
            "coordinates must be finite, got ({}, {})",
            lat, lon
        )));
    }

    let n = (1u64 << zoom) as f64;
    let last = n - 1.0;

    let x = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, last);
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n)
        .floor()
        .clamp(0.0, last);

    Ok(TileCoord::new(zoom, x as u32, y as u32))
}

/// Convert Web Mercator tile coordinates to lat/lon bounds.
pub fn tile_to_latlon_bounds(coord: &TileCoord) -> BoundingBox {
    let n = coord.matrix_size() as f64;

    let lon_min = coord.x as f64 / n * 360.0 - 180.0;
    let lon_max = (coord.x + 1) as f64 / n * 360.0 - 180.0;

    let lat_max = (std::f64::consts::PI * (1.0 - 2.0 * coord.y as f64 / n))
        .sinh()
        .atan()
        .to_degrees();
    let lat_min = (std::f64::consts::PI * (1.0 - 2.0 * (coord.y + 1) as f64 / n))
        .sinh()
        .atan()
        .to_degrees();

    BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
}

//! Spherical Mercator scaled to a slippy-map pixel raster.
//!
//! At zoom `z` with 256 px tiles the world spans `2^(z+8)` units on both
//! axes. The sphere radius is chosen so that one unit is one pixel
//! (`R = 2^(z+7) / π`) and the false origin sits at the world center, so
//! world coordinates run from 0 (west / south) to `2^(z+8)` (east / north).
//!
//! Pixel coordinates in a tile mosaic map to world coordinates as:
//!
//! ```text
//! world_x = (px + 0.5) + (x - e) * tile_size
//! world_y = world_size - (py + 0.5) - (y - e) * tile_size
//! ```
//!
//! where `e` is the mosaic expansion (1 for a 3x3 mosaic).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use dem_common::{
    BoundingBox, ContourError, ContourResult, LonLat, MosaicLayout, PixelPoint, TileCoord, MAX_ZOOM,
};

/// Spherical Mercator with an explicit radius and false origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMercator {
    /// Sphere radius in world units
    pub radius: f64,
    /// Added to projected x
    pub false_easting: f64,
    /// Added to projected y
    pub false_northing: f64,
}

impl TileMercator {
    /// Mercator whose world is `world_size` units across, origin at the center.
    pub fn for_world_size(world_size: f64) -> Self {
        let half = world_size / 2.0;
        Self {
            radius: half / PI,
            false_easting: half,
            false_northing: half,
        }
    }

    /// Mercator for a 256 px tile pyramid at `zoom`.
    pub fn for_zoom(zoom: u32) -> Self {
        Self::for_world_size(2f64.powi(zoom as i32 + 8))
    }

    /// Geographic degrees to world units.
    pub fn forward(&self, p: LonLat) -> (f64, f64) {
        let lon = p.lon.to_radians();
        let lat = p.lat.to_radians();
        let x = self.false_easting + self.radius * lon;
        let y = self.false_northing + self.radius * (FRAC_PI_4 + lat / 2.0).tan().ln();
        (x, y)
    }

    /// World units to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> LonLat {
        let lon = (x - self.false_easting) / self.radius;
        let lat = 2.0 * ((y - self.false_northing) / self.radius).exp().atan() - FRAC_PI_2;
        LonLat::new(lon.to_degrees(), lat.to_degrees())
    }
}

/// Maps mosaic pixels around one tile to longitude/latitude.
#[derive(Debug, Clone, Copy)]
pub struct TileProjector {
    tile: TileCoord,
    layout: MosaicLayout,
    world_size: f64,
    mercator: TileMercator,
}

impl TileProjector {
    /// Projector for the default 3x3 mosaic centered on `tile`.
    pub fn new(tile: TileCoord) -> ContourResult<Self> {
        Self::with_layout(tile, MosaicLayout::default())
    }

    /// Projector for an arbitrary mosaic layout centered on `tile`.
    pub fn with_layout(tile: TileCoord, layout: MosaicLayout) -> ContourResult<Self> {
        if tile.z > MAX_ZOOM {
            return Err(ContourError::invalid_argument(format!(
                "zoom {} exceeds maximum {}",
                tile.z, MAX_ZOOM
            )));
        }
        let n = tile.matrix_size();
        if tile.x as u64 >= n || tile.y as u64 >= n {
            return Err(ContourError::invalid_argument(format!(
                "tile {} is outside the {}x{} matrix",
                tile, n, n
            )));
        }
        if layout.tile_size == 0 {
            return Err(ContourError::invalid_argument("tile_size must be > 0"));
        }

        let world_size = layout.tile_size as f64 * n as f64;
        Ok(Self {
            tile,
            layout,
            world_size,
            mercator: TileMercator::for_world_size(world_size),
        })
    }

    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    pub fn layout(&self) -> MosaicLayout {
        self.layout
    }

    pub fn mercator(&self) -> TileMercator {
        self.mercator
    }

    /// World coordinates of a mosaic pixel.
    pub fn pixel_to_world(&self, p: PixelPoint) -> (f64, f64) {
        let ts = self.layout.tile_size as f64;
        let e = self.layout.expansion as f64;
        let x = (p.x + 0.5) + (self.tile.x as f64 - e) * ts;
        let y = self.world_size - (p.y + 0.5) - (self.tile.y as f64 - e) * ts;
        (x, y)
    }

    /// Mosaic pixel of a world coordinate.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> PixelPoint {
        let ts = self.layout.tile_size as f64;
        let e = self.layout.expansion as f64;
        PixelPoint::new(
            x - 0.5 - (self.tile.x as f64 - e) * ts,
            self.world_size - y - 0.5 - (self.tile.y as f64 - e) * ts,
        )
    }

    /// Longitude/latitude of a mosaic pixel.
    pub fn pixel_to_lonlat(&self, p: PixelPoint) -> LonLat {
        let (x, y) = self.pixel_to_world(p);
        self.mercator.inverse(x, y)
    }

    /// Mosaic pixel of a longitude/latitude.
    pub fn lonlat_to_pixel(&self, p: LonLat) -> PixelPoint {
        let (x, y) = self.mercator.forward(p);
        self.world_to_pixel(x, y)
    }

    /// Geographic extent of the center tile, used as the clip box.
    pub fn clip_box(&self) -> BoundingBox {
        let (sw, ne) = self.layout.center_clip_pixels();
        BoundingBox::from_corners(self.pixel_to_lonlat(sw), self.pixel_to_lonlat(ne))
    }
}

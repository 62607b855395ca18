//! Common test fixtures for contour pipeline tests.

use dem_common::{LonLat, TileCoord};

/// Default tile of the DEM loader (GSI dem5a, Kanto plain).
pub const GOLDEN_TILE: TileCoord = TileCoord {
    z: 15,
    x: 29084,
    y: 12842,
};

/// Projection of mosaic pixel `(256, 512)` around [`GOLDEN_TILE`].
///
/// Computed once from the closed-form inverse Mercator and stored.
pub const GOLDEN_SW_CORNER: LonLat = LonLat {
    lon: 139.52638864517212,
    lat: 36.21766981067184,
};

/// Projection of mosaic pixel `(512, 256)` around [`GOLDEN_TILE`].
pub const GOLDEN_NE_CORNER: LonLat = LonLat {
    lon: 139.53737497329712,
    lat: 36.22653283785358,
};

/// Default elevation resolution in meters per packed unit.
pub const RESOLUTION: f64 = 0.01;

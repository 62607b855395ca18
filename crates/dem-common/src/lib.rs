//! Common types and utilities shared across the dem-contours crates.

pub mod bbox;
pub mod error;
pub mod geometry;
pub mod tile;

pub use bbox::BoundingBox;
pub use error::{ContourError, ContourResult};
pub use geometry::{LonLat, PixelPoint, Polyline, PolylineSet};
pub use tile::{MosaicLayout, TileCoord, MAX_ZOOM, TILE_SIZE};

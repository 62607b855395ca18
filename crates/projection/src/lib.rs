//! Coordinate transformations for the DEM contour pipeline.
//!
//! Implements the tile-pixel spherical Mercator from scratch without
//! external projection libraries, since the sphere radius and false
//! origin depend on the zoom level.

pub mod transform;
pub mod web_mercator;

pub use transform::Project;
pub use web_mercator::{TileMercator, TileProjector};

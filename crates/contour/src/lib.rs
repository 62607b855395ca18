//! Contour line generation from RGB-packed elevation tiles.
//!
//! The pipeline runs in stages:
//! - Decode RGBA pixels into an elevation grid ([`decode`])
//! - Pick contour levels from the elevation range ([`levels`])
//! - Trace each level with marching squares ([`contour`])
//! - Project rings to lon/lat, clip to the tile and tag major lines
//!   ([`clip`], [`tag`])
//!
//! [`ContourPipeline`] wires the stages together for one tile.

pub mod clip;
pub mod config;
pub mod contour;
pub mod decode;
pub mod levels;
pub mod pipeline;
pub mod tag;

pub use clip::{clip_polyline, clip_polylines, clip_segment};
pub use config::ContourConfig;
pub use contour::{march_squares, stitch, trace_contours, trace_level, Contour, ProjectedContour};
pub use decode::{
    decode_elevation, encode_elevation, ElevationDecoder, ElevationGrid, ElevationStats,
    PixelBuffer,
};
pub use levels::{select_thresholds, thresholds_for_stats};
pub use pipeline::ContourPipeline;
pub use tag::{is_major, TaggedFeature, Tagger};

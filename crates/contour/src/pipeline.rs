//! End-to-end contour generation for one tile.
//!
//! ```text
//! PixelBuffer ─► decode ─► ElevationGrid + stats
//!                              │
//!                              ▼
//!                      select_thresholds
//!                              │
//!          ┌───────────────────┼───────────────────┐  (one job per level)
//!          ▼                   ▼                   ▼
//!     trace_level         trace_level         trace_level
//!     project             project             project
//!     clip + tag          clip + tag          clip + tag
//!          └───────────────────┼───────────────────┘
//!                              ▼
//!              Vec<TaggedFeature> in level order
//! ```

use dem_common::{BoundingBox, ContourError, ContourResult, MosaicLayout, TileCoord};
use projection::TileProjector;
use rayon::prelude::*;
use tracing::debug;

use crate::config::ContourConfig;
use crate::contour::trace_level;
use crate::decode::{ElevationDecoder, ElevationGrid, PixelBuffer};
use crate::levels::select_thresholds;
use crate::tag::{TaggedFeature, Tagger};

/// Turns DEM mosaics into tagged contour features.
#[derive(Debug, Clone)]
pub struct ContourPipeline {
    config: ContourConfig,
    decoder: ElevationDecoder,
    tagger: Tagger,
    layout: MosaicLayout,
}

impl ContourPipeline {
    /// Build a pipeline, rejecting invalid configuration.
    pub fn new(config: ContourConfig) -> ContourResult<Self> {
        config.validate()?;
        let decoder =
            ElevationDecoder::new(config.resolution)?.with_artifact_floor(config.artifact_floor);
        let tagger = Tagger::new(config.bold_interval)?.with_tolerance(config.major_tolerance);
        Ok(Self {
            config,
            decoder,
            tagger,
            layout: MosaicLayout::default(),
        })
    }

    /// Use a mosaic layout other than the default 3x3.
    pub fn with_layout(mut self, layout: MosaicLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    pub fn decoder(&self) -> &ElevationDecoder {
        &self.decoder
    }

    /// Contour a mosaic centered on `tile`, clipped to the center tile.
    pub fn run(
        &self,
        pixels: &PixelBuffer<'_>,
        tile: TileCoord,
    ) -> ContourResult<Vec<TaggedFeature>> {
        let grid = self.decoder.decode(pixels);
        self.run_grid(&grid, tile, None)
    }

    /// Contour a mosaic centered on `tile`, clipped to `clip`.
    pub fn run_with_clip(
        &self,
        pixels: &PixelBuffer<'_>,
        tile: TileCoord,
        clip: BoundingBox,
    ) -> ContourResult<Vec<TaggedFeature>> {
        let grid = self.decoder.decode(pixels);
        self.run_grid(&grid, tile, Some(clip))
    }

    /// Contour an already decoded grid.
    ///
    /// When `clip` is `None` the center tile's extent is used.
    pub fn run_grid(
        &self,
        grid: &ElevationGrid,
        tile: TileCoord,
        clip: Option<BoundingBox>,
    ) -> ContourResult<Vec<TaggedFeature>> {
        let projector = TileProjector::with_layout(tile, self.layout)?;
        let bbox = clip.unwrap_or_else(|| projector.clip_box());
        if !bbox.is_valid() {
            return Err(ContourError::invalid_argument(format!(
                "clip box {:?} is not a valid rectangle",
                bbox
            )));
        }

        let stats = match grid.require_stats() {
            Ok(stats) => stats,
            Err(ContourError::EmptyElevationRange) => {
                debug!(tile = %tile, "No valid elevation samples, nothing to contour");
                return Ok(vec![]);
            }
            Err(e) => return Err(e),
        };

        let thresholds = select_thresholds(stats.min, stats.max, self.config.interval)?;
        debug!(
            tile = %tile,
            min = stats.min,
            max = stats.max,
            num_levels = thresholds.len(),
            first_level = thresholds.first().copied().unwrap_or(0.0),
            last_level = thresholds.last().copied().unwrap_or(0.0),
            "Contouring grid"
        );

        let contour_level = |&level: &f64| -> ContourResult<Option<TaggedFeature>> {
            let contour = trace_level(grid, level)?;
            if contour.rings.is_empty() {
                return Ok(None);
            }
            let projected = contour.project(&projector);
            Ok(self.tagger.tag(&projected, &bbox))
        };

        // Indexed collect keeps level order regardless of completion order.
        let per_level: Vec<Option<TaggedFeature>> = if self.config.parallel {
            thresholds.par_iter().map(contour_level).collect::<ContourResult<_>>()?
        } else {
            thresholds.iter().map(contour_level).collect::<ContourResult<_>>()?
        };
        let features: Vec<TaggedFeature> = per_level.into_iter().flatten().collect();

        debug!(
            tile = %tile,
            num_features = features.len(),
            total_points = features.iter().map(TaggedFeature::point_count).sum::<usize>(),
            "Generated contour features"
        );

        Ok(features)
    }
}

//! Elevation decoding from RGB-packed DEM pixels.
//!
//! Each opaque pixel stores a 24-bit integer `R·2^16 + G·2^8 + B`. Values
//! below 2^23 are positive multiples of the resolution; the upper half of
//! the range wraps around to negative elevations. Fully transparent pixels
//! carry no data.

use dem_common::{ContourError, ContourResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Packed values at or above this are negative (two's-complement wrap).
pub const PACKED_SIGN_THRESHOLD: u32 = 1 << 23;

/// Size of the 24-bit packed range.
pub const PACKED_RANGE: u32 = 1 << 24;

/// Elevation step per packed unit, in meters.
pub const DEFAULT_RESOLUTION_M: f64 = 0.01;

/// Samples at or below this elevation (meters) never lower the minimum.
///
/// Isolated pixels along image seams can decode to huge negative values;
/// this keeps them out of the threshold range. They may still raise the
/// maximum and are still contoured.
pub const ARTIFACT_FLOOR_M: f64 = -100.0;

/// Alpha value marking a no-data pixel.
pub const NO_DATA_ALPHA: u8 = 0;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A borrowed, read-only RGBA pixel buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `data` as a `width`x`height` RGBA buffer.
    ///
    /// Fails with `InvalidArgument` when the byte length does not match.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> ContourResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| ContourError::invalid_argument("pixel buffer dimensions overflow"))?;
        if data.len() != expected {
            return Err(ContourError::invalid_argument(format!(
                "pixel buffer has {} bytes, expected {} for {}x{} RGBA",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA channels of pixel `index` (row-major).
    pub fn pixel(&self, index: usize) -> [u8; 4] {
        let base = index * CHANNELS;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }
}

/// Observed elevation range of the valid samples of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationStats {
    pub min: f64,
    pub max: f64,
}

/// Running min/max over valid samples.
#[derive(Debug, Clone, Copy)]
struct StatsAccumulator {
    artifact_floor: f64,
    min: Option<f64>,
    lowest: Option<f64>,
    max: Option<f64>,
    valid: usize,
}

impl StatsAccumulator {
    fn new(artifact_floor: f64) -> Self {
        Self {
            artifact_floor,
            min: None,
            lowest: None,
            max: None,
            valid: 0,
        }
    }

    fn push(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.valid += 1;
        if v > self.artifact_floor {
            self.min = Some(self.min.map_or(v, |m| m.min(v)));
        }
        self.lowest = Some(self.lowest.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    fn finish(self) -> Option<ElevationStats> {
        // Fall back to the raw lowest sample when every sample is an artifact.
        let min = self.min.or(self.lowest)?;
        let max = self.max?;
        Some(ElevationStats { min, max })
    }
}

/// A decoded elevation raster (meters, row-major) with its no-data mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    values: Vec<f64>,
    no_data: Vec<bool>,
    stats: Option<ElevationStats>,
}

impl ElevationGrid {
    /// Build a grid from raw elevations with every sample valid.
    pub fn from_values(width: usize, height: usize, values: Vec<f64>) -> ContourResult<Self> {
        let no_data = vec![false; values.len()];
        Self::from_parts(width, height, values, no_data, ARTIFACT_FLOOR_M)
    }

    /// Build a grid from raw elevations and a no-data mask.
    ///
    /// Masked samples are stored as 0 and excluded from the stats.
    pub fn from_parts(
        width: usize,
        height: usize,
        mut values: Vec<f64>,
        no_data: Vec<bool>,
        artifact_floor: f64,
    ) -> ContourResult<Self> {
        if values.len() != width * height || no_data.len() != values.len() {
            return Err(ContourError::invalid_argument(format!(
                "grid of {}x{} needs {} samples, got {} values and {} mask entries",
                width,
                height,
                width * height,
                values.len(),
                no_data.len()
            )));
        }

        let mut acc = StatsAccumulator::new(artifact_floor);
        for (v, &masked) in values.iter_mut().zip(&no_data) {
            if masked {
                *v = 0.0;
            } else {
                acc.push(*v);
            }
        }

        Ok(Self {
            width,
            height,
            values,
            no_data,
            stats: acc.finish(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Elevations in row-major order (no-data samples read as 0).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Elevation at column `x`, row `y`.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    #[inline]
    pub fn is_no_data(&self, x: usize, y: usize) -> bool {
        self.no_data[y * self.width + x]
    }

    /// Number of samples carrying data.
    pub fn valid_count(&self) -> usize {
        self.no_data.iter().filter(|&&m| !m).count()
    }

    /// Min/max of the valid samples, `None` when there are none.
    pub fn stats(&self) -> Option<ElevationStats> {
        self.stats
    }

    /// Min/max of the valid samples or `EmptyElevationRange`.
    pub fn require_stats(&self) -> ContourResult<ElevationStats> {
        self.stats.ok_or(ContourError::EmptyElevationRange)
    }
}

/// Decodes RGB-packed pixel buffers into elevation grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationDecoder {
    resolution: f64,
    artifact_floor: f64,
}

impl Default for ElevationDecoder {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION_M,
            artifact_floor: ARTIFACT_FLOOR_M,
        }
    }
}

impl ElevationDecoder {
    /// Create a decoder with the given meters-per-unit resolution.
    pub fn new(resolution: f64) -> ContourResult<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ContourError::invalid_argument(format!(
                "resolution must be a positive number, got {}",
                resolution
            )));
        }
        Ok(Self {
            resolution,
            ..Self::default()
        })
    }

    /// Override the artifact floor used for the minimum.
    pub fn with_artifact_floor(mut self, floor: f64) -> Self {
        self.artifact_floor = floor;
        self
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Elevation of one opaque pixel.
    #[inline]
    pub fn decode_rgb(&self, r: u8, g: u8, b: u8) -> f64 {
        decode_elevation(r, g, b, self.resolution)
    }

    /// Decode a whole buffer, computing stats in the same pass.
    pub fn decode(&self, pixels: &PixelBuffer<'_>) -> ElevationGrid {
        let len = pixels.width() * pixels.height();
        let mut values = Vec::with_capacity(len);
        let mut no_data = Vec::with_capacity(len);
        let mut acc = StatsAccumulator::new(self.artifact_floor);

        for i in 0..len {
            let [r, g, b, a] = pixels.pixel(i);
            if a == NO_DATA_ALPHA {
                values.push(0.0);
                no_data.push(true);
            } else {
                let v = self.decode_rgb(r, g, b);
                acc.push(v);
                values.push(v);
                no_data.push(false);
            }
        }

        let stats = acc.finish();
        debug!(
            width = pixels.width(),
            height = pixels.height(),
            valid_count = acc.valid,
            min = stats.map(|s| s.min),
            max = stats.map(|s| s.max),
            "Decoded elevation grid"
        );

        ElevationGrid {
            width: pixels.width(),
            height: pixels.height(),
            values,
            no_data,
            stats,
        }
    }
}

/// Unpack a 24-bit RGB value into meters.
#[inline]
pub fn decode_elevation(r: u8, g: u8, b: u8, resolution: f64) -> f64 {
    let packed = (r as u32) << 16 | (g as u32) << 8 | b as u32;
    if packed < PACKED_SIGN_THRESHOLD {
        packed as f64 * resolution
    } else {
        (packed as i64 - PACKED_RANGE as i64) as f64 * resolution
    }
}

/// Pack meters into RGB channels, rounding to the nearest resolution step.
///
/// Elevations outside the representable ±2^23 step range are clamped.
pub fn encode_elevation(elevation: f64, resolution: f64) -> [u8; 3] {
    let half = PACKED_SIGN_THRESHOLD as i64;
    let units = ((elevation / resolution).round() as i64).clamp(-half, half - 1);
    let packed = units.rem_euclid(PACKED_RANGE as i64) as u32;
    [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
}

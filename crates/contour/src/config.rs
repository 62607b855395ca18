//! Configuration for the contour pipeline.

use dem_common::{ContourError, ContourResult};
use serde::{Deserialize, Serialize};

use crate::decode::{ARTIFACT_FLOOR_M, DEFAULT_RESOLUTION_M};
use crate::tag::DEFAULT_MAJOR_TOLERANCE;

/// Configuration for the contour pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Meters per packed RGB unit.
    pub resolution: f64,

    /// Spacing between contour levels in meters.
    pub interval: f64,

    /// Levels that are multiples of this are tagged major.
    pub bold_interval: f64,

    /// Samples at or below this elevation never lower the minimum.
    pub artifact_floor: f64,

    /// Remainder tolerance for the major test.
    pub major_tolerance: f64,

    /// Trace levels on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION_M,
            interval: 0.5,
            bold_interval: 2.5,
            artifact_floor: ARTIFACT_FLOOR_M,
            major_tolerance: DEFAULT_MAJOR_TOLERANCE,
            parallel: true,
        }
    }
}

impl ContourConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DEM_RESOLUTION") {
            if let Ok(v) = val.parse() {
                config.resolution = v;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_INTERVAL") {
            if let Ok(v) = val.parse() {
                config.interval = v;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_BOLD_INTERVAL") {
            if let Ok(v) = val.parse() {
                config.bold_interval = v;
            }
        }

        if let Ok(val) = std::env::var("DEM_ARTIFACT_FLOOR") {
            if let Ok(v) = val.parse() {
                config.artifact_floor = v;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Set the level spacing.
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    /// Set the major level spacing.
    pub fn with_bold_interval(mut self, bold_interval: f64) -> Self {
        self.bold_interval = bold_interval;
        self
    }

    /// Enable or disable per-level parallelism.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ContourResult<()> {
        for (name, value) in [
            ("resolution", self.resolution),
            ("interval", self.interval),
            ("bold_interval", self.bold_interval),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ContourError::invalid_argument(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.artifact_floor.is_nan() {
            return Err(ContourError::invalid_argument("artifact_floor must not be NaN"));
        }

        if !(self.major_tolerance.is_finite() && self.major_tolerance >= 0.0) {
            return Err(ContourError::invalid_argument("major_tolerance must be >= 0"));
        }

        Ok(())
    }
}

//! Error types for the contour pipeline.

use thiserror::Error;

/// Result type alias using ContourError.
pub type ContourResult<T> = Result<T, ContourError>;

/// Errors raised by the decoder, tracer, projector and clipper.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContourError {
    /// An input violated the caller contract (non-positive interval,
    /// mismatched buffer dimensions, zoom out of range, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No valid (non no-data) sample was found, so min/max are undefined.
    ///
    /// Callers should treat this as "no contours" rather than a failure.
    #[error("Elevation range is empty: no valid samples")]
    EmptyElevationRange,

    /// An internal invariant was broken while building geometry.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl ContourError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a DegenerateGeometry error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// True for invariant violations that indicate a bug rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ContourError::DegenerateGeometry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ContourError::invalid_argument("interval must be > 0");
        assert_eq!(err.to_string(), "Invalid argument: interval must be > 0");

        let err = ContourError::degenerate("unterminated polyline");
        assert_eq!(err.to_string(), "Degenerate geometry: unterminated polyline");
    }

    #[test]
    fn test_is_fatal() {
        assert!(ContourError::degenerate("x").is_fatal());
        assert!(!ContourError::invalid_argument("x").is_fatal());
        assert!(!ContourError::EmptyElevationRange.is_fatal());
    }
}

//! Error types for the sonification core

use thiserror::Error;

/// Errors raised while validating or sonifying a request
///
/// Every variant is a deterministic validation failure: the same input
/// always reproduces it, so callers should reject the request rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SonifyError {
    /// Series too short to segment, or containing non-finite samples
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// Configuration outside the allowed ranges
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Parameter name other than pitch, volume or pan
    #[error("unknown parameter '{0}' (expected pitch, volume or pan)")]
    UnknownParameter(String),

    /// Measurement type other than mean, min, max or length
    #[error("unknown measurement type '{0}' (expected mean, min, max or length)")]
    UnknownMeasurementType(String),

    /// A parameter was given a series but no measurement type
    #[error("no measurement type given for parameter '{0}'")]
    MissingMeasurement(String),

    /// Parameters produced different numbers of segments
    #[error("parameter '{parameter}' produced {found} segments, expected {expected}")]
    MismatchedSegmentCounts {
        parameter: String,
        expected: usize,
        found: usize,
    },

    /// Request that is structurally valid but has nothing to sonify
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for the sonification core
pub type Result<T> = std::result::Result<T, SonifyError>;

//! Error types for the pitch-detection engine

use std::fmt;

/// Errors surfaced by transform, configuration and analysis entry points.
///
/// Silence is deliberately not represented here: an all-zero buffer is a
/// defined outcome (the zero-frequency sentinel), not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunerError {
    /// Transform length is not a power of two, or falls outside [2, 16384]
    InvalidTransformLength(usize),

    /// A configuration option failed validation
    InvalidConfig(String),

    /// An analysis cycle was handed a zero sample rate
    InvalidSampleRate,
}

impl fmt::Display for TunerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TunerError::InvalidTransformLength(n) => {
                write!(f, "invalid transform length: {} (need a power of two in [2, 16384])", n)
            }
            TunerError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            TunerError::InvalidSampleRate => write!(f, "sample rate must be greater than zero"),
        }
    }
}

impl std::error::Error for TunerError {}

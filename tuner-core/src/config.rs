//! # Configuration Module
//!
//! The recognized analysis options, their defaults, and the validation
//! gate every session runs before its first cycle. Serialization support
//! exists so a front end can persist settings as JSON; the core itself
//! never touches a file.

use serde::{Deserialize, Serialize};

use crate::error::TunerError;
use crate::fft;

/// Analysis options recognized by the engine.
///
/// Missing fields deserialize to their defaults, so a settings file may
/// name only the options it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Lower edge of the peak search band in Hz.
    pub min_freq: f64,
    /// Upper edge of the peak search band in Hz.
    pub max_freq: f64,
    /// Number of candidate peaks tracked (K).
    pub peaks_count: usize,
    /// Preferred chunk size for transforms; a power of two in [2, 16384].
    pub fft_length: usize,
    /// Divisor applied to raw sample amplitudes before the transform.
    pub downsample: f64,
    /// Anchor frequency for the pitch table in Hz.
    pub concert_pitch: f64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        TunerConfig {
            min_freq: 60.0,
            max_freq: 1300.0,
            peaks_count: 1,
            fft_length: 8192,
            downsample: 1.0,
            concert_pitch: 440.0,
        }
    }
}

impl TunerConfig {
    /// Checks every option, reporting the first violation found.
    ///
    /// # Errors
    /// [`TunerError::InvalidConfig`] for an inverted or non-finite band,
    /// a zero peak count, a non-positive downsample divisor or concert
    /// pitch; [`TunerError::InvalidTransformLength`] when `fft_length`
    /// breaks the transform length contract.
    pub fn validate(&self) -> Result<(), TunerError> {
        if !self.min_freq.is_finite() || self.min_freq < 0.0 {
            return Err(TunerError::InvalidConfig(format!(
                "min_freq must be a non-negative number, got {}",
                self.min_freq
            )));
        }
        if !self.max_freq.is_finite() || self.max_freq <= self.min_freq {
            return Err(TunerError::InvalidConfig(format!(
                "min_freq ({}) must be below max_freq ({})",
                self.min_freq, self.max_freq
            )));
        }
        if self.peaks_count == 0 {
            return Err(TunerError::InvalidConfig(
                "peaks_count must be at least 1".into(),
            ));
        }
        fft::validate_length(self.fft_length)?;
        if !self.downsample.is_finite() || self.downsample <= 0.0 {
            return Err(TunerError::InvalidConfig(format!(
                "downsample must be positive, got {}",
                self.downsample
            )));
        }
        if !self.concert_pitch.is_finite() || self.concert_pitch <= 0.0 {
            return Err(TunerError::InvalidConfig(format!(
                "concert_pitch must be positive, got {}",
                self.concert_pitch
            )));
        }
        Ok(())
    }
}

//! # Analysis Session Module
//!
//! Owns one validated configuration and the state derived from it (the
//! spectral analyzer and the pitch table) and runs complete analysis
//! cycles: scale, wrap, transform, estimate, match, measure. One cycle
//! is synchronous, allocation-bounded, and finishes in time proportional
//! to n log n for the transform.

use log::debug;

use crate::complex::Complex;
use crate::config::TunerConfig;
use crate::error::TunerError;
use crate::fft::{self, Direction};
use crate::pitch::PitchTable;
use crate::spectrum::{NO_TONE, SpectrumAnalyzer};
use crate::tuning::{self, TuningResult};

/// A configured analysis pipeline.
///
/// The session owns the pitch table generated for its concert-pitch
/// anchor and regenerates it only when the anchor changes.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    config: TunerConfig,
    analyzer: SpectrumAnalyzer,
    pitch_table: PitchTable,
}

impl AnalysisSession {
    /// Builds a session from a configuration.
    ///
    /// # Errors
    /// Whatever [`TunerConfig::validate`] reports; an invalid
    /// configuration never produces a session.
    pub fn new(config: TunerConfig) -> Result<Self, TunerError> {
        config.validate()?;
        let analyzer = SpectrumAnalyzer::from_config(&config);
        let pitch_table = PitchTable::new(config.concert_pitch);
        Ok(AnalysisSession {
            config,
            analyzer,
            pitch_table,
        })
    }

    /// The validated configuration this session runs with.
    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// The reference pitch table for the current anchor.
    pub fn pitch_table(&self) -> &PitchTable {
        &self.pitch_table
    }

    /// Re-anchors the pitch table.
    ///
    /// A no-op when the anchor is unchanged; otherwise the table is
    /// regenerated once, here, not per cycle.
    ///
    /// # Errors
    /// [`TunerError::InvalidConfig`] for a non-positive or non-finite
    /// anchor.
    pub fn set_concert_pitch(&mut self, concert_pitch: f64) -> Result<(), TunerError> {
        if !concert_pitch.is_finite() || concert_pitch <= 0.0 {
            return Err(TunerError::InvalidConfig(format!(
                "concert_pitch must be positive, got {concert_pitch}"
            )));
        }
        if concert_pitch != self.config.concert_pitch {
            self.config.concert_pitch = concert_pitch;
            self.pitch_table = PitchTable::new(concert_pitch);
            debug!("pitch table re-anchored to {concert_pitch} Hz");
        }
        Ok(())
    }

    /// Runs one complete analysis cycle over a sample chunk.
    ///
    /// Samples are divided by the configured downsample divisor, wrapped
    /// as complex values, forward-transformed in place, and searched for
    /// a fundamental. The result carries the nearest reference pitch and
    /// the cents deviation measured against it, all derived from this
    /// cycle's estimate. Silence comes back as `Ok(None)`.
    ///
    /// # Arguments
    /// * `samples` - Sample chunk whose length satisfies the transform
    ///   contract (a [`SampleChunker`](crate::audio::SampleChunker)
    ///   guarantees that)
    /// * `sample_rate` - Rate the samples were captured at, in Hz
    ///
    /// # Errors
    /// [`TunerError::InvalidSampleRate`] for a zero rate,
    /// [`TunerError::InvalidTransformLength`] for an untransformable
    /// chunk.
    pub fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Option<TuningResult>, TunerError> {
        if sample_rate == 0 {
            return Err(TunerError::InvalidSampleRate);
        }

        let divisor = self.config.downsample;
        let mut spectrum: Vec<Complex> = samples
            .iter()
            .map(|&sample| Complex::from(f64::from(sample) / divisor))
            .collect();
        fft::fft(&mut spectrum, Direction::Forward)?;

        let frequency = self.analyzer.estimate_fundamental(&spectrum, sample_rate);
        if frequency == NO_TONE {
            debug!("cycle found no tone in {} samples", samples.len());
            return Ok(None);
        }

        let result = tuning::evaluate(frequency, &self.pitch_table);
        debug!(
            "cycle: {:.2} Hz -> {}{} {:+} cents",
            result.frequency, result.note, result.accidental, result.cents
        );
        Ok(Some(result))
    }
}

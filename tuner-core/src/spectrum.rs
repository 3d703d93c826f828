//! # Spectral Analysis Module
//!
//! Turns a forward-transformed spectrum into a fundamental-frequency
//! estimate. The analyzer squares bin magnitudes into a power
//! spectrogram, restricts attention to a configured frequency band,
//! picks the strongest bins with a single running-minimum pass, and
//! refines the winning bin below integer resolution with Quinn's
//! second-order estimator.
//!
//! ## Features
//! - Power spectrogram computation
//! - Banded top-K peak search without sorting
//! - Sub-bin refinement with degenerate-input fallback
//! - Zero-frequency sentinel for silence, never an error

use log::debug;

use crate::complex::Complex;
use crate::config::TunerConfig;

/// Sentinel frequency reported when no tone is detectable.
pub const NO_TONE: f64 = 0.0;

/// Peak search over a fixed frequency band.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumAnalyzer {
    /// Lower edge of the search band in Hz.
    pub min_freq: f64,
    /// Upper edge of the search band in Hz.
    pub max_freq: f64,
    /// Number of candidate peak slots tracked (K).
    pub peaks_count: usize,
}

impl SpectrumAnalyzer {
    /// Creates an analyzer for the band `[min_freq, max_freq]` tracking
    /// `peaks_count` candidate peaks.
    pub fn new(min_freq: f64, max_freq: f64, peaks_count: usize) -> Self {
        SpectrumAnalyzer {
            min_freq,
            max_freq,
            peaks_count,
        }
    }

    /// Builds an analyzer from the band and peak-count options of a
    /// configuration.
    pub fn from_config(config: &TunerConfig) -> Self {
        SpectrumAnalyzer::new(config.min_freq, config.max_freq, config.peaks_count)
    }

    /// One real power value per spectrum bin (squared magnitude).
    pub fn power_spectrogram(spectrum: &[Complex]) -> Vec<f64> {
        spectrum.iter().map(|bin| bin.squared_magnitude()).collect()
    }

    /// Estimates the fundamental frequency of a forward-transformed
    /// spectrum.
    ///
    /// Returns [`NO_TONE`] when nothing in the band rises above the
    /// boundary bin, when the clamped band cannot seed every peak slot,
    /// or when the spectrum is empty.
    ///
    /// # Arguments
    /// * `spectrum` - Output of a forward FFT over the sample chunk
    /// * `sample_rate` - Rate the chunk was captured at, in Hz
    ///
    /// # Returns
    /// * Estimated fundamental in Hz, or [`NO_TONE`]
    pub fn estimate_fundamental(&self, spectrum: &[Complex], sample_rate: u32) -> f64 {
        let n = spectrum.len();
        let (lower, upper) = self.band_bins(n, sample_rate);

        if self.peaks_count == 0 || upper.saturating_sub(lower) < self.peaks_count {
            debug!(
                "band bins [{lower}, {upper}) cannot seed {} peak slots",
                self.peaks_count
            );
            return NO_TONE;
        }

        let spectrogram = Self::power_spectrogram(spectrum);
        let peaks = self.find_peaks(&spectrogram, lower, upper);
        debug!("band bins [{lower}, {upper}), peaks at {peaks:?}");

        // A winning bin on the lower band boundary cannot be told apart
        // from the no-signal case.
        if peaks.contains(&lower) {
            debug!("peak on the lower band boundary, reporting no tone");
            return NO_TONE;
        }

        let peak = peaks[0];
        let position = peak as f64 + Self::refine_peak(spectrum, peak);
        position / n as f64 * sample_rate as f64
    }

    /// Maps the configured band to spectrum bin bounds: a half-open
    /// window `[lower, upper)` clamped into `[0, n]`.
    fn band_bins(&self, n: usize, sample_rate: u32) -> (usize, usize) {
        let rate = sample_rate as f64;
        let lower = (self.min_freq * n as f64 / rate) as usize;
        let upper = (self.max_freq * n as f64 / rate) as usize + 1;
        (lower.min(n), upper.min(n))
    }

    /// Indices of the K strongest spectrogram bins in `[lower, upper)`.
    ///
    /// K candidate slots seed from the first K band bins; one scan over
    /// the rest replaces the current minimum slot whenever a value beats
    /// it. O(band length * K), no allocation beyond the slots.
    fn find_peaks(&self, spectrogram: &[f64], lower: usize, upper: usize) -> Vec<usize> {
        let mut slots: Vec<(usize, f64)> = (lower..lower + self.peaks_count)
            .map(|index| (index, spectrogram[index]))
            .collect();
        let (mut min_slot, mut min_value) = current_minimum(&slots);

        for index in lower + self.peaks_count..upper {
            let value = spectrogram[index];
            if value > min_value {
                slots[min_slot] = (index, value);
                (min_slot, min_value) = current_minimum(&slots);
            }
        }

        slots.into_iter().map(|(index, _)| index).collect()
    }

    /// Quinn's second-order estimator for the sub-bin offset of `peak`.
    ///
    /// Degenerate inputs (a missing neighbor, or an equal-magnitude
    /// neighbor driving a ratio to 1) fall back to offset zero, keeping
    /// the unrefined bin.
    fn refine_peak(spectrum: &[Complex], peak: usize) -> f64 {
        if peak == 0 || peak + 1 >= spectrum.len() {
            debug!("peak bin {peak} has no neighbors to interpolate against");
            return 0.0;
        }

        let center = spectrum[peak].magnitude();
        let ratio1 = spectrum[peak - 1].magnitude() / center;
        let ratio2 = spectrum[peak + 1].magnitude() / center;
        let d1 = ratio1 / (1.0 - ratio1);
        let d2 = -ratio2 / (1.0 - ratio2);

        let offset = if d1 > 0.0 && d2 > 0.0 { d1 } else { d2 };
        if offset.is_finite() {
            offset
        } else {
            debug!("degenerate neighbor ratio at bin {peak}, keeping the unrefined estimate");
            0.0
        }
    }
}

fn current_minimum(slots: &[(usize, f64)]) -> (usize, f64) {
    let mut min_slot = 0;
    for (slot, candidate) in slots.iter().enumerate() {
        if candidate.1 < slots[min_slot].1 {
            min_slot = slot;
        }
    }
    (min_slot, slots[min_slot].1)
}

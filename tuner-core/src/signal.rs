//! Test-tone synthesis.
//!
//! A deterministic sine generator backs the accuracy checks and the CLI's
//! tone command, standing in for a live instrument.

/// Synthesizes a unit-amplitude sine wave by incremental phase
/// accumulation.
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `count` - Number of samples to produce
///
/// # Returns
/// * `Vec<f32>` - `count` samples of `sin(2*pi*frequency*t)`
pub fn sine_wave(frequency: f64, sample_rate: u32, count: usize) -> Vec<f32> {
    let increment = 2.0 * std::f64::consts::PI * frequency / sample_rate as f64;
    let mut angle = 0.0f64;
    (0..count)
        .map(|_| {
            let sample = angle.sin() as f32;
            angle += increment;
            sample
        })
        .collect()
}

//! # Tuning Evaluation Module
//!
//! Measures how far an estimated fundamental sits from its nearest
//! equal-tempered reference pitch. Deviation is expressed in whole
//! cents: 100 cents to the semitone, positive when sharp, negative when
//! flat.

use crate::pitch::{Accidental, NoteName, PitchTable};

/// Deviation of `frequency` from `reference`, in whole cents.
///
/// Computed as `round(1200 * log2(frequency / reference))`. Both
/// arguments must be positive; the analysis pipeline guarantees that by
/// construction (silence never reaches the evaluator).
///
/// # Arguments
/// * `frequency` - Measured frequency in Hz
/// * `reference` - Reference pitch frequency in Hz
///
/// # Returns
/// * Signed cents (positive = sharp, negative = flat)
pub fn cents(frequency: f64, reference: f64) -> i32 {
    (1200.0 * (frequency / reference).log2()).round() as i32
}

/// Outcome of one analysis cycle.
///
/// Created fresh per cycle; nothing here persists between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningResult {
    /// Estimated fundamental in Hz, rounded to two decimals.
    pub frequency: f64,
    /// Whole-cent deviation from the matched pitch.
    pub cents: i32,
    /// Matched note letter.
    pub note: NoteName,
    /// Matched accidental.
    pub accidental: Accidental,
}

/// Matches an estimated frequency against a pitch table and measures the
/// deviation.
///
/// The estimate is rounded to two decimals up front; the rounded value
/// drives the nearest lookup, the cents measure, and the reported
/// frequency, so the three always agree.
pub fn evaluate(frequency: f64, table: &PitchTable) -> TuningResult {
    let rounded = round_hundredths(frequency);
    let pitch = table.nearest(rounded);

    TuningResult {
        frequency: rounded,
        cents: cents(rounded, pitch.frequency),
        note: pitch.note,
        accidental: pitch.accidental,
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_frequencies_deviate_by_zero() {
        assert_eq!(cents(440.0, 440.0), 0);
    }

    #[test]
    fn one_semitone_is_a_hundred_cents() {
        assert_eq!(cents(466.16, 440.0), 100);
        assert_eq!(cents(415.30, 440.0), -100);
    }

    #[test]
    fn one_octave_is_twelve_hundred_cents() {
        assert_eq!(cents(880.0, 440.0), 1200);
        assert_eq!(cents(220.0, 440.0), -1200);
    }

    #[test]
    fn deviation_rounds_to_the_nearest_whole_cent() {
        // 441 Hz sits 3.93 cents above 440.
        assert_eq!(cents(441.0, 440.0), 4);
        assert_eq!(cents(439.0, 440.0), -4);
    }

    #[test]
    fn evaluate_rounds_the_frequency_to_two_decimals() {
        let table = PitchTable::new(440.0);
        let result = evaluate(440.123456, &table);
        assert_eq!(result.frequency, 440.12);
        assert_eq!(result.note, NoteName::A);
        assert_eq!(result.accidental, Accidental::Natural);
        assert_eq!(result.cents, 0);
    }

    #[test]
    fn evaluate_reports_sharp_deviation_from_the_matched_pitch() {
        let table = PitchTable::new(440.0);
        let result = evaluate(443.0, &table);
        assert_eq!(result.note, NoteName::A);
        assert_eq!(result.cents, 12);
    }

    #[test]
    fn evaluate_matches_the_nearer_sharp_neighbor() {
        let table = PitchTable::new(440.0);
        // 413 Hz is closer to G# (415.305) than to A (440).
        let result = evaluate(413.0, &table);
        assert_eq!(result.note, NoteName::G);
        assert_eq!(result.accidental, Accidental::Sharp);
        assert_eq!(result.cents, -10);
    }
}

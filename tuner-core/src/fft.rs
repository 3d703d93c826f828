//! # Fourier Transform Module
//!
//! Discrete Fourier transforms over [`Complex`] buffers, in one and two
//! dimensions. Two implementations share a single convention:
//!
//! - a reference DFT, O(n^2), which accepts any length and serves as an
//!   independently checkable oracle for the optimized path;
//! - a radix-2 decimation-in-time FFT, O(n log n), restricted to
//!   power-of-two lengths between [`MIN_LENGTH`] and [`MAX_LENGTH`].
//!
//! Forward transforms scale every output bin by `1/n`; backward transforms
//! apply no scaling, so a forward/backward pair recovers the input.
//! Bit-reversal orderings and twiddle factors are computed once per
//! (bit-length, direction) key and cached for the life of the process.
//!
//! ## Features
//! - In-place 1-D and row/column 2-D transforms
//! - Process-wide lazily initialized rotation and reordering tables
//! - Strict length validation, never silent truncation or padding

use std::f64::consts::PI;

use once_cell::sync::{Lazy, OnceCell};

use crate::complex::Complex;
use crate::error::TunerError;

/// Smallest transformable length.
pub const MIN_LENGTH: usize = 2;

/// Largest transformable length (2^14).
pub const MAX_LENGTH: usize = 16384;

const MAX_BITS: usize = 14;

/// Transform direction.
///
/// Selects the sign of the transform exponent and whether the output is
/// normalized: forward uses the negative exponent and divides by the
/// length, backward uses the positive exponent and leaves scale alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Time domain to frequency domain, output scaled by `1/n`.
    Forward,
    /// Frequency domain to time domain, no scaling.
    Backward,
}

impl Direction {
    fn angle_sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Backward => 1.0,
        }
    }

    fn cache_slot(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
        }
    }
}

/// Checks a proposed transform length against the engine contract.
///
/// # Errors
/// [`TunerError::InvalidTransformLength`] unless `n` is a power of two
/// within `[MIN_LENGTH, MAX_LENGTH]`.
pub fn validate_length(n: usize) -> Result<(), TunerError> {
    transform_bits(n).map(|_| ())
}

/// Validates the length contract and returns `log2(n)`.
fn transform_bits(n: usize) -> Result<usize, TunerError> {
    if n < MIN_LENGTH || n > MAX_LENGTH || !n.is_power_of_two() {
        return Err(TunerError::InvalidTransformLength(n));
    }
    Ok(n.trailing_zeros() as usize)
}

/// Reference discrete Fourier transform, O(n^2), in place.
///
/// Accepts any length (including empty) and never fails. This is the
/// correctness oracle for [`fft`] and the fallback for odd-sized buffers
/// in tests; the production path always goes through the FFT.
///
/// # Arguments
/// * `data` - Buffer to transform in place
/// * `direction` - Forward (normalized by `1/n`) or backward
pub fn dft(data: &mut [Complex], direction: Direction) {
    let n = data.len();
    if n == 0 {
        return;
    }

    let mut output = vec![Complex::ZERO; n];
    for (i, out) in output.iter_mut().enumerate() {
        let arg = direction.angle_sign() * 2.0 * PI * i as f64 / n as f64;
        for (j, &sample) in data.iter().enumerate() {
            let (sin, cos) = (j as f64 * arg).sin_cos();
            *out = *out + sample * Complex::new(cos, sin);
        }
    }

    data.copy_from_slice(&output);
    if direction == Direction::Forward {
        scale(data, 1.0 / n as f64);
    }
}

/// 2-D reference transform: every row, then every column.
///
/// Rows must all share one length; the column scratch buffer is transient
/// and dropped on return.
pub fn dft2(data: &mut [Vec<Complex>], direction: Direction) {
    let rows = data.len();
    let cols = match data.first() {
        Some(row) => row.len(),
        None => return,
    };

    for row in data.iter_mut() {
        dft(row, direction);
    }

    let mut column = vec![Complex::ZERO; rows];
    for j in 0..cols {
        for (i, row) in data.iter().enumerate() {
            column[i] = row[j];
        }
        dft(&mut column, direction);
        for (i, row) in data.iter_mut().enumerate() {
            row[j] = column[i];
        }
    }
}

/// In-place radix-2 decimation-in-time FFT.
///
/// The buffer is first reordered by bit-reversed index, then combined in
/// log2(n) butterfly passes. Pass `k` pairs elements `2^(k-1)` apart and
/// multiplies the odd member by a twiddle factor from the cached rotation
/// table for `(k, direction)`.
///
/// # Arguments
/// * `data` - Buffer to transform in place
/// * `direction` - Forward (normalized by `1/n`) or backward
///
/// # Errors
/// [`TunerError::InvalidTransformLength`] when the length is not a power
/// of two in `[MIN_LENGTH, MAX_LENGTH]`; the buffer is left untouched.
pub fn fft(data: &mut [Complex], direction: Direction) -> Result<(), TunerError> {
    let n = data.len();
    let bits = transform_bits(n)?;

    reorder(data, bits);

    for pass in 1..=bits {
        let rotation = TABLES.rotation(pass, direction);
        let half = 1usize << (pass - 1);
        let span = 1usize << pass;

        for (k, &twiddle) in rotation.iter().enumerate() {
            let mut even = k;
            while even < n {
                let odd = even + half;
                let product = data[odd] * twiddle;
                let stored = data[even];
                data[even] = stored + product;
                data[odd] = stored - product;
                even += span;
            }
        }
    }

    if direction == Direction::Forward {
        scale(data, 1.0 / n as f64);
    }
    Ok(())
}

/// 2-D FFT: validates both dimensions, then transforms every row in place
/// followed by every column in place.
///
/// # Errors
/// [`TunerError::InvalidTransformLength`] if either dimension breaks the
/// length contract, or if the rows are not all the same length.
pub fn fft2(data: &mut [Vec<Complex>], direction: Direction) -> Result<(), TunerError> {
    let rows = data.len();
    transform_bits(rows)?;
    let cols = data[0].len();
    transform_bits(cols)?;
    for row in data.iter() {
        if row.len() != cols {
            return Err(TunerError::InvalidTransformLength(row.len()));
        }
    }

    for row in data.iter_mut() {
        fft(row, direction)?;
    }

    let mut column = vec![Complex::ZERO; rows];
    for j in 0..cols {
        for (i, row) in data.iter().enumerate() {
            column[i] = row[j];
        }
        fft(&mut column, direction)?;
        for (i, row) in data.iter_mut().enumerate() {
            row[j] = column[i];
        }
    }
    Ok(())
}

fn scale(data: &mut [Complex], factor: f64) {
    for value in data.iter_mut() {
        value.re *= factor;
        value.im *= factor;
    }
}

/// Applies the cached bit-reversal permutation for `bits`-bit indices.
fn reorder(data: &mut [Complex], bits: usize) {
    let table = TABLES.reordering(bits);
    for (i, &target) in table.iter().enumerate() {
        // Each pair swaps once.
        if target > i {
            data.swap(i, target);
        }
    }
}

/// Process-wide transform tables.
///
/// Each slot fills at most once, on first use, behind a one-time
/// initialization guard; afterwards the tables are read-only, so
/// concurrent transforms share them without locking.
struct TransformTables {
    reordering: [OnceCell<Vec<usize>>; MAX_BITS],
    rotations: [[OnceCell<Vec<Complex>>; 2]; MAX_BITS],
}

static TABLES: Lazy<TransformTables> = Lazy::new(TransformTables::new);

impl TransformTables {
    fn new() -> Self {
        TransformTables {
            reordering: std::array::from_fn(|_| OnceCell::new()),
            rotations: std::array::from_fn(|_| [OnceCell::new(), OnceCell::new()]),
        }
    }

    fn reordering(&self, bits: usize) -> &[usize] {
        self.reordering[bits - 1].get_or_init(|| reversed_indices(bits))
    }

    fn rotation(&self, bits: usize, direction: Direction) -> &[Complex] {
        self.rotations[bits - 1][direction.cache_slot()]
            .get_or_init(|| rotation_table(bits, direction))
    }
}

fn reversed_indices(bits: usize) -> Vec<usize> {
    let n = 1usize << bits;
    (0..n)
        .map(|i| {
            let mut value = i;
            let mut reversed = 0usize;
            for _ in 0..bits {
                reversed = (reversed << 1) | (value & 1);
                value >>= 1;
            }
            reversed
        })
        .collect()
}

/// Twiddle factors for one butterfly pass: `2^(bits-1)` roots of unity.
///
/// A single transcendental evaluation seeds the unit step; successive
/// factors come from incremental rotation by that step.
fn rotation_table(bits: usize, direction: Direction) -> Vec<Complex> {
    let half = 1usize << (bits - 1);
    let step = Complex::new(0.0, direction.angle_sign() * PI / half as f64).exp();
    let mut factor = Complex::ONE;
    (0..half)
        .map(|_| {
            let current = factor;
            factor = factor * step;
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOL: f64 = 1e-9;

    fn random_buffer(rng: &mut StdRng, n: usize) -> Vec<Complex> {
        (0..n)
            .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect()
    }

    fn max_deviation(a: &[Complex], b: &[Complex]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (*x - *y).magnitude())
            .fold(0.0, f64::max)
    }

    #[test]
    fn rejects_lengths_outside_contract() {
        for n in [0usize, 1, 3, 1000, 12000, 32768] {
            let mut data = vec![Complex::ZERO; n];
            assert_eq!(
                fft(&mut data, Direction::Forward),
                Err(TunerError::InvalidTransformLength(n))
            );
        }
        assert!(validate_length(2).is_ok());
        assert!(validate_length(16384).is_ok());
        assert!(validate_length(1).is_err());
    }

    #[test]
    fn dft_accepts_lengths_the_fft_rejects() {
        // A constant sequence concentrates all weight in bin zero.
        let mut data = vec![Complex::ONE; 17];
        dft(&mut data, Direction::Forward);
        assert!((data[0].re - 1.0).abs() < TOL);
        for bin in &data[1..] {
            assert!(bin.magnitude() < TOL);
        }
    }

    #[test]
    fn forward_dft_of_single_tone_lands_in_its_bin() {
        // x[j] = e^(2*pi*i*3j/16) has unit weight in bin 3 and nothing else.
        let n = 16usize;
        let mut data: Vec<Complex> = (0..n)
            .map(|j| Complex::new(0.0, 2.0 * PI * 3.0 * j as f64 / n as f64).exp())
            .collect();
        dft(&mut data, Direction::Forward);
        for (i, bin) in data.iter().enumerate() {
            let expected = if i == 3 { 1.0 } else { 0.0 };
            assert!((bin.magnitude() - expected).abs() < TOL, "bin {i}");
        }
    }

    #[test]
    fn fft_matches_reference_dft_on_random_input() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for bits in 1..=6 {
            let n = 1usize << bits;
            for direction in [Direction::Forward, Direction::Backward] {
                let original = random_buffer(&mut rng, n);
                let mut fast = original.clone();
                let mut reference = original.clone();

                fft(&mut fast, direction).unwrap();
                dft(&mut reference, direction);

                assert!(
                    max_deviation(&fast, &reference) < TOL,
                    "n={n} {direction:?}"
                );
            }
        }
    }

    #[test]
    fn round_trip_recovers_input_at_every_supported_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for bits in 1..=14 {
            let n = 1usize << bits;
            let original = random_buffer(&mut rng, n);

            let mut data = original.clone();
            fft(&mut data, Direction::Forward).unwrap();
            fft(&mut data, Direction::Backward).unwrap();
            assert!(max_deviation(&data, &original) < 1e-8, "forward first, n={n}");

            let mut data = original.clone();
            fft(&mut data, Direction::Backward).unwrap();
            fft(&mut data, Direction::Forward).unwrap();
            assert!(max_deviation(&data, &original) < 1e-8, "backward first, n={n}");
        }
    }

    #[test]
    fn forward_output_is_normalized_by_length() {
        let n = 8usize;
        let mut data = vec![Complex::new(2.0, 0.0); n];
        fft(&mut data, Direction::Forward).unwrap();
        assert!((data[0].re - 2.0).abs() < TOL);
        for bin in &data[1..] {
            assert!(bin.magnitude() < TOL);
        }
    }

    #[test]
    fn backward_transform_applies_no_scaling() {
        // An impulse at bin zero spreads to a flat unit sequence.
        let mut data = vec![Complex::ZERO; 8];
        data[0] = Complex::ONE;
        fft(&mut data, Direction::Backward).unwrap();
        for bin in &data {
            assert!((bin.re - 1.0).abs() < TOL && bin.im.abs() < TOL);
        }
    }

    #[test]
    fn two_dimensional_fft_matches_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<Vec<Complex>> = (0..4).map(|_| random_buffer(&mut rng, 8)).collect();

        let mut fast = original.clone();
        let mut reference = original;
        fft2(&mut fast, Direction::Forward).unwrap();
        dft2(&mut reference, Direction::Forward);

        for (fast_row, reference_row) in fast.iter().zip(&reference) {
            assert!(max_deviation(fast_row, reference_row) < TOL);
        }
    }

    #[test]
    fn two_dimensional_round_trip_recovers_input() {
        let mut rng = StdRng::seed_from_u64(11);
        let original: Vec<Vec<Complex>> = (0..8).map(|_| random_buffer(&mut rng, 4)).collect();

        let mut data = original.clone();
        fft2(&mut data, Direction::Forward).unwrap();
        fft2(&mut data, Direction::Backward).unwrap();

        for (row, original_row) in data.iter().zip(&original) {
            assert!(max_deviation(row, original_row) < TOL);
        }
    }

    #[test]
    fn two_dimensional_fft_validates_each_dimension() {
        let mut data = vec![vec![Complex::ZERO; 3]; 4];
        assert_eq!(
            fft2(&mut data, Direction::Forward),
            Err(TunerError::InvalidTransformLength(3))
        );

        let mut data = vec![vec![Complex::ZERO; 4]; 5];
        assert_eq!(
            fft2(&mut data, Direction::Forward),
            Err(TunerError::InvalidTransformLength(5))
        );
    }

    #[test]
    fn concurrent_first_use_of_the_table_cache_is_safe() {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                std::thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let original = random_buffer(&mut rng, 512);
                    let mut data = original.clone();
                    fft(&mut data, Direction::Forward).unwrap();
                    fft(&mut data, Direction::Backward).unwrap();
                    max_deviation(&data, &original)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap() < TOL);
        }
    }
}

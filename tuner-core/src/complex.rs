//! # Complex Arithmetic Module
//!
//! Value type for the complex samples flowing through the transform and
//! analysis stages. All spectral math runs in `f64`; real-valued audio
//! samples are widened and wrapped at the pipeline boundary.
//!
//! ## Features
//! - Standard operators (`+`, `-`, unary `-`, `*`) producing new values
//! - Complex exponential used to seed twiddle-factor rotations
//! - Magnitude, squared magnitude and phase accessors

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A complex number with `f64` components.
///
/// Plain value semantics: every operation returns a new value and never
/// mutates its operands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Additive identity.
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    /// Multiplicative identity.
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };
    /// The imaginary unit.
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    /// Creates a complex number from its real and imaginary parts.
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Euclidean norm, `sqrt(re^2 + im^2)`.
    pub fn magnitude(self) -> f64 {
        self.squared_magnitude().sqrt()
    }

    /// Squared norm, `re^2 + im^2`.
    ///
    /// Cheaper than [`Complex::magnitude`] when only relative ordering
    /// matters, which is all the power spectrogram needs.
    pub fn squared_magnitude(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Phase angle, `atan(im / re)`.
    ///
    /// Undefined when the real part is zero (the quotient degenerates to
    /// an infinity or NaN); callers must not rely on the phase near that
    /// boundary.
    pub fn phase(self) -> f64 {
        (self.im / self.re).atan()
    }

    /// Complex exponential, `e^re * (cos(im) + i*sin(im))`.
    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Complex::new(scale * self.im.cos(), scale * self.im.sin())
    }
}

impl From<f64> for Complex {
    /// Wraps a real scalar as a complex value with zero imaginary part.
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    /// Standard complex product: `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`.
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+i*{}", self.re, self.im)
    }
}

//! Biquad (bi-quadratic) filter section.
//!
//! A second-order IIR stage with two poles and two zeros, the building block
//! the Butterworth designer cascades. Coefficients live in their own
//! [`BiquadCoefficients`] value so a whole set can be swapped in without
//! disturbing the section's delay line.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.
//!
//! Coefficients and the delay line are kept in `f64`: a low cutoff at a high
//! sample rate leaves a stability margin of about `(2*pi*f/sr)^2`, below
//! `f32` resolution near `a1 = -2`. Samples enter and leave as `f32`.

use core::f64::consts::PI;
use libm::{cos, sin, sqrt};

/// Normalized biquad coefficients (`a0 == 1`).
///
/// ```text
/// H(z) = (b0 + b1 z^-1 + b2 z^-2) / (1 + a1 z^-1 + a2 z^-2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f64,
    /// Feedforward coefficient for x[n-1].
    pub b1: f64,
    /// Feedforward coefficient for x[n-2].
    pub b2: f64,
    /// Feedback coefficient for y[n-1].
    pub a1: f64,
    /// Feedback coefficient for y[n-2].
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds a coefficient set from raw cookbook values, normalizing by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Returns `true` if both poles lie strictly inside the unit circle.
    ///
    /// Uses the stability triangle for `1 + a1 z^-1 + a2 z^-2`:
    /// `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    /// Linear magnitude response `|H(e^jw)|` at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * f64::from(freq_hz) / f64::from(sample_rate);
        let (c1, s1) = (cos(w), sin(w));
        let (c2, s2) = (cos(2.0 * w), sin(2.0 * w));
        let Self { b0, b1, b2, a1, a2 } = *self;

        // Evaluate numerator and denominator at z^-1 = e^-jw.
        let num_re = b0 + b1 * c1 + b2 * c2;
        let num_im = -(b1 * s1 + b2 * s2);
        let den_re = 1.0 + a1 * c1 + a2 * c2;
        let den_im = -(a1 * s1 + a2 * s2);

        let num = sqrt(num_re * num_re + num_im * num_im);
        let den = sqrt(den_re * den_re + den_im * den_im);
        if den == 0.0 {
            return f32::INFINITY;
        }
        (num / den) as f32
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A single biquad section: one coefficient set plus its delay line.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,

    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoefficients::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replaces the coefficient set. The delay line is left as is.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: &BiquadCoefficients) {
        self.coeffs = *coeffs;
    }

    /// Current coefficient set.
    #[inline]
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    /// Processes a single sample through the section.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let x = f64::from(input);
        let output = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2
                              - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = output;

        output as f32
    }

    /// Clears the filter state (delay lines) without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Returns `true` if every delay-line value is exactly zero.
    pub fn is_cleared(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates high-pass section coefficients using the RBJ cookbook formula.
///
/// This is the bilinear transform of `s^2 / (s^2 + s/Q + 1)` with the
/// frequency axis pre-warped so the response lands exactly on `frequency`.
/// Computed in `f64` to keep low cutoffs at high sample rates well
/// conditioned.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for a single Butterworth section)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let omega = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
    let cos_omega = cos(omega);
    let sin_omega = sin(omega);
    let alpha = sin_omega / (2.0 * f64::from(q));

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

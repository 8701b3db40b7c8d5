//! Butterworth high-pass coefficient designer.
//!
//! An order-N Butterworth high-pass is realized as N/2 cascaded biquad
//! sections. Each section is the bilinear transform of an analog
//! second-order high-pass whose Q comes from one conjugate pole pair of the
//! Butterworth prototype:
//!
//! ```text
//! Q_k = 1 / (2 sin((2k + 1) * pi / (2N)))     k = 0 .. N/2 - 1
//! ```
//!
//! All sections share the same pre-warped cutoff, so the cascade is -3 dB at
//! the cutoff, maximally flat above it, and rolls off at 6·N dB/octave below.
//!
//! Design is pure and allocation-free: the result is a fixed-capacity
//! [`SectionCoefficients`] that can be produced on the audio thread.

use crate::biquad::{BiquadCoefficients, highpass_coefficients};
use core::f64::consts::PI;
use libm::{log10f, sin};

/// Highest filter order the designer (and [`FilterChain`](crate::FilterChain)) supports.
pub const MAX_ORDER: usize = 8;

/// Number of biquad slots needed for [`MAX_ORDER`].
pub const MAX_SECTIONS: usize = MAX_ORDER / 2;

/// Errors returned by [`design_highpass`].
///
/// Every variant is an invalid-parameter condition. Real-time callers never
/// see these: [`FilterParameters::clamped_for`](crate::FilterParameters::clamped_for)
/// keeps inputs in range before design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesignError {
    /// Cutoff is not inside the open interval (0, Nyquist).
    InvalidCutoff {
        /// Requested cutoff in Hz.
        cutoff_hz: f32,
        /// Nyquist frequency for the requested sample rate.
        nyquist_hz: f32,
    },
    /// Sample rate is not a positive finite number.
    InvalidSampleRate(f32),
    /// Order is zero, odd, or above [`MAX_ORDER`].
    InvalidOrder(usize),
    /// A designed section has a pole on or outside the unit circle.
    Unstable {
        /// Index of the offending section.
        section: usize,
    },
}

impl core::fmt::Display for DesignError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidCutoff {
                cutoff_hz,
                nyquist_hz,
            } => write!(
                f,
                "cutoff {cutoff_hz} Hz outside (0, {nyquist_hz}) Hz"
            ),
            Self::InvalidSampleRate(sr) => write!(f, "invalid sample rate {sr} Hz"),
            Self::InvalidOrder(order) => write!(
                f,
                "invalid filter order {order} (expected even, 2..={MAX_ORDER})"
            ),
            Self::Unstable { section } => write!(f, "section {section} is not stable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DesignError {}

/// Ordered biquad coefficient sets for one cascaded design.
///
/// Fixed capacity of [`MAX_SECTIONS`]; only the first [`len`](Self::len)
/// entries are meaningful. Immutable once produced; a redesign replaces the
/// whole value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionCoefficients {
    sections: [BiquadCoefficients; MAX_SECTIONS],
    len: usize,
}

impl SectionCoefficients {
    /// Number of sections in the design (order / 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the design has no sections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The active sections, in cascade order.
    #[inline]
    pub fn as_slice(&self) -> &[BiquadCoefficients] {
        &self.sections[..self.len]
    }

    /// Iterates the active sections in cascade order.
    pub fn iter(&self) -> core::slice::Iter<'_, BiquadCoefficients> {
        self.as_slice().iter()
    }

    /// Section at `index`, if it is part of the design.
    pub fn get(&self, index: usize) -> Option<&BiquadCoefficients> {
        self.as_slice().get(index)
    }

    /// Returns `true` if every section has both poles inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.iter().all(BiquadCoefficients::is_stable)
    }

    /// Linear magnitude of the whole cascade at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        self.iter()
            .map(|c| c.magnitude_at(freq_hz, sample_rate))
            .product()
    }

    /// Magnitude of the whole cascade at `freq_hz`, in dB.
    pub fn magnitude_db_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        let mag = self.magnitude_at(freq_hz, sample_rate);
        if mag <= 0.0 {
            return f32::NEG_INFINITY;
        }
        20.0 * log10f(mag)
    }
}

impl<'a> IntoIterator for &'a SectionCoefficients {
    type Item = &'a BiquadCoefficients;
    type IntoIter = core::slice::Iter<'a, BiquadCoefficients>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Q of section `section` in an order-`order` Butterworth cascade.
///
/// Section 0 carries the highest Q (the pole pair nearest the imaginary
/// axis); Q falls with each following section.
pub fn butterworth_q(order: usize, section: usize) -> f32 {
    let theta = PI * (2 * section + 1) as f64 / (2 * order) as f64;
    (1.0 / (2.0 * sin(theta))) as f32
}

/// Designs an order-`order` Butterworth high-pass as cascaded biquads.
///
/// # Errors
///
/// - [`DesignError::InvalidSampleRate`] if `sample_rate` is not positive and finite
/// - [`DesignError::InvalidCutoff`] if `cutoff_hz` is not inside (0, sample_rate / 2)
/// - [`DesignError::InvalidOrder`] if `order` is zero, odd, or above [`MAX_ORDER`]
/// - [`DesignError::Unstable`] if rounding leaves a section without a stability margin
///
/// # Example
///
/// ```rust
/// use lowcut_core::design_highpass;
///
/// let design = design_highpass(1000.0, 48000.0, 4).unwrap();
/// assert_eq!(design.len(), 2);
/// assert!(design.is_stable());
/// ```
pub fn design_highpass(
    cutoff_hz: f32,
    sample_rate: f32,
    order: usize,
) -> Result<SectionCoefficients, DesignError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(DesignError::InvalidSampleRate(sample_rate));
    }
    let nyquist_hz = sample_rate * 0.5;
    if !(cutoff_hz > 0.0 && cutoff_hz < nyquist_hz) {
        return Err(DesignError::InvalidCutoff {
            cutoff_hz,
            nyquist_hz,
        });
    }
    if order == 0 || order % 2 != 0 || order > MAX_ORDER {
        return Err(DesignError::InvalidOrder(order));
    }

    let len = order / 2;
    let mut sections = [BiquadCoefficients::IDENTITY; MAX_SECTIONS];
    for (k, section) in sections.iter_mut().take(len).enumerate() {
        *section = highpass_coefficients(cutoff_hz, butterworth_q(order, k), sample_rate);
        if !section.is_stable() {
            return Err(DesignError::Unstable { section: k });
        }
    }

    Ok(SectionCoefficients { sections, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_four_has_two_sections() {
        let design = design_highpass(1000.0, 48000.0, 4).unwrap();
        assert_eq!(design.len(), 2);
        assert_eq!(design.as_slice().len(), 2);
        assert!(design.get(2).is_none());
    }

    #[test]
    fn section_count_tracks_order() {
        for order in (2..=MAX_ORDER).step_by(2) {
            let design = design_highpass(500.0, 44100.0, order).unwrap();
            assert_eq!(design.len(), order / 2, "order {order}");
            assert!(design.is_stable(), "order {order}");
        }
    }

    #[test]
    fn butterworth_q_values() {
        // Second order: single section, Q = 1/sqrt(2).
        assert!((butterworth_q(2, 0) - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        // Fourth order: Q = 1.3066, 0.5412.
        assert!((butterworth_q(4, 0) - 1.306563).abs() < 1e-4);
        assert!((butterworth_q(4, 1) - 0.541196).abs() < 1e-4);
    }

    #[test]
    fn rejects_odd_zero_and_oversized_orders() {
        for order in [0, 1, 3, 5, MAX_ORDER + 2] {
            assert_eq!(
                design_highpass(1000.0, 48000.0, order),
                Err(DesignError::InvalidOrder(order))
            );
        }
    }

    #[test]
    fn rejects_cutoff_outside_nyquist() {
        for cutoff in [0.0, -10.0, 24000.0, 30000.0, f32::NAN] {
            assert!(matches!(
                design_highpass(cutoff, 48000.0, 4),
                Err(DesignError::InvalidCutoff { .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_sample_rate() {
        for sr in [0.0, -44100.0, f32::INFINITY, f32::NAN] {
            assert!(matches!(
                design_highpass(1000.0, sr, 4),
                Err(DesignError::InvalidSampleRate(_))
            ));
        }
    }

    #[test]
    fn minus_three_db_at_cutoff() {
        let design = design_highpass(1000.0, 48000.0, 4).unwrap();
        let db = design.magnitude_db_at(1000.0, 48000.0);
        assert!((db + 3.0103).abs() < 0.05, "got {db} dB");
    }

    #[test]
    fn flat_passband_and_24db_per_octave() {
        let design = design_highpass(1000.0, 48000.0, 4).unwrap();

        let pass = design.magnitude_db_at(8000.0, 48000.0);
        assert!(pass.abs() < 0.1, "passband at 8 kHz: {pass} dB");

        // One and two octaves below cutoff, 4th order: ~-24 and ~-48 dB.
        let oct1 = design.magnitude_db_at(500.0, 48000.0);
        let oct2 = design.magnitude_db_at(250.0, 48000.0);
        assert!(oct1 < -20.0 && oct1 > -28.0, "one octave: {oct1} dB");
        assert!((oct1 - oct2 - 24.0).abs() < 1.5, "slope: {} dB", oct1 - oct2);
    }

    #[test]
    fn boundaries_design_and_roll_off() {
        for sr in [44100.0, 48000.0] {
            for cutoff in [20.0, 20000.0] {
                let design = design_highpass(cutoff, sr, 4).unwrap();
                assert!(design.is_stable(), "{cutoff} Hz @ {sr}");
                let at = design.magnitude_db_at(cutoff, sr);
                let below = design.magnitude_db_at(cutoff * 0.5, sr);
                assert!(below < at, "{cutoff} Hz @ {sr}: {below} !< {at}");
            }
        }
    }

    #[test]
    fn low_cutoff_at_high_sample_rates_is_stable() {
        for sr in [192000.0, 384000.0, 768000.0] {
            for cutoff in [20.0, 21.0, 25.0] {
                for order in (2..=MAX_ORDER).step_by(2) {
                    let design = design_highpass(cutoff, sr, order).unwrap();
                    assert!(design.is_stable(), "{cutoff} Hz order {order} @ {sr}");
                    let dc = design.magnitude_at(0.0, sr);
                    assert!(dc.is_finite() && dc < 1e-6, "DC gain {dc}");
                    let pass = design.magnitude_db_at(sr * 0.25, sr);
                    assert!(pass.abs() < 0.01, "passband {pass} dB");
                }
            }
        }
    }

    #[test]
    fn design_is_deterministic() {
        let a = design_highpass(1234.5, 96000.0, 4).unwrap();
        let b = design_highpass(1234.5, 96000.0, 4).unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_display() {
        assert_eq!(
            DesignError::InvalidOrder(3).to_string(),
            "invalid filter order 3 (expected even, 2..=8)"
        );
        assert_eq!(
            DesignError::InvalidSampleRate(0.0).to_string(),
            "invalid sample rate 0 Hz"
        );
    }
}

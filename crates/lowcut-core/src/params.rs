//! The low-cut stage's parameter set.

use crate::butterworth::MAX_ORDER;
use crate::param_info::{ParamDescriptor, ParamId, ParameterInfo};

/// Stable ID of the cutoff parameter.
pub const CUTOFF_PARAM_ID: ParamId = ParamId(100);

/// Highest cutoff as a fraction of the sample rate. Keeps the pre-warped
/// cutoff clear of Nyquist at low sample rates.
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Values the core reads once per processing block.
///
/// Owned by whoever holds the parameter store (a plugin host, the CLI);
/// the core only reads a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
    /// Filter order (even).
    pub order: usize,
}

impl FilterParameters {
    /// Lower bound of the cutoff control.
    pub const MIN_CUTOFF_HZ: f32 = 20.0;
    /// Upper bound of the cutoff control.
    pub const MAX_CUTOFF_HZ: f32 = 20000.0;
    /// Cutoff on a fresh instance.
    pub const DEFAULT_CUTOFF_HZ: f32 = 20.0;
    /// Cutoff control resolution.
    pub const CUTOFF_STEP_HZ: f32 = 1.0;
    /// Order used unless the caller asks for another.
    pub const DEFAULT_ORDER: usize = 4;

    /// Creates a parameter set with the default order.
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            order: Self::DEFAULT_ORDER,
        }
    }

    /// Sets the filter order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Descriptor of the cutoff control.
    pub fn cutoff_descriptor() -> ParamDescriptor {
        ParamDescriptor::frequency_hz(
            "LowCut Freq",
            "LowCut",
            Self::MIN_CUTOFF_HZ,
            Self::MAX_CUTOFF_HZ,
            Self::DEFAULT_CUTOFF_HZ,
        )
        .with_id(CUTOFF_PARAM_ID, "lowcut_freq")
    }

    /// Returns a copy that the designer accepts at `sample_rate`.
    ///
    /// The cutoff lands in `[20, min(20000, 0.49 * sample_rate)]` (NaN goes to
    /// the default) and the order is forced even within `2..=MAX_ORDER`.
    /// When the sample rate is too low to host the minimum cutoff, the cutoff
    /// stays at 20 Hz and design will reject it.
    ///
    /// ```rust
    /// use lowcut_core::FilterParameters;
    ///
    /// let p = FilterParameters::new(30000.0).with_order(5).clamped_for(48000.0);
    /// assert_eq!(p.cutoff_hz, 20000.0);
    /// assert_eq!(p.order, 4);
    ///
    /// let p = FilterParameters::new(20000.0).clamped_for(22050.0);
    /// assert_eq!(p.cutoff_hz, 22050.0 * 0.49);
    /// ```
    pub fn clamped_for(&self, sample_rate: f32) -> Self {
        let upper = Self::MAX_CUTOFF_HZ.min(sample_rate * MAX_CUTOFF_RATIO);
        let cutoff_hz = if self.cutoff_hz.is_nan() {
            Self::DEFAULT_CUTOFF_HZ
        } else {
            self.cutoff_hz
        };
        let cutoff_hz = cutoff_hz.min(upper).max(Self::MIN_CUTOFF_HZ);

        let order = self.order.clamp(2, MAX_ORDER) & !1;

        Self { cutoff_hz, order }
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CUTOFF_HZ)
    }
}

impl ParameterInfo for FilterParameters {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(Self::cutoff_descriptor()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.cutoff_hz,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.cutoff_hz = Self::cutoff_descriptor().snap(value);
        }
    }
}

//! Parameter introspection for host-exposed controls.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! let a plugin host, a CLI, or a test enumerate and manipulate parameters
//! without knowing the concrete type behind them.
//!
//! # Design
//!
//! Parameters are accessed by zero-based index. Each one is described by a
//! [`ParamDescriptor`] carrying display names, range, default and step, plus:
//!
//! - [`ParamId`]: stable numeric ID for automation and saved state
//! - [`ParamFlags`]: capability flags for plugin hosts
//! - `string_id`: human-readable stable ID for debugging and serialization
//!
//! Every write goes through [`ParamDescriptor::snap`], so stored values are
//! always in range and on the step grid.
//!
//! # Example
//!
//! ```rust
//! use lowcut_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     freq_hz: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::frequency_hz("Trim Freq", "Trim", 20.0, 2000.0, 100.0)
//!                 .with_id(ParamId(900), "trim_freq")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.freq_hz,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let (0, Some(desc)) = (index, self.param_info(0)) {
//!             self.freq_hz = desc.snap(value);
//!         }
//!     }
//! }
//! ```

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Stable parameter identifier that survives reordering.
///
/// Used by plugin hosts for automation recording and saved state. Once
/// assigned, a `ParamId` must never change for a given parameter.
///
/// Maps directly to CLAP `clap_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags for plugin host communication.
///
/// Bitflag type that maps to CLAP `clap_param_info_flags`.
///
/// ```rust
/// use lowcut_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter only takes whole-number values.
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Trait for types that expose introspectable parameters.
///
/// Valid indices are `0..param_count()`.
pub trait ParameterInfo {
    /// Returns the number of parameters exposed.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at `index`, or `None` if out
    /// of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at `index`.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the parameter at `index`, snapped to the descriptor's range and
    /// step. Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "LowCut Freq").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value.
    pub default: f32,

    /// Value resolution. `0.0` means continuous.
    pub step: f32,

    /// Stable numeric ID for plugin host automation and saved state.
    pub id: ParamId,

    /// Human-readable stable ID (e.g., `"lowcut_freq"`).
    pub string_id: &'static str,

    /// Capability flags for plugin host communication.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Frequency parameter in Hz, automatable, on a 1 Hz grid.
    pub fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    ///
    /// ```rust
    /// use lowcut_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::frequency_hz("Freq", "Freq", 20.0, 20000.0, 20.0);
    /// assert_eq!(desc.clamp(1000.5), 1000.5);
    /// assert_eq!(desc.clamp(5.0), 20.0);
    /// assert_eq!(desc.clamp(1e9), 20000.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Clamps and rounds a value to the nearest multiple of `step` above `min`.
    ///
    /// ```rust
    /// use lowcut_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::frequency_hz("Freq", "Freq", 20.0, 20000.0, 20.0);
    /// assert_eq!(desc.snap(440.37), 440.0);
    /// ```
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = libm::roundf((clamped - self.min) / self.step);
        self.clamp(self.min + steps * self.step)
    }

    /// Formats a value for display, with its unit.
    ///
    /// ```rust
    /// use lowcut_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::frequency_hz("Freq", "Freq", 20.0, 20000.0, 20.0);
    /// assert_eq!(desc.format_value(440.0), "440 Hz");
    /// assert_eq!(desc.format_value(2500.0), "2.50 kHz");
    /// ```
    pub fn format_value(&self, value: f32) -> String {
        if value >= 1000.0 {
            format!("{:.2} kHz", value / 1000.0)
        } else {
            format!("{value:.0} Hz")
        }
    }

    /// Parses display text back to a snapped plain value.
    ///
    /// Accepts a bare number, or a number followed by a unit
    /// (`"440 Hz"`, `"2.5 kHz"`, `"2.5k"`). Returns `None` if the text is
    /// not a number.
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let number = text.trim().trim_end_matches(['H', 'h', 'Z', 'z']).trim_end();
        let (number, scale) = match number.strip_suffix(['k', 'K']) {
            Some(rest) => (rest, 1000.0),
            None => (number, 1.0),
        };
        let value: f32 = number.trim().parse().ok()?;
        Some(self.snap(value * scale))
    }
}

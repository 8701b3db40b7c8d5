//! Per-channel cascade of biquad sections.
//!
//! A [`FilterChain`] is the delay-line owner for exactly one audio channel.
//! It holds [`MAX_SECTIONS`] slots, each a [`Biquad`] plus a bypass flag;
//! a design with fewer sections leaves the trailing slots bypassed.
//!
//! ## Lifecycle
//!
//! ```text
//! Unconfigured ──configure()──▶ Configured ◀─┐
//!                                  │         │ update_coefficients()
//!                                  │         │ bypass_section()
//!                                  │         │ process()
//!                                  └─────────┘
//! ```
//!
//! [`configure`](FilterChain::configure) is the only place that allocates.
//! Calling [`process`](FilterChain::process) before it is a contract
//! violation and panics.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::biquad::{Biquad, BiquadCoefficients};
use crate::butterworth::{MAX_SECTIONS, SectionCoefficients};

/// Processing configuration handed over by the host before playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will pass to a single `process` call.
    pub max_block_size: usize,
    /// Number of channels the host will deliver.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Creates a processing configuration.
    pub fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }
}

/// One slot of a [`FilterChain`].
#[derive(Debug, Clone)]
pub struct FilterSection {
    biquad: Biquad,
    bypassed: bool,
}

impl FilterSection {
    fn bypassed() -> Self {
        Self {
            biquad: Biquad::new(),
            bypassed: true,
        }
    }

    /// Whether this slot is a pass-through stage.
    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Coefficients currently loaded in this slot.
    #[inline]
    pub fn coefficients(&self) -> &BiquadCoefficients {
        self.biquad.coefficients()
    }
}

/// Ordered cascade of biquad sections for a single channel.
///
/// Never shared between channels: stereo processing uses two independent
/// instances.
///
/// # Example
///
/// ```rust
/// use lowcut_core::{FilterChain, ProcessSpec, design_highpass};
///
/// let mut chain = FilterChain::new();
/// chain.configure(&ProcessSpec::new(48000.0, 512, 1));
///
/// let design = design_highpass(100.0, 48000.0, 4).unwrap();
/// chain.load_design(&design);
///
/// let mut block = [0.5f32; 512];
/// chain.process(&mut block);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    sections: Vec<FilterSection>,
    spec: Option<ProcessSpec>,
}

impl FilterChain {
    /// Creates an unconfigured chain. Call [`configure`](Self::configure)
    /// before processing.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            spec: None,
        }
    }

    /// Prepares the chain for playback and zeroes every delay line.
    ///
    /// The first call allocates [`MAX_SECTIONS`] bypassed slots with identity
    /// coefficients. Later calls keep coefficients and bypass flags and only
    /// reset state.
    pub fn configure(&mut self, spec: &ProcessSpec) {
        if self.sections.len() != MAX_SECTIONS {
            self.sections.clear();
            self.sections.resize_with(MAX_SECTIONS, FilterSection::bypassed);
        }
        self.reset();
        self.spec = Some(*spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "chain_configure: {} Hz, max block {}",
            spec.sample_rate,
            spec.max_block_size
        );
    }

    /// Returns `true` once [`configure`](Self::configure) has been called.
    #[inline]
    pub fn is_configured(&self) -> bool {
        self.spec.is_some()
    }

    /// The configuration from the last [`configure`](Self::configure) call.
    pub fn spec(&self) -> Option<&ProcessSpec> {
        self.spec.as_ref()
    }

    /// Number of slots (0 before configuration).
    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Slot at `index`.
    pub fn section(&self, index: usize) -> Option<&FilterSection> {
        self.sections.get(index)
    }

    /// Number of slots that are not bypassed.
    pub fn active_sections(&self) -> usize {
        self.sections.iter().filter(|s| !s.bypassed).count()
    }

    /// Loads coefficients into slots `0..sections.len()`.
    ///
    /// Delay lines and bypass flags are untouched; slots past the design keep
    /// whatever they held.
    pub fn update_coefficients(&mut self, sections: &SectionCoefficients) {
        for (slot, coeffs) in self.sections.iter_mut().zip(sections) {
            slot.biquad.set_coefficients(coeffs);
        }
    }

    /// Marks slot `index` as a pass-through stage (or re-enables it).
    ///
    /// Out-of-range indices are ignored.
    pub fn bypass_section(&mut self, index: usize, bypassed: bool) {
        if let Some(slot) = self.sections.get_mut(index) {
            slot.bypassed = bypassed;
        }
    }

    /// Whether slot `index` is bypassed. Missing slots count as bypassed.
    pub fn is_bypassed(&self, index: usize) -> bool {
        self.sections.get(index).is_none_or(|s| s.bypassed)
    }

    /// Swaps in a complete design.
    ///
    /// Every slot is bypassed first, the new coefficients are written, and
    /// only then are the design's slots re-enabled, so a stage never runs
    /// with coefficients from a different design.
    pub fn load_design(&mut self, design: &SectionCoefficients) {
        for index in 0..self.sections.len() {
            self.bypass_section(index, true);
        }
        self.update_coefficients(design);
        for index in 0..design.len() {
            self.bypass_section(index, false);
        }
    }

    /// Zeroes every delay line, keeping coefficients and bypass flags.
    pub fn reset(&mut self) {
        for slot in &mut self.sections {
            slot.biquad.clear();
        }
    }

    /// Returns `true` if every delay line is exactly zero.
    pub fn is_silent_state(&self) -> bool {
        self.sections.iter().all(|s| s.biquad.is_cleared())
    }

    /// Filters `block` in place through every non-bypassed slot, in order.
    ///
    /// State carries over between calls. With every slot bypassed the block
    /// is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the chain has not been configured.
    pub fn process(&mut self, block: &mut [f32]) {
        let Some(spec) = self.spec else {
            panic!("FilterChain::process called before configure");
        };
        debug_assert!(
            block.len() <= spec.max_block_size,
            "block of {} samples exceeds configured maximum {}",
            block.len(),
            spec.max_block_size
        );

        for slot in self.sections.iter_mut().filter(|s| !s.bypassed) {
            for sample in block.iter_mut() {
                *sample = slot.biquad.process(*sample);
            }
        }
    }
}

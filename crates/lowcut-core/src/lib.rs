//! Lowcut Core - Butterworth low-cut filtering for real-time audio
//!
//! This crate holds everything the low-cut stage does to samples, with no
//! dependency on a plugin host or file format. It is designed for real-time
//! processing: all allocation happens when a chain is configured, never while
//! a block is filtered.
//!
//! # Core Abstractions
//!
//! ## Coefficient Design
//!
//! - [`design_highpass`] - Order-N Butterworth high-pass as cascaded biquads
//! - [`SectionCoefficients`] - Fixed-capacity, immutable result of one design
//! - [`BiquadCoefficients`] - One normalized second-order section
//!
//! ## Channel Processing
//!
//! - [`FilterChain`] - Per-channel cascade of bypassable biquad slots
//! - [`ProcessSpec`] - Sample rate, block size and channel count from the host
//! - [`LowCut`] - Block entry point: clamp, design (cached), load, filter
//!
//! ## Parameters
//!
//! - [`FilterParameters`] - Cutoff and order snapshot read once per block
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Host-facing parameter metadata
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! lowcut-core = { version = "0.1", default-features = false }
//! ```
//!
//! The optional `tracing` feature emits `debug` events from configuration
//! paths. Nothing is logged while a block is processed.
//!
//! # Example
//!
//! ```rust
//! use lowcut_core::{FilterChain, FilterParameters, LowCut, ProcessSpec};
//!
//! let spec = ProcessSpec::new(48000.0, 4, 1);
//! let mut chains = [FilterChain::new()];
//! let mut lowcut = LowCut::new();
//! lowcut.prepare(&spec, &mut chains);
//!
//! let mut block = [1.0f32, 0.0, 0.0, 0.0];
//! let mut channels: [&mut [f32]; 1] = [&mut block];
//! lowcut.process_block(FilterParameters::new(1000.0), &mut chains, &mut channels);
//! assert!(block[0] < 1.0);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or logging in processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Channels never share state**: one [`FilterChain`] per channel

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod butterworth;
pub mod chain;
pub mod lowcut;
pub mod param_info;
pub mod params;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadCoefficients, highpass_coefficients};
pub use butterworth::{
    DesignError, MAX_ORDER, MAX_SECTIONS, SectionCoefficients, butterworth_q, design_highpass,
};
pub use chain::{FilterChain, FilterSection, ProcessSpec};
pub use lowcut::LowCut;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParameterInfo};
pub use params::{CUTOFF_PARAM_ID, FilterParameters};

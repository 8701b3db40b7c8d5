//! Block-processing entry point.
//!
//! [`LowCut`] ties the designer to a set of caller-owned channel chains.
//! It holds no channel state itself: the chains are passed in on every call,
//! one per channel, so nothing is shared between channels.

use crate::butterworth::{SectionCoefficients, design_highpass};
use crate::chain::{FilterChain, ProcessSpec};
use crate::params::FilterParameters;

/// Last design and the inputs that produced it.
#[derive(Debug, Clone, Copy)]
struct CachedDesign {
    cutoff_bits: u32,
    order: usize,
    design: SectionCoefficients,
}

/// Low-cut stage for one processor instance.
///
/// # Example
///
/// ```rust
/// use lowcut_core::{FilterChain, FilterParameters, LowCut, ProcessSpec};
///
/// let spec = ProcessSpec::new(48000.0, 256, 2);
/// let mut chains = [FilterChain::new(), FilterChain::new()];
/// let mut lowcut = LowCut::new();
/// lowcut.prepare(&spec, &mut chains);
///
/// let mut left = [0.1f32; 256];
/// let mut right = [0.1f32; 256];
/// let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
/// lowcut.process_block(FilterParameters::new(80.0), &mut chains, &mut channels);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LowCut {
    sample_rate: f32,
    cached: Option<CachedDesign>,
}

impl LowCut {
    /// Creates an unprepared stage.
    pub fn new() -> Self {
        Self {
            sample_rate: 0.0,
            cached: None,
        }
    }

    /// Sample rate from the last [`prepare`](Self::prepare) call (0 before).
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Configures every chain for `spec` and forgets the cached design.
    ///
    /// Call when processing is stopped, before the first block and on every
    /// sample-rate or block-size change.
    pub fn prepare(&mut self, spec: &ProcessSpec, chains: &mut [FilterChain]) {
        self.sample_rate = spec.sample_rate;
        self.cached = None;
        for chain in chains.iter_mut() {
            chain.configure(spec);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "lowcut_prepare: {} chains at {} Hz",
            chains.len(),
            spec.sample_rate
        );
    }

    /// Designs the cascade for `params`, clamped to the prepared sample rate.
    ///
    /// Returns the cached design when the clamped cutoff and order match the
    /// previous call exactly. Returns `None` if no valid design exists, which
    /// only happens before [`prepare`](Self::prepare) or at sample rates too
    /// low to hold the minimum cutoff.
    pub fn design(&mut self, params: FilterParameters) -> Option<SectionCoefficients> {
        let clamped = params.clamped_for(self.sample_rate);
        let cutoff_bits = clamped.cutoff_hz.to_bits();

        let hit = self
            .cached
            .filter(|c| c.cutoff_bits == cutoff_bits && c.order == clamped.order);
        if let Some(cached) = hit {
            return Some(cached.design);
        }

        let design = design_highpass(clamped.cutoff_hz, self.sample_rate, clamped.order).ok()?;
        self.cached = Some(CachedDesign {
            cutoff_bits,
            order: clamped.order,
            design,
        });
        Some(design)
    }

    /// Designs for `params` and loads the result into every chain.
    ///
    /// Returns `false` if no design is possible; the chains then keep their
    /// previous coefficients.
    pub fn update(&mut self, params: FilterParameters, chains: &mut [FilterChain]) -> bool {
        let Some(design) = self.design(params) else {
            return false;
        };
        for chain in chains.iter_mut() {
            chain.load_design(&design);
        }
        true
    }

    /// Filters one block.
    ///
    /// Designs once for the block (see [`update`](Self::update)), then runs
    /// channel `i` through chain `i`. Channels with no matching chain are
    /// left untouched.
    ///
    /// # Panics
    ///
    /// Panics if a chain that receives a channel has not been configured.
    pub fn process_block(
        &mut self,
        params: FilterParameters,
        chains: &mut [FilterChain],
        channels: &mut [&mut [f32]],
    ) {
        self.update(params, chains);

        for (chain, channel) in chains.iter_mut().zip(channels.iter_mut()) {
            chain.process(channel);
        }
    }
}

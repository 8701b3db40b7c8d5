//! Audio processor for the lowcut CLAP plugin.
//!
//! Handles the real-time audio callback: reads parameter change events from
//! the host, redesigns the cascade once per block, and filters each channel
//! through its own chain.

use crate::main_thread::LowCutMainThread;
use crate::shared::LowCutShared;
use clack_extensions::params::PluginAudioProcessorParams;
use clack_plugin::prelude::*;
use lowcut_core::{FilterChain, LowCut, ProcessSpec};

/// Number of channels with their own filter chain.
pub const MAX_CHANNELS: usize = 2;

/// Audio-thread processor.
///
/// Created during `activate()`, destroyed during `deactivate()`. Owns one
/// [`FilterChain`] per channel; the chains never see each other's samples.
pub struct LowCutAudioProcessor<'a> {
    shared: &'a LowCutShared,
    lowcut: LowCut,
    chains: [FilterChain; MAX_CHANNELS],
}

impl<'a> LowCutAudioProcessor<'a> {
    /// Build a processor configured for `spec`.
    ///
    /// Every allocation the audio path needs happens here.
    pub fn new(shared: &'a LowCutShared, spec: &ProcessSpec) -> Self {
        let mut lowcut = LowCut::new();
        let mut chains = [FilterChain::new(), FilterChain::new()];
        lowcut.prepare(spec, &mut chains);
        Self {
            shared,
            lowcut,
            chains,
        }
    }

    /// Chain for channel `index`.
    pub fn chain(&self, index: usize) -> Option<&FilterChain> {
        self.chains.get(index)
    }

    /// Read the store and load the block's design into every chain.
    pub fn begin_block(&mut self) {
        let params = self.shared.filter_parameters();
        self.lowcut.update(params, &mut self.chains);
    }

    /// Filter one host channel pair.
    ///
    /// Channel `index` runs through chain `index`. Out-of-place pairs copy
    /// the input before filtering. Output channels without a chain, and
    /// output-only channels, are cleared.
    pub fn process_channel_pair(&mut self, index: usize, pair: ChannelPair<f32>) {
        match (self.chains.get_mut(index), pair) {
            (Some(chain), ChannelPair::InPlace(buf)) => chain.process(buf),
            (Some(chain), ChannelPair::InputOutput(input, output)) => {
                let len = input.len().min(output.len());
                output[..len].copy_from_slice(&input[..len]);
                output[len..].fill(0.0);
                chain.process(&mut output[..len]);
            }
            (None, ChannelPair::InPlace(buf)) => buf.fill(0.0),
            (_, ChannelPair::InputOutput(_, output) | ChannelPair::OutputOnly(output)) => {
                output.fill(0.0);
            }
            (_, ChannelPair::InputOnly(_)) => {}
        }
    }

    /// Filter every port. Only the main port (index 0) is processed; any
    /// other port's outputs are cleared.
    fn process_audio(&mut self, audio: &mut Audio) -> Result<(), PluginError> {
        for (port_index, mut port_pair) in audio.into_iter().enumerate() {
            // Skip f64-only ports.
            let Some(mut channels) = port_pair.channels()?.into_f32() else {
                continue;
            };

            for i in 0..channels.channel_pair_count() {
                let Some(pair) = channels.channel_pair(i) else {
                    continue;
                };
                if port_index == 0 {
                    self.process_channel_pair(i, pair);
                } else {
                    clear_output(pair);
                }
            }
        }

        Ok(())
    }
}

/// Zero the output side of a channel pair.
fn clear_output(pair: ChannelPair<f32>) {
    match pair {
        ChannelPair::InPlace(buf) | ChannelPair::OutputOnly(buf) => buf.fill(0.0),
        ChannelPair::InputOutput(_, output) => output.fill(0.0),
        ChannelPair::InputOnly(_) => {}
    }
}

impl<'a> PluginAudioProcessor<'a, LowCutShared, LowCutMainThread<'a>> for LowCutAudioProcessor<'a> {
    fn activate(
        _host: HostAudioProcessorHandle<'a>,
        main_thread: &mut LowCutMainThread<'a>,
        shared: &'a LowCutShared,
        audio_config: PluginAudioConfiguration,
    ) -> Result<Self, PluginError> {
        let spec = ProcessSpec::new(
            audio_config.sample_rate as f32,
            audio_config.max_frames_count as usize,
            main_thread.layout().channel_count() as usize,
        );
        tracing::info!(
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            channels = spec.num_channels,
            "lowcut activated"
        );
        Ok(Self::new(shared, &spec))
    }

    fn process(
        &mut self,
        _process: Process,
        mut audio: Audio,
        events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        // Apply parameter changes from host automation events.
        self.shared.apply_param_events(events.input);

        self.begin_block();
        self.process_audio(&mut audio)?;

        Ok(ProcessStatus::ContinueIfNotQuiet)
    }

    fn deactivate(self, _main_thread: &mut LowCutMainThread<'_>) {
        tracing::info!("lowcut deactivated");
    }

    fn reset(&mut self) {
        for chain in &mut self.chains {
            chain.reset();
        }
    }
}

impl PluginAudioProcessorParams for LowCutAudioProcessor<'_> {
    fn flush(&mut self, input: &InputEvents, _output: &mut OutputEvents) {
        self.shared.apply_param_events(input);
    }
}

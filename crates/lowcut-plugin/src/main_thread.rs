//! Main-thread plugin implementation for the lowcut CLAP plugin.
//!
//! Handles parameter metadata queries, state save/restore, latency, the
//! audio port layout and the host's choice between mono and stereo. All methods run on the host's main thread, never on
//! the audio thread.

use crate::shared::LowCutShared;
use clack_extensions::audio_ports::{
    AudioPortFlags, AudioPortInfo, AudioPortInfoWriter, AudioPortType, PluginAudioPortsImpl,
};
use clack_extensions::audio_ports_config::{
    AudioPortConfigWriter, AudioPortsConfiguration, MainPortInfo, PluginAudioPortsConfigImpl,
};
use clack_extensions::latency::PluginLatencyImpl;
use clack_extensions::params::{
    ParamDisplayWriter, ParamInfo, ParamInfoFlags, ParamInfoWriter, PluginMainThreadParams,
};
use clack_extensions::state::PluginStateImpl;
use clack_plugin::prelude::*;
use clack_plugin::stream::{InputStream, OutputStream};
use clack_plugin::utils::Cookie;
use lowcut_core::ParamFlags;
use std::io::{Read, Write};

/// Main port layouts offered to the host.
///
/// The port config id is the position in [`ChannelLayout::ALL`]; stereo is
/// first and is the layout before the host selects one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// One channel in, one out.
    Mono,
    /// Two channels in, two out, each through its own chain.
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Every layout, indexed by config id.
    pub const ALL: [Self; 2] = [Self::Stereo, Self::Mono];

    /// Port config id reported to the host.
    pub fn id(self) -> u32 {
        match self {
            Self::Stereo => 0,
            Self::Mono => 1,
        }
    }

    /// Layout for a host-supplied config id.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Channels on the main input and output port.
    pub fn channel_count(self) -> u32 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    /// Config name shown by the host.
    pub fn name(self) -> &'static [u8] {
        match self {
            Self::Mono => b"Mono",
            Self::Stereo => b"Stereo",
        }
    }

    /// CLAP port type of the main port.
    pub fn port_type(self) -> AudioPortType<'static> {
        match self {
            Self::Mono => AudioPortType::MONO,
            Self::Stereo => AudioPortType::STEREO,
        }
    }
}

/// Main-thread state for the lowcut plugin.
pub struct LowCutMainThread<'a> {
    shared: &'a LowCutShared,
    layout: ChannelLayout,
}

impl<'a> LowCutMainThread<'a> {
    /// Create a new main-thread handler referencing the shared state.
    pub fn new(shared: &'a LowCutShared) -> Self {
        Self {
            shared,
            layout: ChannelLayout::default(),
        }
    }

    /// Main port layout the host last selected.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }
}

impl<'a> PluginMainThread<'a, LowCutShared> for LowCutMainThread<'a> {}

// ── Parameter Extension ─────────────────────────────────────────────────────

/// Map core `ParamFlags` to CLAP `ParamInfoFlags`.
fn map_flags(flags: ParamFlags) -> ParamInfoFlags {
    let mut clap_flags = ParamInfoFlags::empty();

    if flags.contains(ParamFlags::AUTOMATABLE) {
        clap_flags |= ParamInfoFlags::IS_AUTOMATABLE;
    }
    if flags.contains(ParamFlags::STEPPED) {
        clap_flags |= ParamInfoFlags::IS_STEPPED;
    }

    clap_flags
}

impl PluginMainThreadParams for LowCutMainThread<'_> {
    fn count(&mut self) -> u32 {
        self.shared.param_count() as u32
    }

    fn get_info(&mut self, param_index: u32, info: &mut ParamInfoWriter) {
        let Some(desc) = self.shared.descriptor(param_index as usize) else {
            return;
        };

        info.set(&ParamInfo {
            id: ClapId::new(desc.id.0),
            name: desc.name.as_bytes(),
            module: b"",
            min_value: f64::from(desc.min),
            max_value: f64::from(desc.max),
            default_value: f64::from(desc.default),
            flags: map_flags(desc.flags),
            cookie: Cookie::default(),
        });
    }

    fn get_value(&mut self, param_id: ClapId) -> Option<f64> {
        let index = self.shared.index_by_id(param_id.get())?;
        self.shared.get_value(index).map(f64::from)
    }

    fn value_to_text(
        &mut self,
        param_id: ClapId,
        value: f64,
        writer: &mut ParamDisplayWriter,
    ) -> core::fmt::Result {
        use core::fmt::Write;

        let desc = self
            .shared
            .index_by_id(param_id.get())
            .and_then(|index| self.shared.descriptor(index));
        match desc {
            Some(desc) => write!(writer, "{}", desc.format_value(value as f32)),
            None => write!(writer, "{value:.2}"),
        }
    }

    fn text_to_value(&mut self, param_id: ClapId, text: &core::ffi::CStr) -> Option<f64> {
        let index = self.shared.index_by_id(param_id.get())?;
        let desc = self.shared.descriptor(index)?;
        let s = text.to_str().ok()?;
        desc.parse_value(s).map(f64::from)
    }

    fn flush(&mut self, input: &InputEvents, _output: &mut OutputEvents) {
        self.shared.apply_param_events(input);
    }
}

// ── State Extension ─────────────────────────────────────────────────────────

/// State format: JSON object mapping stable ParamId to f64 value.
///
/// ```json
/// {"100": 80.0}
/// ```
impl PluginStateImpl for LowCutMainThread<'_> {
    fn save(&mut self, output: &mut OutputStream) -> Result<(), PluginError> {
        let json = self
            .shared
            .save_state()
            .map_err(|_| PluginError::Message("Failed to serialize state"))?;

        output
            .write_all(&json)
            .map_err(|_| PluginError::Message("Failed to write state"))?;

        Ok(())
    }

    fn load(&mut self, input: &mut InputStream) -> Result<(), PluginError> {
        let mut buf = Vec::new();
        input
            .read_to_end(&mut buf)
            .map_err(|_| PluginError::Message("Failed to read state"))?;

        match self.shared.load_state(&buf) {
            Ok(restored) => {
                tracing::debug!(restored, "state loaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("rejected plugin state: {e}");
                Err(PluginError::Message("Invalid plugin state"))
            }
        }
    }
}

// ── Latency Extension ───────────────────────────────────────────────────────

impl PluginLatencyImpl for LowCutMainThread<'_> {
    fn get(&mut self) -> u32 {
        // IIR filtering adds no delay.
        0
    }
}

// ── Audio Ports Extension ───────────────────────────────────────────────────

impl PluginAudioPortsImpl for LowCutMainThread<'_> {
    fn count(&mut self, _is_input: bool) -> u32 {
        1
    }

    fn get(&mut self, index: u32, _is_input: bool, writer: &mut AudioPortInfoWriter) {
        if index == 0 {
            writer.set(&AudioPortInfo {
                id: ClapId::new(0),
                name: b"Main",
                channel_count: self.layout.channel_count(),
                flags: AudioPortFlags::IS_MAIN,
                port_type: Some(self.layout.port_type()),
                in_place_pair: None,
            });
        }
    }
}

// ── Audio Ports Config Extension ────────────────────────────────────────────

fn main_port(layout: ChannelLayout) -> MainPortInfo<'static> {
    MainPortInfo {
        channel_count: layout.channel_count(),
        port_type: Some(layout.port_type()),
    }
}

impl PluginAudioPortsConfigImpl for LowCutMainThread<'_> {
    fn count(&mut self) -> u32 {
        ChannelLayout::ALL.len() as u32
    }

    fn get(&mut self, index: u32, writer: &mut AudioPortConfigWriter) {
        let Some(layout) = ChannelLayout::from_id(index) else {
            return;
        };
        writer.write(&AudioPortsConfiguration {
            id: ClapId::new(layout.id()),
            name: layout.name(),
            input_port_count: 1,
            output_port_count: 1,
            main_input: Some(main_port(layout)),
            main_output: Some(main_port(layout)),
        });
    }

    fn select(&mut self, config_id: ClapId) -> Result<(), PluginError> {
        let layout = ChannelLayout::from_id(config_id.get())
            .ok_or(PluginError::Message("Unknown port configuration"))?;
        tracing::debug!(?layout, "port configuration selected");
        self.layout = layout;
        Ok(())
    }
}

//! CLAP plugin adapter for the lowcut filter.
//!
//! This crate bridges lowcut-core's [`FilterChain`](lowcut_core::FilterChain)
//! and [`ParameterInfo`](lowcut_core::ParameterInfo) to the CLAP plugin format
//! via the `clack-plugin` safe wrapper. The library builds as a `cdylib`;
//! rename the output to `.clap` to load it in a host.
//!
//! # Architecture
//!
//! ```text
//! Main thread              Audio thread
//! ───────────              ────────────
//! param queries            reads LowCutShared once per block
//! state save/load          designs (cached) and loads both chains
//! writes LowCutShared      filters L and R through their own chain
//! ```
//!
//! The adapter maps core types directly to CLAP concepts:
//!
//! | Core | CLAP |
//! |------|------|
//! | `ParamId(u32)` | `clap_id` |
//! | `ParamDescriptor::format_value()` | `value_to_text()` |
//! | `ParamDescriptor::parse_value()` | `text_to_value()` |
//! | `ParamFlags::AUTOMATABLE` | `CLAP_PARAM_IS_AUTOMATABLE` |
//! | `ProcessSpec` | `activate(sample_rate, max_frames_count)` |

pub mod audio;
pub mod main_thread;
pub mod shared;

pub use audio::LowCutAudioProcessor;
pub use main_thread::{ChannelLayout, LowCutMainThread};
pub use shared::{LowCutShared, StateError};

use clack_extensions::audio_ports::PluginAudioPorts;
use clack_extensions::audio_ports_config::PluginAudioPortsConfig;
use clack_extensions::latency::PluginLatency;
use clack_extensions::params::PluginParams;
use clack_extensions::state::PluginState;
use clack_plugin::prelude::*;

/// Reverse-DNS plugin identifier.
pub const PLUGIN_ID: &str = "com.lowcut.lowcut";

/// Display name reported to hosts.
pub const PLUGIN_NAME: &str = "LowCut";

/// The lowcut plugin type.
///
/// Ties together [`LowCutShared`], [`LowCutAudioProcessor`], and
/// [`LowCutMainThread`].
pub struct LowCutPlugin;

impl Plugin for LowCutPlugin {
    type AudioProcessor<'a> = LowCutAudioProcessor<'a>;
    type Shared<'a> = LowCutShared;
    type MainThread<'a> = LowCutMainThread<'a>;

    fn declare_extensions(builder: &mut PluginExtensions<Self>, _shared: Option<&LowCutShared>) {
        builder.register::<PluginAudioPorts>();
        builder.register::<PluginAudioPortsConfig>();
        builder.register::<PluginLatency>();
        builder.register::<PluginParams>();
        builder.register::<PluginState>();
    }
}

impl DefaultPluginFactory for LowCutPlugin {
    fn get_descriptor() -> PluginDescriptor {
        use clack_plugin::plugin::features::{AUDIO_EFFECT, FILTER, MONO, STEREO};
        PluginDescriptor::new(PLUGIN_ID, PLUGIN_NAME)
            .with_features([AUDIO_EFFECT, FILTER, MONO, STEREO])
    }

    fn new_shared(_host: HostSharedHandle<'_>) -> Result<LowCutShared, PluginError> {
        tracing::info!("lowcut plugin instance created");
        Ok(LowCutShared::new())
    }

    fn new_main_thread<'a>(
        _host: HostMainThreadHandle<'a>,
        shared: &'a LowCutShared,
    ) -> Result<LowCutMainThread<'a>, PluginError> {
        Ok(LowCutMainThread::new(shared))
    }
}

// The entry macro expands to the exported `clap_entry` static and its FFI glue.
#[allow(unsafe_code)]
mod entry {
    clack_plugin::clack_export_entry!(clack_plugin::prelude::SinglePluginEntry<super::LowCutPlugin>);
}

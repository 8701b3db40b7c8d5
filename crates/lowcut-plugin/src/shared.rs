//! Thread-safe shared state for the lowcut CLAP plugin.
//!
//! `LowCutShared` lives for the lifetime of the plugin instance and is
//! accessible from both the main thread (params, state) and the audio
//! thread (processing). Parameter values are stored as atomic `u32`
//! (f32 bit-cast) for lock-free access.

use clack_plugin::events::spaces::CoreEventSpace;
use clack_plugin::prelude::InputEvents;
use lowcut_core::{FilterParameters, ParamDescriptor, ParameterInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Errors from restoring saved plugin state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The blob is not valid JSON.
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob is JSON but not an object.
    #[error("state is not a JSON object")]
    NotAnObject,
}

/// Inner storage for plugin shared state.
struct LowCutSharedData {
    /// Parameter descriptors, indexed by parameter position.
    descriptors: Vec<ParamDescriptor>,
    /// Current parameter values as f32 bit-cast to u32 for atomic access.
    values: Vec<AtomicU32>,
}

/// Shared state accessible from all plugin threads.
///
/// Holds the parameter descriptors (immutable after construction) and the
/// current parameter values as atomics. The audio processor reads values
/// here once per block; the main thread writes them in response to host
/// automation or state restore.
#[derive(Clone)]
pub struct LowCutShared {
    inner: Arc<LowCutSharedData>,
}

impl LowCutShared {
    /// Create shared state with every parameter at its default.
    pub fn new() -> Self {
        let layout = FilterParameters::default();
        let descriptors: Vec<ParamDescriptor> = (0..layout.param_count())
            .filter_map(|i| layout.param_info(i))
            .collect();
        let values = descriptors
            .iter()
            .map(|desc| AtomicU32::new(desc.default.to_bits()))
            .collect();

        Self {
            inner: Arc::new(LowCutSharedData {
                descriptors,
                values,
            }),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        self.inner.descriptors.len()
    }

    /// Get parameter descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.inner.descriptors.get(index)
    }

    /// All parameter descriptors.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.inner.descriptors
    }

    /// Find parameter index by stable `ParamId`.
    pub fn index_by_id(&self, id: u32) -> Option<usize> {
        self.inner.descriptors.iter().position(|d| d.id.0 == id)
    }

    /// Read the current value of a parameter (lock-free).
    pub fn get_value(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Write a parameter value (lock-free). Snaps to descriptor bounds and step.
    pub fn set_value(&self, index: usize, value: f32) {
        if let Some((atomic, desc)) = self
            .inner
            .values
            .get(index)
            .zip(self.inner.descriptors.get(index))
        {
            atomic.store(desc.snap(value).to_bits(), Ordering::Release);
        }
    }

    /// Write a parameter value addressed by its stable ID.
    ///
    /// Returns `false` for unknown IDs.
    pub fn set_value_by_id(&self, id: u32, value: f32) -> bool {
        match self.index_by_id(id) {
            Some(index) => {
                self.set_value(index, value);
                true
            }
            None => false,
        }
    }

    /// Apply every `ParamValue` event in `events` to the store.
    ///
    /// Shared by the audio thread's `process` and both `flush` paths.
    /// Returns how many events addressed a known parameter.
    pub fn apply_param_events(&self, events: &InputEvents) -> usize {
        let mut applied = 0;
        for event in events {
            if let Some(CoreEventSpace::ParamValue(ev)) = event.as_core_event()
                && let Some(param_id) = ev.param_id()
                && self.set_value_by_id(param_id.get(), ev.value() as f32)
            {
                applied += 1;
            }
        }
        applied
    }

    /// Snapshot of the store as the core's per-block parameter set.
    pub fn filter_parameters(&self) -> FilterParameters {
        let mut params = FilterParameters::default();
        for (i, atomic) in self.inner.values.iter().enumerate() {
            params.set_param(i, f32::from_bits(atomic.load(Ordering::Acquire)));
        }
        params
    }

    /// Serialize every parameter as a JSON object keyed by stable ID.
    ///
    /// ```json
    /// {"100": 20.0}
    /// ```
    ///
    /// Using stable IDs (not indices) keeps state valid across parameter
    /// reordering.
    pub fn save_state(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut state = serde_json::Map::new();
        for (i, desc) in self.inner.descriptors.iter().enumerate() {
            if let Some(val) = self.get_value(i) {
                state.insert(
                    desc.id.0.to_string(),
                    serde_json::Value::from(f64::from(val)),
                );
            }
        }
        serde_json::to_vec(&serde_json::Value::Object(state))
    }

    /// Restore parameters from [`save_state`](Self::save_state) output.
    ///
    /// Unknown IDs and non-numeric values are skipped; known values are
    /// snapped to range and step. Returns the number of parameters restored.
    pub fn load_state(&self, bytes: &[u8]) -> Result<usize, StateError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let Some(obj) = value.as_object() else {
            return Err(StateError::NotAnObject);
        };

        let mut restored = 0;
        for (key, val) in obj {
            let Ok(id) = key.parse::<u32>() else {
                continue;
            };
            let Some(v) = val.as_f64() else { continue };
            if self.set_value_by_id(id, v as f32) {
                restored += 1;
            }
        }
        Ok(restored)
    }
}

impl Default for LowCutShared {
    fn default() -> Self {
        Self::new()
    }
}

impl clack_plugin::prelude::PluginShared<'_> for LowCutShared {}

#[cfg(test)]
mod tests {
    use super::*;
    use clack_plugin::events::UnknownEvent;
    use clack_plugin::events::event_types::{ParamGestureBeginEvent, ParamValueEvent};
    use clack_plugin::events::io::EventBuffer;
    use clack_plugin::prelude::{ClapId, Pckn};
    use clack_plugin::utils::Cookie;
    use lowcut_core::CUTOFF_PARAM_ID;

    fn param_event(time: u32, id: u32, value: f64) -> ParamValueEvent {
        ParamValueEvent::new(time, ClapId::new(id), Pckn::match_all(), value, Cookie::empty())
    }

    fn push(buffer: &mut EventBuffer, event: &impl AsRef<UnknownEvent>) {
        let event: &UnknownEvent = event.as_ref();
        buffer.push(event);
    }

    #[test]
    fn shared_new_exposes_cutoff() {
        let shared = LowCutShared::new();
        assert_eq!(shared.param_count(), 1);
        let desc = shared.descriptor(0).unwrap();
        assert_eq!(desc.name, "LowCut Freq");
        assert_eq!(desc.id, CUTOFF_PARAM_ID);
    }

    #[test]
    fn shared_defaults_match_descriptors() {
        let shared = LowCutShared::new();
        for (i, desc) in shared.descriptors().iter().enumerate() {
            let val = shared.get_value(i).unwrap();
            assert_eq!(
                val, desc.default,
                "param {i} ({}) default mismatch: got {val}, expected {}",
                desc.name, desc.default
            );
        }
    }

    #[test]
    fn shared_set_value_clamps() {
        let shared = LowCutShared::new();
        let desc = *shared.descriptor(0).unwrap();

        // Above max clamps.
        shared.set_value(0, desc.max + 100.0);
        assert_eq!(shared.get_value(0).unwrap(), desc.max);

        // Below min clamps.
        shared.set_value(0, desc.min - 100.0);
        assert_eq!(shared.get_value(0).unwrap(), desc.min);

        // NaN falls back to the default.
        shared.set_value(0, f32::NAN);
        assert_eq!(shared.get_value(0).unwrap(), desc.default);
    }

    #[test]
    fn shared_set_value_snaps_to_step() {
        let shared = LowCutShared::new();
        shared.set_value(0, 440.37);
        assert_eq!(shared.get_value(0), Some(440.0));
        shared.set_value(0, 440.5);
        assert_eq!(shared.get_value(0), Some(441.0));
        shared.set_value(0, 20.2);
        assert_eq!(shared.get_value(0), Some(20.0));
    }

    #[test]
    fn param_events_update_store() {
        let shared = LowCutShared::new();
        let mut buffer = EventBuffer::new();
        push(&mut buffer, &ParamGestureBeginEvent::new(0, ClapId::new(CUTOFF_PARAM_ID.0)));
        push(&mut buffer, &param_event(0, CUTOFF_PARAM_ID.0, 250.0));
        push(&mut buffer, &param_event(4, 999, 1.0));
        push(&mut buffer, &param_event(8, CUTOFF_PARAM_ID.0, 1234.6));

        let events = InputEvents::from_buffer(&buffer);
        assert_eq!(shared.apply_param_events(&events), 2);
        // Last event wins, snapped to the 1 Hz grid.
        assert_eq!(shared.get_value(0), Some(1235.0));
        assert_eq!(shared.filter_parameters().cutoff_hz, 1235.0);
    }

    #[test]
    fn param_events_clamp_out_of_range() {
        let shared = LowCutShared::new();
        let mut buffer = EventBuffer::new();
        push(&mut buffer, &param_event(0, CUTOFF_PARAM_ID.0, 1e9));
        let events = InputEvents::from_buffer(&buffer);
        assert_eq!(shared.apply_param_events(&events), 1);
        assert_eq!(shared.get_value(0), Some(20000.0));

        let empty = EventBuffer::new();
        assert_eq!(shared.apply_param_events(&InputEvents::from_buffer(&empty)), 0);
    }

    #[test]
    fn shared_index_by_id_finds_params() {
        let shared = LowCutShared::new();
        assert_eq!(shared.index_by_id(CUTOFF_PARAM_ID.0), Some(0));
        assert_eq!(shared.index_by_id(999), None);
        assert!(shared.set_value_by_id(CUTOFF_PARAM_ID.0, 300.0));
        assert!(!shared.set_value_by_id(999, 300.0));
        assert_eq!(shared.get_value(0), Some(300.0));
    }

    #[test]
    fn shared_out_of_range_safe() {
        let shared = LowCutShared::new();
        assert_eq!(shared.get_value(999), None);
        assert_eq!(shared.descriptor(999), None);
        // Should not panic.
        shared.set_value(999, 1.0);
    }

    #[test]
    fn filter_parameters_snapshot() {
        let shared = LowCutShared::new();
        assert_eq!(shared.filter_parameters(), FilterParameters::default());

        shared.set_value(0, 1234.0);
        let params = shared.filter_parameters();
        assert_eq!(params.cutoff_hz, 1234.0);
        assert_eq!(params.order, FilterParameters::DEFAULT_ORDER);
    }

    #[test]
    fn clones_share_values() {
        let shared = LowCutShared::new();
        let other = shared.clone();
        other.set_value(0, 5000.0);
        assert_eq!(shared.get_value(0), Some(5000.0));
    }

    #[test]
    fn state_roundtrip_json() {
        let shared = LowCutShared::new();
        shared.set_value(0, 440.0);
        let json = shared.save_state().unwrap();

        let restored = LowCutShared::new();
        assert_eq!(restored.load_state(&json).unwrap(), 1);
        assert_eq!(restored.get_value(0), Some(440.0));
    }

    #[test]
    fn load_state_rejects_garbage() {
        let shared = LowCutShared::new();
        assert!(matches!(
            shared.load_state(b"not json"),
            Err(StateError::Json(_))
        ));
        assert!(matches!(
            shared.load_state(b"[1, 2]"),
            Err(StateError::NotAnObject)
        ));
        assert_eq!(shared.get_value(0), Some(20.0));
    }

    #[test]
    fn load_state_skips_unknown_entries() {
        let shared = LowCutShared::new();
        let restored = shared
            .load_state(br#"{"100": 99999.0, "7": 1.0, "abc": 2.0, "100x": "loud"}"#)
            .unwrap();
        assert_eq!(restored, 1);
        assert_eq!(shared.get_value(0), Some(20000.0));
    }

    #[test]
    fn state_error_display() {
        assert_eq!(
            StateError::NotAnObject.to_string(),
            "state is not a JSON object"
        );
    }
}

//! LOAD_DATA: payload descriptors (mass, center of mass, inertia), copied
//! as one opaque string.

use super::{IndexedGrammar, RecordKind};
use crate::events::EventSink;

/// Payload written by a purge. A mass of `-1` marks the load as undefined.
pub const DEFAULT_LOAD: &str = "M -1.00000,CM {X 0.0,Y 0.0,Z 0.0,A 0.0,B 0.0,C 0.0},J {X 0.0,Y 0.0,Z 0.0}";

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadRecord;

impl IndexedGrammar for LoadRecord {
    type Value = String;

    fn kind(&self) -> RecordKind {
        RecordKind::LoadData
    }

    fn parse_source(&self, payload: &str, _sink: &mut dyn EventSink) -> String {
        payload.trim().to_string()
    }

    fn merge(&self, _target_payload: &str, source: &String, _sink: &mut dyn EventSink) -> String {
        source.clone()
    }

    fn render(&self, key: u64, value: &String) -> String {
        format!("LOAD_DATA[{key}]={{ {value} }}")
    }

    fn purge_line(&self, key: u64) -> String {
        self.render(key, &DEFAULT_LOAD.to_string())
    }

    fn purge_label(&self) -> &'static str {
        "default values"
    }

    fn describe_update(&self, key: u64, value: &String) -> String {
        format!("Updated LOAD_DATA[{key}] with values from source file: {{{value}}}")
    }

    fn emphasize_updates(&self) -> bool {
        false
    }
}

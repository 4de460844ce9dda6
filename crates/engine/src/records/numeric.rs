//! BASE_DATA and TOOL_DATA: integer-keyed frames over the X/Y/Z/A/B/C axes.
//!
//! The two kinds share a grammar but not a merge policy. BASE_DATA rebuilds
//! the frame from the source's axes alone, so target axes the source does not
//! mention are gone; TOOL_DATA keeps them.

use std::sync::LazyLock;

use regex::Regex;

use super::{IndexedGrammar, RecordKind};
use crate::events::{emit, EventSink, LogLevel};
use crate::fields::FieldList;

/// Canonical axis order, used for purged lines.
pub const FRAME_AXES: [&str; 6] = ["X", "Y", "Z", "A", "B", "C"];

pub const ZERO: &str = "0.0";

/// What happens to target axes the source does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAxisPolicy {
    /// Drop them: the merged frame has exactly the source's axes.
    Reset,
    /// Keep the target's value.
    Preserve,
}

/// Grammar for one frame kind.
#[derive(Debug, Clone, Copy)]
pub struct FrameRecord {
    kind: RecordKind,
    policy: MissingAxisPolicy,
}

impl FrameRecord {
    pub const BASE_DATA: FrameRecord = FrameRecord {
        kind: RecordKind::BaseData,
        policy: MissingAxisPolicy::Reset,
    };

    pub const TOOL_DATA: FrameRecord = FrameRecord {
        kind: RecordKind::ToolData,
        policy: MissingAxisPolicy::Preserve,
    };
}

/// `X 335.22`, `C -90`, `Y 1.5E-03`.
fn axis_field() -> &'static Regex {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([XYZABC])\s+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)$").unwrap()
    });
    &RE
}

/// Parse a comma-separated axis list, dropping anything that is not a known
/// axis followed by a number.
pub fn parse_axes(payload: &str, sink: &mut dyn EventSink) -> FieldList {
    let mut fields = FieldList::new();
    for raw in payload.split(',') {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        match axis_field().captures(value) {
            Some(caps) => fields.set(&caps[1], &caps[2]),
            None => emit(sink, LogLevel::Warning, format!("Skipping invalid value: {value}")),
        }
    }
    fields
}

/// Parse a target payload as `name value` pairs split on the first
/// whitespace. Unknown names are kept; tokens without a value are dropped.
pub(crate) fn parse_pairs(payload: &str, sink: &mut dyn EventSink) -> FieldList {
    let mut fields = FieldList::new();
    for raw in payload.split(',') {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        match value.split_once(char::is_whitespace) {
            Some((name, val)) => fields.set(name.trim(), val.trim()),
            None => emit(sink, LogLevel::Warning, format!("Skipping invalid target value: {value}")),
        }
    }
    fields
}

impl IndexedGrammar for FrameRecord {
    type Value = FieldList;

    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn parse_source(&self, payload: &str, sink: &mut dyn EventSink) -> FieldList {
        parse_axes(payload, sink)
    }

    fn merge(&self, target_payload: &str, source: &FieldList, sink: &mut dyn EventSink) -> FieldList {
        match self.policy {
            MissingAxisPolicy::Reset => source.clone(),
            MissingAxisPolicy::Preserve => {
                let mut merged = parse_pairs(target_payload, sink);
                merged.overlay(source);
                merged
            }
        }
    }

    fn render(&self, key: u64, value: &FieldList) -> String {
        format!("{}[{key}]={{ {} }}", self.kind, value.render(", "))
    }

    fn purge_line(&self, key: u64) -> String {
        let zeros = FieldList::uniform(&FRAME_AXES, ZERO);
        format!("{}[{key}]={{{}}}", self.kind, zeros.render(", "))
    }

    fn purge_label(&self) -> &'static str {
        ZERO
    }

    fn describe_update(&self, key: u64, value: &FieldList) -> String {
        format!("Updated {}[{key}] with values from source file: {value}", self.kind)
    }
}

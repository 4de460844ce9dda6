//! TOOL_TYPE and BASE_TYPE: integer-keyed symbolic tags such as `#NONE`.

use super::{IndexedGrammar, RecordKind};
use crate::events::EventSink;

pub const NONE_TAG: &str = "#NONE";

#[derive(Debug, Clone, Copy)]
pub struct TagRecord {
    kind: RecordKind,
}

impl TagRecord {
    pub const TOOL_TYPE: TagRecord = TagRecord { kind: RecordKind::ToolType };
    // Assumed peer of TOOL_TYPE: `BASE_TYPE[i]=#TAG`.
    pub const BASE_TYPE: TagRecord = TagRecord { kind: RecordKind::BaseType };
}

impl IndexedGrammar for TagRecord {
    type Value = String;

    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn parse_source(&self, payload: &str, _sink: &mut dyn EventSink) -> String {
        format!("#{}", payload.trim())
    }

    fn merge(&self, _target_payload: &str, source: &String, _sink: &mut dyn EventSink) -> String {
        source.clone()
    }

    fn render(&self, key: u64, value: &String) -> String {
        format!("{}[{key}]={value}", self.kind)
    }

    fn purge_line(&self, key: u64) -> String {
        format!("{}[{key}]={NONE_TAG}", self.kind)
    }

    fn purge_label(&self) -> &'static str {
        NONE_TAG
    }

    fn describe_update(&self, key: u64, value: &String) -> String {
        format!("Updated {}[{key}] to {value}.", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use crate::lines::LineStore;
    use crate::records::{run_indexed, Operation};

    #[test]
    fn tag_copied() {
        let source = LineStore::from_lines(["TOOL_TYPE[3]=#FIXED"]);
        let mut target = LineStore::from_lines(["TOOL_TYPE[3]=#NONE", "TOOL_TYPE[4]=#NONE"]);
        let mut events = EventCollector::new();
        let outcome = run_indexed(&TagRecord::TOOL_TYPE, Operation::Update(&source), &mut target, &mut events);
        assert!(outcome.changed);
        assert_eq!(target.get(0), Some("TOOL_TYPE[3]=#FIXED"));
        assert_eq!(target.get(1), Some("TOOL_TYPE[4]=#NONE"));
        assert!(events.contains("Updated TOOL_TYPE[3] to #FIXED."));
    }

    #[test]
    fn identical_tag_is_not_a_change() {
        let source = LineStore::from_lines(["BASE_TYPE[1]=#BASE"]);
        let mut target = LineStore::from_lines(["BASE_TYPE[1]=#BASE"]);
        let mut events = EventCollector::new();
        let outcome = run_indexed(&TagRecord::BASE_TYPE, Operation::Update(&source), &mut target, &mut events);
        assert_eq!(outcome.matched, 1);
        assert!(!outcome.changed);
    }

    #[test]
    fn purge_sets_none() {
        let mut target = LineStore::from_lines(["BASE_TYPE[7]=#TCP"]);
        let mut events = EventCollector::new();
        run_indexed(&TagRecord::BASE_TYPE, Operation::Purge, &mut target, &mut events);
        assert_eq!(target.get(0), Some("BASE_TYPE[7]=#NONE"));
    }
}

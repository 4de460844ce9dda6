//! TOOL_NAME and BASE_NAME: integer-keyed free-text labels.

use super::{IndexedGrammar, RecordKind};
use crate::events::EventSink;

#[derive(Debug, Clone, Copy)]
pub struct NameRecord {
    kind: RecordKind,
}

impl NameRecord {
    pub const TOOL_NAME: NameRecord = NameRecord { kind: RecordKind::ToolName };
    // Assumed peer of TOOL_NAME: `BASE_NAME[i,]="..."`.
    pub const BASE_NAME: NameRecord = NameRecord { kind: RecordKind::BaseName };
}

impl IndexedGrammar for NameRecord {
    type Value = String;

    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn parse_source(&self, payload: &str, _sink: &mut dyn EventSink) -> String {
        payload.trim().to_string()
    }

    fn merge(&self, _target_payload: &str, source: &String, _sink: &mut dyn EventSink) -> String {
        source.clone()
    }

    fn render(&self, key: u64, value: &String) -> String {
        format!("{}[{key},]=\"{value}\"", self.kind)
    }

    fn purge_line(&self, key: u64) -> String {
        self.render(key, &String::new())
    }

    fn purge_label(&self) -> &'static str {
        "an empty string"
    }

    fn describe_update(&self, key: u64, value: &String) -> String {
        format!("Updated {}[{key}] to \"{value}\".", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use crate::lines::LineStore;
    use crate::records::{run_indexed, Operation};

    #[test]
    fn name_copied_and_trimmed() {
        let source = LineStore::from_lines([r#"TOOL_NAME[2,]="  Welder 7 ""#]);
        let mut target = LineStore::from_lines([
            r#"TOOL_NAME[1,]="keep""#,
            r#"TOOL_NAME[2,]="old""#,
        ]);
        let mut events = EventCollector::new();
        let outcome = run_indexed(&NameRecord::TOOL_NAME, Operation::Update(&source), &mut target, &mut events);

        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.updated, 1);
        assert_eq!(target.get(0), Some(r#"TOOL_NAME[1,]="keep""#));
        assert_eq!(target.get(1), Some(r#"TOOL_NAME[2,]="Welder 7""#));
        assert!(events.events().iter().any(|e| e.emphasize && e.message.contains("Welder 7")));
    }

    #[test]
    fn empty_source_name_is_copied() {
        let source = LineStore::from_lines([r#"BASE_NAME[5,]="""#]);
        let mut target = LineStore::from_lines([r#"BASE_NAME[5,]="Table""#]);
        let mut events = EventCollector::new();
        run_indexed(&NameRecord::BASE_NAME, Operation::Update(&source), &mut target, &mut events);
        assert_eq!(target.get(0), Some(r#"BASE_NAME[5,]="""#));
    }

    #[test]
    fn purge_empties_names() {
        let mut target = LineStore::from_lines([r#"BASE_NAME[1,]="Table""#, r#"TOOL_NAME[1,]="x""#]);
        let mut events = EventCollector::new();
        let outcome = run_indexed(&NameRecord::BASE_NAME, Operation::Purge, &mut target, &mut events);
        assert!(outcome.changed);
        assert_eq!(target.get(0), Some(r#"BASE_NAME[1,]="""#));
        assert_eq!(target.get(1), Some(r#"TOOL_NAME[1,]="x""#));
    }
}

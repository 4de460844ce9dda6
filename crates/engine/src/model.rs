//! Robot-model identity check.
//!
//! Source files mention the model as a bare `KR<digits>` token; target files
//! declare it in `MACHINE_DEF[i]={NAME[] "KR ...`. Both sides are normalized
//! (spaces removed, uppercased) before comparison.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::events::{emit, EventSink, LogLevel};
use crate::lines::LineStore;

static SOURCE_MODEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)kr\s*\d+").unwrap());
static TARGET_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"MACHINE_DEF\[\d+\]=\{NAME\[\]\s*"(KR\s*\d+)"#).unwrap());

fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ').collect::<String>().to_uppercase()
}

fn first_match(lines: &LineStore, re: &Regex, group: usize) -> Option<String> {
    lines
        .iter()
        .find_map(|(_, line)| re.captures(line).and_then(|c| c.get(group)).map(|m| normalize(m.as_str())))
}

/// First `KR<digits>` token in the source, e.g. `KR210`.
pub fn source_model(source: &LineStore) -> Option<String> {
    first_match(source, &SOURCE_MODEL, 0)
}

/// Model named by the target's `MACHINE_DEF` declaration.
pub fn target_model(target: &LineStore) -> Option<String> {
    first_match(target, &TARGET_MODEL, 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelComparison {
    pub source: Option<String>,
    pub target: Option<String>,
}

impl ModelComparison {
    /// Both models found and equal.
    pub fn matches(&self) -> bool {
        matches!((&self.source, &self.target), (Some(s), Some(t)) if s == t)
    }
}

/// Compare the models declared by both files and report the result.
///
/// A mismatch is a WARNING; callers decide whether to continue.
pub fn compare(source: &LineStore, target: &LineStore, sink: &mut dyn EventSink) -> ModelComparison {
    let comparison = ModelComparison { source: source_model(source), target: target_model(target) };
    let shown = |m: &Option<String>| m.clone().unwrap_or_else(|| "Not Found".to_string());
    emit(sink, LogLevel::Info, format!("Source file model: {}", shown(&comparison.source)));
    emit(sink, LogLevel::Info, format!("Target file model: {}", shown(&comparison.target)));
    if comparison.matches() {
        emit(sink, LogLevel::Info, "Robot models match.");
    } else {
        emit(sink, LogLevel::Warning, "Robot models do not match.");
    }
    comparison
}

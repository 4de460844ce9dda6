//! Record kinds, line matchers and the shared indexed-record merge loop.
//!
//! Each supported record kind has one line grammar. Index-keyed grammars are
//! anchored at the start of the line; the E6AXIS grammar is searched anywhere
//! in the line so that declarations such as `DECL E6AXIS XHOME={...}` match.

pub mod e6axis;
pub mod load;
pub mod numeric;
pub mod symbol;
pub mod text;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::events::{emit, emit_emphasized, EventSink, LogLevel};
use crate::lines::LineStore;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The eight record kinds handled by the engine.
///
/// Declaration order is the order a transfer runs them in; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    BaseData,
    BaseName,
    BaseType,
    ToolData,
    ToolType,
    ToolName,
    LoadData,
    #[serde(rename = "E6AXIS")]
    E6Axis,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        Self::BaseData,
        Self::BaseName,
        Self::BaseType,
        Self::ToolData,
        Self::ToolType,
        Self::ToolName,
        Self::LoadData,
        Self::E6Axis,
    ];

    /// Keyword as written in configuration files.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::BaseData => "BASE_DATA",
            Self::BaseName => "BASE_NAME",
            Self::BaseType => "BASE_TYPE",
            Self::ToolData => "TOOL_DATA",
            Self::ToolType => "TOOL_TYPE",
            Self::ToolName => "TOOL_NAME",
            Self::LoadData => "LOAD_DATA",
            Self::E6Axis => "E6AXIS",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl std::fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let known: Vec<&str> = RecordKind::ALL.iter().map(|k| k.keyword()).collect();
        write!(f, "unknown record kind '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for RecordKind {
    type Err = UnknownKind;

    /// Case-insensitive; `-` and `_` are interchangeable (`tool-data`, `TOOL_DATA`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        RecordKind::ALL
            .into_iter()
            .find(|k| k.keyword() == normalized)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Line grammar for `kind`.
///
/// Capture 1 is the key, capture 2 the raw payload (brace or quote contents,
/// or the symbol without its `#`).
pub fn pattern(kind: RecordKind) -> &'static Regex {
    static BASE_DATA: LazyLock<Regex> = LazyLock::new(|| compile(r"^BASE_DATA\[(\d+)\]=\{(.*)\}"));
    static BASE_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r#"^BASE_NAME\[(\d+),\]="(.*)""#));
    static BASE_TYPE: LazyLock<Regex> = LazyLock::new(|| compile(r"^BASE_TYPE\[(\d+)\]=#(\w+)"));
    static TOOL_DATA: LazyLock<Regex> = LazyLock::new(|| compile(r"^TOOL_DATA\[(\d+)\]=\{(.*)\}"));
    static TOOL_TYPE: LazyLock<Regex> = LazyLock::new(|| compile(r"^TOOL_TYPE\[(\d+)\]=#(\w+)"));
    static TOOL_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r#"^TOOL_NAME\[(\d+),\]="(.*)""#));
    static LOAD_DATA: LazyLock<Regex> = LazyLock::new(|| compile(r"^LOAD_DATA\[(\d+)\]=\{(.*)\}"));
    static E6AXIS: LazyLock<Regex> =
        LazyLock::new(|| compile(r"E6AXIS\s+([A-Za-z0-9_]+)\s*=\s*\{(.*)\}"));

    match kind {
        RecordKind::BaseData => &BASE_DATA,
        RecordKind::BaseName => &BASE_NAME,
        RecordKind::BaseType => &BASE_TYPE,
        RecordKind::ToolData => &TOOL_DATA,
        RecordKind::ToolType => &TOOL_TYPE,
        RecordKind::ToolName => &TOOL_NAME,
        RecordKind::LoadData => &LOAD_DATA,
        RecordKind::E6Axis => &E6AXIS,
    }
}

/// Key of a matched record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKey {
    Index(u64),
    Name(String),
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

/// A line recognized as an instance of some record grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMatch<'a> {
    pub kind: RecordKind,
    pub key: RecordKey,
    pub payload: &'a str,
    /// Text before the record keyword. Always empty for indexed kinds.
    pub prefix: &'a str,
}

/// Match one line against the grammar for `kind`.
///
/// An index too large for `u64` is treated as a non-match.
pub fn match_line(kind: RecordKind, line: &str) -> Option<RecordMatch<'_>> {
    let caps = pattern(kind).captures(line)?;
    let whole = caps.get(0)?;
    let raw_key = caps.get(1)?.as_str();
    let payload = caps.get(2)?.as_str();
    let key = match kind {
        RecordKind::E6Axis => RecordKey::Name(raw_key.to_string()),
        _ => RecordKey::Index(raw_key.parse().ok()?),
    };
    Some(RecordMatch { kind, key, payload, prefix: &line[..whole.start()] })
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// What a merger does to the target.
///
/// Purge carries no source: purging never reads one.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Purge,
    Update(&'a LineStore),
}

/// Result of running one merger over a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Target lines that matched the kind's grammar.
    pub matched: usize,
    /// Target lines whose text was replaced.
    pub updated: usize,
    /// Whether this merger counts as having changed the target.
    pub changed: bool,
}

impl MergeOutcome {
    /// Purge reports a change whenever at least one line of the kind exists.
    pub(crate) fn purge(matched: usize, updated: usize) -> Self {
        Self { matched, updated, changed: matched > 0 }
    }

    pub(crate) fn update(matched: usize, updated: usize) -> Self {
        Self { matched, updated, changed: updated > 0 }
    }
}

// ---------------------------------------------------------------------------
// Indexed records
// ---------------------------------------------------------------------------

/// Per-kind behaviour of an integer-keyed record.
pub(crate) trait IndexedGrammar {
    type Value: std::fmt::Debug;

    fn kind(&self) -> RecordKind;

    /// Parse a source payload. Malformed parts are reported and dropped.
    fn parse_source(&self, payload: &str, sink: &mut dyn EventSink) -> Self::Value;

    /// Combine a target payload with the source value for the same key.
    fn merge(&self, target_payload: &str, source: &Self::Value, sink: &mut dyn EventSink) -> Self::Value;

    fn render(&self, key: u64, value: &Self::Value) -> String;

    fn purge_line(&self, key: u64) -> String;

    /// How purged values are described in log messages ("0.0", "#NONE", ...).
    fn purge_label(&self) -> &'static str;

    /// Log message for an updated line.
    fn describe_update(&self, key: u64, value: &Self::Value) -> String;

    fn emphasize_updates(&self) -> bool {
        true
    }
}

fn indexed_key(kind: RecordKind, line: &str) -> Option<(u64, &str)> {
    let m = match_line(kind, line)?;
    match m.key {
        RecordKey::Index(i) => Some((i, m.payload)),
        RecordKey::Name(_) => None,
    }
}

/// Parse every matching source line into `index -> value`. Later lines win.
pub(crate) fn collect_source<G: IndexedGrammar>(
    grammar: &G,
    source: &LineStore,
    sink: &mut dyn EventSink,
) -> BTreeMap<u64, G::Value> {
    let mut data = BTreeMap::new();
    for (_, line) in source.iter() {
        if let Some((key, payload)) = indexed_key(grammar.kind(), line) {
            let value = grammar.parse_source(payload, sink);
            data.insert(key, value);
        }
    }
    data
}

/// The purge/update loop shared by all indexed kinds.
pub(crate) fn run_indexed<G: IndexedGrammar>(
    grammar: &G,
    op: Operation<'_>,
    target: &mut LineStore,
    sink: &mut dyn EventSink,
) -> MergeOutcome {
    let kind = grammar.kind();
    emit(sink, LogLevel::Info, format!("Processing {kind}..."));

    match op {
        Operation::Purge => {
            let mut matched = 0;
            let mut updated = 0;
            for index in 0..target.len() {
                let Some(key) = target.get(index).and_then(|l| indexed_key(kind, l)).map(|(k, _)| k) else {
                    continue;
                };
                matched += 1;
                if target.replace(index, grammar.purge_line(key)) {
                    updated += 1;
                }
                emit(sink, LogLevel::Info, format!("Purged {kind}[{key}] to {}.", grammar.purge_label()));
            }
            MergeOutcome::purge(matched, updated)
        }
        Operation::Update(source) => {
            let source_data = collect_source(grammar, source, sink);
            emit(
                sink,
                LogLevel::Debug,
                format!("Parsed {} {kind} record(s) from source: {source_data:?}", source_data.len()),
            );

            let mut matched = 0;
            let mut updated = 0;
            for index in 0..target.len() {
                let Some((key, payload)) = target.get(index).and_then(|l| indexed_key(kind, l)) else {
                    continue;
                };
                matched += 1;
                let Some(source_value) = source_data.get(&key) else {
                    continue;
                };
                let merged = grammar.merge(payload, source_value, sink);
                let line = grammar.render(key, &merged);
                if target.replace(index, line) {
                    updated += 1;
                    let message = grammar.describe_update(key, &merged);
                    if grammar.emphasize_updates() {
                        emit_emphasized(sink, LogLevel::Info, message);
                    } else {
                        emit(sink, LogLevel::Info, message);
                    }
                } else {
                    emit(sink, LogLevel::Debug, format!("{kind}[{key}] already matches source."));
                }
            }
            MergeOutcome::update(matched, updated)
        }
    }
}

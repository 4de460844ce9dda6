//! E6AXIS: named joint-group positions over A1..A6 and E1..E6.
//!
//! Keys are identifiers rather than indices, and the source and target may
//! name the same position differently; see [`crate::resolver`]. Target axes
//! the source does not provide keep their value.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::numeric::{parse_pairs, ZERO};
use super::{match_line, MergeOutcome, Operation, RecordKey, RecordKind};
use crate::events::{emit, EventSink, LogLevel};
use crate::fields::FieldList;
use crate::lines::LineStore;
use crate::resolver::{resolve, NameMapping, NamePair, ResolverOptions};

/// Canonical axis order, used for purged lines.
pub const JOINT_AXES: [&str; 12] = [
    "A1", "A2", "A3", "A4", "A5", "A6", "E1", "E2", "E3", "E4", "E5", "E6",
];

/// `A1 0.0`, `E3 -12.75`.
fn joint_field() -> &'static Regex {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([AE]\d+)\s+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)$").unwrap()
    });
    &RE
}

/// Parse a source payload, dropping fields that are not `<A|E><n> <number>`.
pub fn parse_joints(payload: &str, sink: &mut dyn EventSink) -> FieldList {
    let mut fields = FieldList::new();
    for raw in payload.split(',') {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        match joint_field().captures(value) {
            Some(caps) => fields.set(&caps[1], &caps[2]),
            None => emit(sink, LogLevel::Warning, format!("Skipping invalid E6AXIS value: {value}")),
        }
    }
    fields
}

fn render(prefix: &str, key: &str, fields: &FieldList) -> String {
    format!("{prefix}E6AXIS {key}={{ {} }}", fields.render(", "))
}

/// Every E6AXIS record in `source`, by key. Later lines win.
pub fn source_records(source: &LineStore, sink: &mut dyn EventSink) -> BTreeMap<String, FieldList> {
    let mut data = BTreeMap::new();
    for (_, line) in source.iter() {
        let Some(m) = match_line(RecordKind::E6Axis, line) else {
            continue;
        };
        if let RecordKey::Name(key) = m.key {
            let fields = parse_joints(m.payload, sink);
            data.insert(key, fields);
        }
    }
    data
}

fn named_match(line: &str) -> Option<(String, String, String)> {
    let m = match_line(RecordKind::E6Axis, line)?;
    match m.key {
        RecordKey::Name(key) => Some((m.prefix.to_string(), key, m.payload.to_string())),
        RecordKey::Index(_) => None,
    }
}

/// Zero every E6AXIS record in `target`.
pub fn purge(target: &mut LineStore, sink: &mut dyn EventSink) -> MergeOutcome {
    let zeros = FieldList::uniform(&JOINT_AXES, ZERO);
    let mut matched = 0;
    let mut updated = 0;
    for index in 0..target.len() {
        let Some((prefix, key, _)) = target.get(index).and_then(named_match) else {
            continue;
        };
        matched += 1;
        if target.replace(index, render(&prefix, &key, &zeros)) {
            updated += 1;
        }
        emit(sink, LogLevel::Info, format!("Purged E6AXIS {key} to {ZERO}."));
    }
    MergeOutcome::purge(matched, updated)
}

/// Overlay source records onto target records through `mapping`.
pub fn update(
    source_data: &BTreeMap<String, FieldList>,
    mapping: &NameMapping,
    target: &mut LineStore,
    sink: &mut dyn EventSink,
) -> MergeOutcome {
    let mut matched = 0;
    let mut updated = 0;
    for index in 0..target.len() {
        let Some((prefix, key, payload)) = target.get(index).and_then(named_match) else {
            continue;
        };
        matched += 1;
        let source_key = mapping.source_for(&key);
        let Some(source_fields) = source_data.get(source_key) else {
            continue;
        };
        let mut merged = parse_pairs(&payload, sink);
        merged.overlay(source_fields);
        if target.replace(index, render(&prefix, &key, &merged)) {
            updated += 1;
            emit(
                sink,
                LogLevel::Info,
                format!("Updated E6AXIS {key} with values from source key {source_key}: {merged}"),
            );
        } else {
            emit(sink, LogLevel::Debug, format!("E6AXIS {key} already matches source key {source_key}."));
        }
    }
    MergeOutcome::update(matched, updated)
}

/// Run the E6AXIS merger.
pub fn run(
    op: Operation<'_>,
    seed: &[NamePair],
    options: ResolverOptions,
    target: &mut LineStore,
    sink: &mut dyn EventSink,
) -> MergeOutcome {
    emit(sink, LogLevel::Info, "Processing E6AXIS...");
    let source = match op {
        Operation::Purge => return purge(target, sink),
        Operation::Update(source) => source,
    };

    let seed_list: Vec<String> = seed.iter().map(ToString::to_string).collect();
    emit(sink, LogLevel::Info, format!("E6AXIS name seeds: {}", seed_list.join(", ")));

    let source_data = source_records(source, sink);
    let keys: Vec<&str> = source_data.keys().map(String::as_str).collect();
    emit(
        sink,
        LogLevel::Debug,
        format!("Parsed {} E6AXIS record(s) from source: {}", keys.len(), keys.join(", ")),
    );

    let source_keys: Vec<String> = source_data.keys().cloned().collect();
    let mapping = resolve(seed, &source_keys, options, sink);
    let outcome = update(&source_data, &mapping, target, sink);
    if outcome.changed {
        emit(sink, LogLevel::Info, format!("Successfully updated {} E6AXIS record(s).", outcome.updated));
    } else {
        emit(sink, LogLevel::Info, "No E6AXIS keys were updated.");
    }
    outcome
}

//! Name resolution for E6AXIS records.
//!
//! Source and target files often name the same joint-group positions
//! differently (`HOME3` in one, `XHOME3` in the other). A seed of base-name
//! pairs is expanded into a full target -> source mapping in two phases:
//!
//! 1. **Literal suffix**: every source key starting with a seed's source base
//!    maps from `target_base + suffix`, where the suffix is the literal text
//!    after the base (`HOME3` -> `XHOME3`, `HOME` -> `XHOME`).
//! 2. **Indexed fallback**: a seed whose source base is not itself a source
//!    key is numbered: matching source keys are sorted as plain strings and
//!    assigned `target_base1`, `target_base2`, ... in that order. Entries from
//!    the first phase win over fallback entries for the same target key.
//!    String order puts `HOME10` before `HOME2`; this is the established
//!    behaviour and is kept as is.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::{emit, EventSink, LogLevel};

/// Default target-side prefix for a bare seed name (`HOME` -> `XHOME`).
pub const DEFAULT_TARGET_PREFIX: &str = "X";

/// One seed entry: target base name -> source base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamePair {
    pub target: String,
    pub source: String,
}

impl NamePair {
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self { target: target.into(), source: source.into() }
    }

    /// Parse `TARGET=SOURCE`, or a bare `NAME` meaning `XNAME=NAME`.
    ///
    /// Returns `None` if either side is empty.
    pub fn parse(spec: &str) -> Option<Self> {
        let (target, source) = match spec.split_once('=') {
            Some((t, s)) => (t.trim().to_string(), s.trim().to_string()),
            None => {
                let name = spec.trim();
                (format!("{DEFAULT_TARGET_PREFIX}{name}"), name.to_string())
            }
        };
        if source.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self { target, source })
    }
}

impl Default for NamePair {
    fn default() -> Self {
        Self::new("XHOME", "HOME")
    }
}

impl std::fmt::Display for NamePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.target, self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolverOptions {
    /// Run the literal-suffix phase before the indexed fallback.
    pub literal_suffix: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { literal_suffix: true }
    }
}

/// Target key -> source key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMapping {
    entries: BTreeMap<String, String>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(target.into(), source.into());
    }

    /// Insert unless `target` is already mapped. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, target: impl Into<String>, source: impl Into<String>) -> bool {
        let mut inserted = false;
        self.entries.entry(target.into()).or_insert_with(|| {
            inserted = true;
            source.into()
        });
        inserted
    }

    pub fn get(&self, target: &str) -> Option<&str> {
        self.entries.get(target).map(String::as_str)
    }

    /// Source key for `target`, or `target` itself when unmapped.
    pub fn source_for<'a>(&'a self, target: &'a str) -> &'a str {
        self.get(target).unwrap_or(target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(t, s)| (t.as_str(), s.as_str()))
    }
}

impl std::fmt::Display for NameMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(t, s)| format!("{t} -> {s}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Source keys starting with `prefix`, in plain string order.
fn keys_with_prefix<'a>(source_keys: &'a [String], prefix: &str) -> Vec<&'a str> {
    let mut keys: Vec<&str> = source_keys
        .iter()
        .map(String::as_str)
        .filter(|k| k.starts_with(prefix))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Literal-suffix entries for one seed pair.
pub fn literal_suffix_entries(pair: &NamePair, source_keys: &[String]) -> Vec<(String, String)> {
    keys_with_prefix(source_keys, &pair.source)
        .into_iter()
        .map(|key| {
            let suffix = &key[pair.source.len()..];
            (format!("{}{suffix}", pair.target), key.to_string())
        })
        .collect()
}

/// Indexed-fallback entries for one seed pair, or `None` if no source key
/// has the seed's source base as a prefix.
pub fn indexed_entries(pair: &NamePair, source_keys: &[String]) -> Option<Vec<(String, String)>> {
    let keys = keys_with_prefix(source_keys, &pair.source);
    if keys.is_empty() {
        return None;
    }
    Some(
        keys.into_iter()
            .enumerate()
            .map(|(i, key)| (format!("{}{}", pair.target, i + 1), key.to_string()))
            .collect(),
    )
}

/// Expand `seed` into a full mapping against the keys present in the source.
pub fn resolve(
    seed: &[NamePair],
    source_keys: &[String],
    options: ResolverOptions,
    sink: &mut dyn EventSink,
) -> NameMapping {
    let mut mapping = NameMapping::new();
    for pair in seed {
        mapping.insert(pair.target.as_str(), pair.source.as_str());
    }

    if options.literal_suffix {
        for pair in seed {
            for (target, source) in literal_suffix_entries(pair, source_keys) {
                mapping.insert(target, source);
            }
        }
    }

    for pair in seed {
        if source_keys.iter().any(|k| *k == pair.source) {
            continue;
        }
        match indexed_entries(pair, source_keys) {
            None => emit(
                sink,
                LogLevel::Error,
                format!("Source key '{}' not found in source file.", pair.source),
            ),
            Some(entries) => {
                let found: Vec<&str> = entries.iter().map(|(_, s)| s.as_str()).collect();
                emit(
                    sink,
                    LogLevel::Info,
                    format!("Found indexed keys for '{}': {}", pair.source, found.join(", ")),
                );
                for (target, source) in entries {
                    mapping.insert_if_absent(target, source);
                }
            }
        }
    }

    emit(sink, LogLevel::Debug, format!("Generated name mapping: {mapping}"));
    mapping
}

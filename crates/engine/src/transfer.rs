//! Transfer orchestration over in-memory line stores.
//!
//! Runs the enabled mergers in a fixed order and ORs their change flags.
//! Persisting the result is the caller's job (see `robocfg-io`); the report
//! says whether there is anything to persist.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::events::{emit, EventSink, LogLevel};
use crate::lines::LineStore;
use crate::records::load::LoadRecord;
use crate::records::numeric::FrameRecord;
use crate::records::symbol::TagRecord;
use crate::records::text::NameRecord;
use crate::records::{e6axis, run_indexed, MergeOutcome, Operation, RecordKind};
use crate::resolver::{NamePair, ResolverOptions};

// ---------------------------------------------------------------------------
// Kind selection
// ---------------------------------------------------------------------------

/// A set of enabled record kinds. Iterates in transfer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KindSet(BTreeSet<RecordKind>);

impl KindSet {
    pub fn all() -> Self {
        Self(RecordKind::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, kind: RecordKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn insert(&mut self, kind: RecordKind) {
        self.0.insert(kind);
    }

    pub fn remove(&mut self, kind: RecordKind) {
        self.0.remove(&kind);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.0.iter().copied()
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<RecordKind> for KindSet {
    fn from_iter<T: IntoIterator<Item = RecordKind>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Options + report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    pub kinds: KindSet,
    /// E6AXIS seed pairs, target base -> source base.
    pub e6axis_seed: Vec<NamePair>,
    pub resolver: ResolverOptions,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            kinds: KindSet::all(),
            e6axis_seed: vec![NamePair::default()],
            resolver: ResolverOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    EmptyTarget,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTarget => write!(f, "target file is empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindOutcome {
    pub kind: RecordKind,
    #[serde(flatten)]
    pub outcome: MergeOutcome,
}

/// What one transfer or purge did to the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    /// Per enabled kind, in the order they ran.
    pub kinds: Vec<KindOutcome>,
    /// OR of every kind's change flag. Gates the write.
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<AbortReason>,
}

impl TransferReport {
    pub fn outcome(&self, kind: RecordKind) -> Option<&MergeOutcome> {
        self.kinds.iter().find(|k| k.kind == kind).map(|k| &k.outcome)
    }

    fn record(&mut self, kind: RecordKind, outcome: MergeOutcome) {
        self.changed |= outcome.changed;
        self.kinds.push(KindOutcome { kind, outcome });
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run the merger for one kind.
pub fn run_kind(
    kind: RecordKind,
    op: Operation<'_>,
    options: &TransferOptions,
    target: &mut LineStore,
    sink: &mut dyn EventSink,
) -> MergeOutcome {
    match kind {
        RecordKind::BaseData => run_indexed(&FrameRecord::BASE_DATA, op, target, sink),
        RecordKind::BaseName => run_indexed(&NameRecord::BASE_NAME, op, target, sink),
        RecordKind::BaseType => run_indexed(&TagRecord::BASE_TYPE, op, target, sink),
        RecordKind::ToolData => run_indexed(&FrameRecord::TOOL_DATA, op, target, sink),
        RecordKind::ToolType => run_indexed(&TagRecord::TOOL_TYPE, op, target, sink),
        RecordKind::ToolName => run_indexed(&NameRecord::TOOL_NAME, op, target, sink),
        RecordKind::LoadData => run_indexed(&LoadRecord, op, target, sink),
        RecordKind::E6Axis => e6axis::run(op, &options.e6axis_seed, options.resolver, target, sink),
    }
}

fn run_all(
    op: Operation<'_>,
    options: &TransferOptions,
    target: &mut LineStore,
    sink: &mut dyn EventSink,
) -> TransferReport {
    let mut report = TransferReport::default();
    if target.is_empty() {
        emit(sink, LogLevel::Warning, "Target file is empty. No updates will be made.");
        report.aborted = Some(AbortReason::EmptyTarget);
        return report;
    }

    for kind in options.kinds.iter() {
        let outcome = run_kind(kind, op, options, target, sink);
        report.record(kind, outcome);
    }
    report
}

/// Copy enabled records from `source` into `target`.
///
/// `target` keeps its line count. The caller persists it iff
/// `report.changed`.
pub fn transfer(
    source: &LineStore,
    target: &mut LineStore,
    options: &TransferOptions,
    sink: &mut dyn EventSink,
) -> TransferReport {
    emit(sink, LogLevel::Info, "Starting value transfer...");
    emit(sink, LogLevel::Info, format!("Source lines: {}, target lines: {}", source.len(), target.len()));

    let report = run_all(Operation::Update(source), options, target, sink);
    if report.aborted.is_none() && !report.changed {
        emit(sink, LogLevel::Info, "No changes were made to the target file.");
    }
    report
}

/// Reset enabled records in `target` to their canonical defaults.
pub fn purge(target: &mut LineStore, kinds: &KindSet, sink: &mut dyn EventSink) -> TransferReport {
    emit(sink, LogLevel::Info, "Starting purge...");
    let options = TransferOptions { kinds: kinds.clone(), e6axis_seed: Vec::new(), ..Default::default() };
    run_all(Operation::Purge, &options, target, sink)
}

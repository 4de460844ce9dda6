//! File-level jobs: transfer, purge, model check.
//!
//! Each job loads its inputs, runs the engine in memory and writes the
//! target at most once, only when the engine reports a change. IO failures
//! are reported to the sink as ERROR events and returned; in-memory edits
//! are discarded.

use std::path::{Path, PathBuf};

use robocfg_engine::events::{EventSink, LogEvent, LogLevel};
use robocfg_engine::model::{self, ModelComparison};
use robocfg_engine::{purge, transfer, KindSet, TransferOptions, TransferReport};
use serde::Serialize;

use crate::error::IoError;
use crate::file::{ConfigFile, TextEncoding};
use crate::target::prepare_target;

/// Outcome of one file job.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The target as given.
    pub target: PathBuf,
    /// Where the result was written; `None` when nothing changed.
    pub written_to: Option<PathBuf>,
    pub encoding: TextEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelComparison>,
    #[serde(flatten)]
    pub report: TransferReport,
}

/// Whether the target is edited in place or through a timestamped copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteMode {
    pub in_place: bool,
}

fn reported<T>(result: Result<T, IoError>, sink: &mut dyn EventSink) -> Result<T, IoError> {
    result.map_err(|e| {
        sink.emit(LogEvent::new(LogLevel::Error, e.to_string()));
        e
    })
}

fn write_back(
    file: &ConfigFile,
    target: &Path,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<PathBuf, IoError> {
    let destination = reported(prepare_target(target, mode.in_place), sink)?;
    reported(file.save(&destination), sink)?;
    sink.emit(LogEvent::new(LogLevel::Info, format!("Changes saved to {}", destination.display())));
    Ok(destination)
}

/// Transfer records from `source` into `target`.
///
/// Robot models are compared first; a mismatch is reported but does not
/// stop the transfer.
pub fn transfer_files(
    source: &Path,
    target: &Path,
    options: &TransferOptions,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<FileReport, IoError> {
    let source_file = reported(ConfigFile::load(source), sink)?;
    let mut target_file = reported(ConfigFile::load(target), sink)?;

    let comparison = model::compare(&source_file.lines, &target_file.lines, sink);
    let report = transfer(&source_file.lines, &mut target_file.lines, options, sink);

    let written_to = if report.changed {
        Some(write_back(&target_file, target, mode, sink)?)
    } else {
        None
    };

    Ok(FileReport {
        target: target.to_path_buf(),
        written_to,
        encoding: target_file.encoding,
        model: Some(comparison),
        report,
    })
}

/// Reset the selected kinds in `target` to their defaults.
pub fn purge_file(
    target: &Path,
    kinds: &KindSet,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<FileReport, IoError> {
    let mut target_file = reported(ConfigFile::load(target), sink)?;
    let report = purge(&mut target_file.lines, kinds, sink);

    let written_to = if report.changed {
        Some(write_back(&target_file, target, mode, sink)?)
    } else {
        sink.emit(LogEvent::new(LogLevel::Info, "Nothing to purge."));
        None
    };

    Ok(FileReport {
        target: target.to_path_buf(),
        written_to,
        encoding: target_file.encoding,
        model: None,
        report,
    })
}

/// Compare the robot models declared by two files.
pub fn compare_models(source: &Path, target: &Path, sink: &mut dyn EventSink) -> Result<ModelComparison, IoError> {
    let source_file = reported(ConfigFile::load(source), sink)?;
    let target_file = reported(ConfigFile::load(target), sink)?;
    Ok(model::compare(&source_file.lines, &target_file.lines, sink))
}

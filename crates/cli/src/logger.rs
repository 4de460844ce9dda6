//! stderr logger for the `log` facade.
//!
//! Engine events arrive through `LogForwarder`; the io and config crates log
//! directly. Everything is rendered as `[LEVEL] message`. Verbosity is the
//! facade's max level, set per command.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use robocfg_engine::events::EMPHASIS_TARGET;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub struct StderrLogger {
    styled: bool,
}

impl StderrLogger {
    pub fn new() -> Self {
        Self { styled: atty::is(atty::Stream::Stderr) }
    }

    /// Install as the global logger at INFO. A second call is a no-op.
    pub fn install() {
        if log::set_boxed_logger(Box::new(Self::new())).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }
    }
}

impl Default for StderrLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// `--verbose` shows DEBUG, `--quiet` only warnings and errors.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug | Level::Trace => "DEBUG",
    }
}

pub fn format_line(record: &Record, styled: bool) -> String {
    let line = format!("[{}] {}", label(record.level()), record.args());
    if styled && record.target() == EMPHASIS_TARGET {
        format!("{BOLD}{line}{RESET}")
    } else {
        line
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record, self.styled);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

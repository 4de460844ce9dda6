// robocfg CLI - transfer and purge records in robot controller config files

mod exit_codes;
mod logger;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use robocfg_config::{parse_seeds, select_kinds, ConfigError, Settings, TransferProfile};
use robocfg_engine::events::{EventCollector, EventSink, LogEvent, LogForwarder, Tee};
use robocfg_engine::{KindSet, RecordKind, TransferOptions};
use robocfg_io::{compare_models, purge_file, transfer_files, FileReport, IoError, WriteMode};

use exit_codes::{config_exit_code, io_exit_code, EXIT_ERROR, EXIT_MODEL_MISMATCH, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "robocfg")]
#[command(about = "Copy frames, tools, loads and axis positions between robot controller config files")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct KindArgs {
    /// Only process these record kinds. Repeatable; comma-separated accepted.
    #[arg(long, value_name = "KIND", value_delimiter = ',')]
    only: Vec<String>,

    /// Skip these record kinds. Repeatable; comma-separated accepted.
    #[arg(long, value_name = "KIND", value_delimiter = ',')]
    skip: Vec<String>,
}

impl KindArgs {
    fn given(&self) -> bool {
        !self.only.is_empty() || !self.skip.is_empty()
    }
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Print a JSON report on stdout
    #[arg(long)]
    json: bool,

    /// Show DEBUG messages
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy records from SOURCE into TARGET
    #[command(after_help = "\
Examples:
  robocfg transfer old/$config.dat new/$config.dat
  robocfg transfer old.dat new.dat --only base_data,tool_data
  robocfg transfer old.dat new.dat --skip load_data --in-place
  robocfg transfer old.dat new.dat --e6axis HOME --e6axis RPARK=PARK
  robocfg transfer old.dat new.dat --profile cell4.toml --json")]
    Transfer {
        /// File to copy records from
        source: PathBuf,

        /// File to copy records into
        target: PathBuf,

        #[command(flatten)]
        kinds: KindArgs,

        /// E6AXIS seed, TARGET=SOURCE or a bare NAME for XNAME=NAME. Repeatable.
        #[arg(long = "e6axis", value_name = "SEED")]
        e6axis: Vec<String>,

        /// Only use the indexed fallback when resolving E6AXIS names
        #[arg(long)]
        no_literal_suffix: bool,

        /// Edit TARGET itself instead of a timestamped copy
        #[arg(long)]
        in_place: bool,

        /// TOML transfer profile
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Reset records in TARGET to their defaults
    #[command(after_help = "\
Examples:
  robocfg purge $config.dat
  robocfg purge $config.dat --only tool_name,tool_type --in-place")]
    Purge {
        /// File to purge
        target: PathBuf,

        #[command(flatten)]
        kinds: KindArgs,

        /// Edit TARGET itself instead of a timestamped copy
        #[arg(long)]
        in_place: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare the robot models declared by two files
    CheckModel {
        source: PathBuf,
        target: PathBuf,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// List record kinds in the order a transfer processes them
    Kinds {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::StderrLogger::install();
    let settings = Settings::load();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: robocfg <command> [options]");
            eprintln!("       robocfg --help for more information");
            Ok(())
        }
        Some(Commands::Transfer {
            source,
            target,
            kinds,
            e6axis,
            no_literal_suffix,
            in_place,
            profile,
            output,
        }) => cmd_transfer(&settings, source, target, kinds, e6axis, no_literal_suffix, in_place, profile, output),
        Some(Commands::Purge { target, kinds, in_place, output }) => {
            cmd_purge(&settings, target, kinds, in_place, output)
        }
        Some(Commands::CheckModel { source, target, json }) => cmd_check_model(source, target, json),
        Some(Commands::Kinds { json }) => cmd_kinds(json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(err: &IoError) -> Self {
        let hint = match err {
            IoError::Copy { .. } => Some("use --in-place to edit the target directly".to_string()),
            IoError::Unencodable { .. } => {
                Some("the source contains characters the target's encoding cannot store".to_string())
            }
            _ => None,
        };
        Self { code: io_exit_code(err), message: err.to_string(), hint }
    }

    pub fn config(err: &ConfigError) -> Self {
        let hint = match err {
            ConfigError::UnknownKind(_) => Some("run `robocfg kinds` to list record kinds".to_string()),
            _ => None,
        };
        Self { code: config_exit_code(err), message: err.to_string(), hint }
    }

    /// Error already reported on stderr; exit with `code` only.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared
// ============================================================================

/// Kind selection from `--only`/`--skip`. Unknown names are usage errors.
fn kinds_from_args(args: &KindArgs) -> Result<KindSet, CliError> {
    select_kinds(&args.only, &args.skip).map_err(|e| match e {
        ConfigError::UnknownKind(msg) => {
            CliError::args(msg).with_hint("run `robocfg kinds` to list record kinds")
        }
        other => CliError::args(other.to_string()),
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    file: &'a FileReport,
    events: &'a [LogEvent],
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })
}

/// Run `job` with events going to the logger, and also collected when a
/// JSON report is requested.
fn run_job<F>(output: &OutputArgs, job: F) -> Result<(), CliError>
where
    F: FnOnce(&mut dyn EventSink) -> Result<FileReport, IoError>,
{
    let mut forwarder = LogForwarder;
    let mut collector = EventCollector::new();
    let result = if output.json {
        let mut tee = Tee { first: &mut forwarder, second: &mut collector };
        job(&mut tee)
    } else {
        job(&mut forwarder)
    };

    // IO failures were already logged as ERROR events.
    let report = result.map_err(|e| CliError::io(&e))?;
    if output.json {
        write_json(&JsonReport { file: &report, events: collector.events() })?;
    }
    Ok(())
}

// ============================================================================
// transfer
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn cmd_transfer(
    settings: &Settings,
    source: PathBuf,
    target: PathBuf,
    kinds: KindArgs,
    e6axis: Vec<String>,
    no_literal_suffix: bool,
    in_place: bool,
    profile_path: Option<PathBuf>,
    output: OutputArgs,
) -> Result<(), CliError> {
    log::set_max_level(logger::level_for(output.verbose || settings.verbose, output.quiet));

    let profile = match profile_path {
        Some(path) => Some(TransferProfile::load(&path).map_err(|e| CliError::config(&e))?),
        None => settings.profile().map_err(|e| CliError::config(&e))?,
    };
    let mut options = match &profile {
        Some(p) => p.to_options().map_err(|e| CliError::config(&e))?,
        None => TransferOptions::default(),
    };

    // Flags override the profile.
    if kinds.given() {
        options.kinds = kinds_from_args(&kinds)?;
    }
    if !e6axis.is_empty() {
        options.e6axis_seed = parse_seeds(&e6axis)
            .map_err(|e| CliError::args(e.to_string()).with_hint("use TARGET=SOURCE, or a bare NAME for XNAME=NAME"))?;
    }
    if no_literal_suffix {
        options.resolver.literal_suffix = false;
    }
    let mode = WriteMode {
        in_place: in_place || settings.in_place || profile.as_ref().is_some_and(|p| p.in_place),
    };

    run_job(&output, |sink| transfer_files(&source, &target, &options, mode, sink))
}

// ============================================================================
// purge
// ============================================================================

fn cmd_purge(
    settings: &Settings,
    target: PathBuf,
    kinds: KindArgs,
    in_place: bool,
    output: OutputArgs,
) -> Result<(), CliError> {
    log::set_max_level(logger::level_for(output.verbose || settings.verbose, output.quiet));

    let kinds = kinds_from_args(&kinds)?;
    let mode = WriteMode { in_place: in_place || settings.in_place };
    run_job(&output, |sink| purge_file(&target, &kinds, mode, sink))
}

// ============================================================================
// check-model
// ============================================================================

fn cmd_check_model(source: PathBuf, target: PathBuf, json: bool) -> Result<(), CliError> {
    log::set_max_level(logger::level_for(false, json));

    let comparison = compare_models(&source, &target, &mut LogForwarder).map_err(|e| CliError::io(&e))?;
    if json {
        write_json(&comparison)?;
    }
    if comparison.matches() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_MODEL_MISMATCH))
    }
}

// ============================================================================
// kinds
// ============================================================================

fn cmd_kinds(json: bool) -> Result<(), CliError> {
    if json {
        return write_json(&RecordKind::ALL[..]);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for kind in RecordKind::ALL {
        writeln!(handle, "{}", kind).map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    }
    Ok(())
}

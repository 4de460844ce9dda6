//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, unknown kind) |
//! | 3-9     | check-model      | Robot-model comparison codes             |
//! | 10-19   | io               | Reading, copying and writing files       |
//! | 20-29   | config           | Profiles and settings                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use robocfg_config::ConfigError;
use robocfg_io::IoError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
/// A transfer that changed nothing is still a success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown record kind, malformed seed.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// check-model (3-9)
// =============================================================================

/// Robot models differ, or one of them could not be found.
pub const EXIT_MODEL_MISMATCH: u8 = 3;

// =============================================================================
// IO (10-19)
// =============================================================================

/// Source or target could not be read.
pub const EXIT_IO_READ: u8 = 10;

/// Target (or its working copy) could not be written.
pub const EXIT_IO_WRITE: u8 = 11;

/// Timestamped working copy could not be created.
pub const EXIT_IO_COPY: u8 = 12;

/// Merged content cannot be represented in the target's encoding.
pub const EXIT_IO_ENCODING: u8 = 13;

// =============================================================================
// Config (20-29)
// =============================================================================

/// Profile could not be read or parsed.
pub const EXIT_CONFIG_PARSE: u8 = 20;

/// Profile parsed but is invalid (unknown kind, bad seed, conflicting lists).
pub const EXIT_CONFIG_INVALID: u8 = 21;

/// Map an IO error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } => EXIT_IO_READ,
        IoError::Write { .. } => EXIT_IO_WRITE,
        IoError::Copy { .. } => EXIT_IO_COPY,
        IoError::Unencodable { .. } => EXIT_IO_ENCODING,
    }
}

/// Map a config error to its exit code.
pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Parse(_) | ConfigError::Io { .. } => EXIT_CONFIG_PARSE,
        ConfigError::Validation(_) | ConfigError::UnknownKind(_) => EXIT_CONFIG_INVALID,
    }
}

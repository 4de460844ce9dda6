//! `robocfg-io` — File I/O for robot controller config files.
//!
//! Wraps the engine with file loading, encoding preservation, working-copy
//! creation and single-write jobs.

pub mod error;
pub mod file;
pub mod jobs;
pub mod target;

pub use error::IoError;
pub use file::{ConfigFile, TextEncoding};
pub use jobs::{compare_models, purge_file, transfer_files, FileReport, WriteMode};
pub use target::prepare_target;

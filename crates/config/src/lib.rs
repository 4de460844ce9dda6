// Configuration loading

pub mod error;
pub mod profile;
pub mod settings;

pub use error::ConfigError;
pub use profile::{parse_seeds, select_kinds, TransferProfile};
pub use settings::Settings;

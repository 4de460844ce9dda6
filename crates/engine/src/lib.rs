//! `robocfg-engine` — Record transfer engine for robot controller config files.
//!
//! Pure engine crate: operates on in-memory line stores and reports through
//! an injected event sink. No file IO.

pub mod events;
pub mod fields;
pub mod lines;
pub mod model;
pub mod records;
pub mod resolver;
pub mod transfer;

pub use events::{EventCollector, EventSink, LogEvent, LogForwarder, LogLevel};
pub use lines::LineStore;
pub use records::{MergeOutcome, Operation, RecordKind};
pub use resolver::{NameMapping, NamePair, ResolverOptions};
pub use transfer::{purge, transfer, KindSet, TransferOptions, TransferReport};

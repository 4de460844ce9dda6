//! Log events emitted by the transfer engine.
//!
//! The engine never writes to a console or a file. Every merger, the name
//! resolver and the orchestrator report progress through an [`EventSink`],
//! which the caller supplies. The CLI renders events to stderr; tests use
//! [`EventCollector`] to assert on what was reported.

use serde::Serialize;

/// Severity of a [`LogEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A single leveled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    /// Highlight hint for renderers (bold in a terminal). Carries no semantics.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub emphasize: bool,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), emphasize: false }
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasize = true;
        self
    }
}

/// Receiver for engine log events.
pub trait EventSink {
    fn emit(&mut self, event: LogEvent);

    fn debug(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEvent::new(LogLevel::Debug, message));
    }

    fn info(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEvent::new(LogLevel::Info, message));
    }

    fn warning(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEvent::new(LogLevel::Warning, message));
    }

    fn error(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.emit(LogEvent::new(LogLevel::Error, message));
    }
}

impl<F: FnMut(LogEvent)> EventSink for F {
    fn emit(&mut self, event: LogEvent) {
        self(event)
    }
}

/// Shorthand used inside the engine, where sinks arrive as trait objects.
pub(crate) fn emit(sink: &mut dyn EventSink, level: LogLevel, message: impl Into<String>) {
    sink.emit(LogEvent::new(level, message));
}

pub(crate) fn emit_emphasized(sink: &mut dyn EventSink, level: LogLevel, message: impl Into<String>) {
    sink.emit(LogEvent::new(level, message).emphasized());
}

/// Event collector for tests and JSON reports.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<LogEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events at exactly `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<&LogEvent> {
        self.events.iter().filter(|e| e.level == level).collect()
    }

    pub fn warnings(&self) -> Vec<&LogEvent> {
        self.at_level(LogLevel::Warning)
    }

    pub fn errors(&self) -> Vec<&LogEvent> {
        self.at_level(LogLevel::Error)
    }

    /// True if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.message.contains(needle))
    }
}

impl EventSink for EventCollector {
    fn emit(&mut self, event: LogEvent) {
        self.events.push(event);
    }
}

/// `log` target for forwarded events.
pub const LOG_TARGET: &str = "robocfg";

/// `log` target for forwarded events that asked to be emphasized.
pub const EMPHASIS_TARGET: &str = "robocfg::emphasis";

/// Forwards events to the `log` facade.
///
/// Emphasis is carried in the record target, so a logger can render it
/// without access to the event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogForwarder;

impl EventSink for LogForwarder {
    fn emit(&mut self, event: LogEvent) {
        let level = match event.level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        };
        let target = if event.emphasize { EMPHASIS_TARGET } else { LOG_TARGET };
        log::log!(target: target, level, "{}", event.message);
    }
}

/// Sends every event to two sinks, in order.
pub struct Tee<'a, A: EventSink + ?Sized, B: EventSink + ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: EventSink + ?Sized, B: EventSink + ?Sized> EventSink for Tee<'_, A, B> {
    fn emit(&mut self, event: LogEvent) {
        self.first.emit(event.clone());
        self.second.emit(event);
    }
}

//! Application log routing.
//!
//! Hosts construct a [`LogRouter`], attach sinks, and hand the router to
//! whatever needs it; there is no global logger. Each sink owns a
//! [`LogFormatter`] and a destination: [`ConsoleSink`] for standard output,
//! [`FileSink`] for a log file, or any host-supplied [`LogSink`]
//! implementation (UI panes, test captures).
//!
//! The crate's own diagnostics go through `tracing` and are unrelated to
//! this service; the router carries the *application's* log stream.
//!
//! # Example
//!
//! ```
//! use horizon_appshell::logging::{ConsoleSink, LogLevel, LogRouter};
//! use horizon_appshell::shell_warning;
//!
//! let mut router = LogRouter::new();
//! router.add_sink(Box::new(ConsoleSink::new()));
//! router.set_min_level(LogLevel::Info);
//! shell_warning!(router, "settings file was recreated");
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::file::{FileError, FileResult};

/// Severity of a log record, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Routine lifecycle information.
    Info,
    /// Something unexpected that the application recovered from.
    Warning,
    /// A failure that degrades the application.
    Critical,
    /// A failure the application cannot continue past.
    Fatal,
}

impl LogLevel {
    /// The severity name as it appears in formatted output.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Debug => "Debug",
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Critical => "Critical",
            LogLevel::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One log entry, with the call-site metadata the macros capture.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// The formatted message.
    pub message: String,
    /// Local time the record was made.
    pub timestamp: DateTime<Local>,
    /// Source file of the call site.
    pub file: &'static str,
    /// Source line of the call site.
    pub line: u32,
    /// Module path of the call site.
    pub module: &'static str,
}

/// Rendering strategy for log records.
///
/// A closed set: sinks pick a variant rather than supplying arbitrary
/// formatting code. The `Simple` layout is
/// `[Warning  ]: 2026-08-27 10:00:00 - message (file:line, module)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormatter {
    /// Severity tag, timestamp, message, call site.
    #[default]
    Simple,
    /// Message only, for sinks that add their own framing.
    Plain,
}

impl LogFormatter {
    /// Renders `record` as a single line, without a trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            LogFormatter::Simple => format!(
                "[{:<9}]: {} - {} ({}:{}, {})",
                record.level.name(),
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.message,
                record.file,
                record.line,
                record.module,
            ),
            LogFormatter::Plain => record.message.clone(),
        }
    }
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    /// Delivers one record. Sinks must not panic on delivery failure.
    fn append(&self, record: &LogRecord);
}

/// Sink writing formatted records to standard output.
pub struct ConsoleSink {
    formatter: LogFormatter,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    /// Console sink with the `Simple` format.
    pub fn new() -> Self {
        Self {
            formatter: LogFormatter::Simple,
        }
    }

    /// Console sink with an explicit format.
    pub fn with_formatter(formatter: LogFormatter) -> Self {
        Self { formatter }
    }
}

impl LogSink for ConsoleSink {
    fn append(&self, record: &LogRecord) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", self.formatter.format(record));
    }
}

/// Sink appending formatted records to a file.
pub struct FileSink {
    formatter: LogFormatter,
    file: Mutex<File>,
}

impl FileSink {
    /// Opens (or creates) `path` for appending, with the `Simple` format.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn create(path: impl AsRef<Path>) -> FileResult<Self> {
        Self::with_formatter(path, LogFormatter::Simple)
    }

    /// Opens (or creates) `path` for appending with an explicit format.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn with_formatter(path: impl AsRef<Path>, formatter: LogFormatter) -> FileResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FileError::from_io(e, path))?;
        Ok(Self {
            formatter,
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&self, record: &LogRecord) {
        let line = self.formatter.format(record);
        let mut file = self.file.lock();
        if writeln!(file, "{line}").and_then(|_| file.flush()).is_err() {
            tracing::warn!(target: "appshell::logging", "failed to append to log file");
        }
    }
}

/// Routes log records to a chain of sinks.
///
/// Built explicitly by the host and passed (or shared) wherever logging is
/// needed. Records below the minimum level are dropped before reaching any
/// sink.
#[derive(Default)]
pub struct LogRouter {
    sinks: Vec<Box<dyn LogSink>>,
    min_level: Option<LogLevel>,
}

impl LogRouter {
    /// Router with no sinks, accepting every level.
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            min_level: None,
        }
    }

    /// Appends a sink to the chain.
    pub fn add_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sinks.push(sink);
    }

    /// Number of attached sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Drops records below `level`.
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = Some(level);
    }

    /// Whether a record at `level` would reach the sinks.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.min_level.is_none_or(|min| level >= min)
    }

    /// Builds a record and delivers it to every sink, in order.
    ///
    /// Prefer the `shell_*` macros, which fill in the call-site arguments.
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        file: &'static str,
        line: u32,
        module: &'static str,
    ) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord {
            level,
            message: message.into(),
            timestamp: Local::now(),
            file,
            line,
            module,
        };
        for sink in &self.sinks {
            sink.append(&record);
        }
    }
}

/// Logs through a [`LogRouter`] with an explicit level.
#[macro_export]
macro_rules! shell_log {
    ($router:expr, $level:expr, $($arg:tt)*) => {
        $router.log($level, format!($($arg)*), file!(), line!(), module_path!())
    };
}

/// Logs a debug record through a [`LogRouter`].
#[macro_export]
macro_rules! shell_debug {
    ($router:expr, $($arg:tt)*) => {
        $crate::shell_log!($router, $crate::logging::LogLevel::Debug, $($arg)*)
    };
}

/// Logs an info record through a [`LogRouter`].
#[macro_export]
macro_rules! shell_info {
    ($router:expr, $($arg:tt)*) => {
        $crate::shell_log!($router, $crate::logging::LogLevel::Info, $($arg)*)
    };
}

/// Logs a warning record through a [`LogRouter`].
#[macro_export]
macro_rules! shell_warning {
    ($router:expr, $($arg:tt)*) => {
        $crate::shell_log!($router, $crate::logging::LogLevel::Warning, $($arg)*)
    };
}

/// Logs a critical record through a [`LogRouter`].
#[macro_export]
macro_rules! shell_critical {
    ($router:expr, $($arg:tt)*) => {
        $crate::shell_log!($router, $crate::logging::LogLevel::Critical, $($arg)*)
    };
}

/// Logs a fatal record through a [`LogRouter`].
#[macro_export]
macro_rules! shell_fatal {
    ($router:expr, $($arg:tt)*) => {
        $crate::shell_log!($router, $crate::logging::LogLevel::Fatal, $($arg)*)
    };
}

//! # Audit Log
//!
//! Tab-delimited event log written alongside a run when logging is enabled.
//!
//! ## Line Format
//!
//! ```text
//! <timestamp>\t<STATUS>\t<message>\t<line number>\t<raw line>
//! ```
//!
//! Events that do not concern a ledger line leave the last two columns empty,
//! so every event has the same five columns. Timestamps are local time with
//! microseconds, e.g. `2026-10-14 09:30:00.123456`.

use chrono::{DateTime, Local};
use std::fmt;
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Severity tag of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    Warning,
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Normal => "NORMAL",
            Status::Warning => "WARNING",
            Status::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log entry
#[derive(Debug, Clone)]
pub struct LogEvent<'a> {
    pub timestamp: DateTime<Local>,
    pub status: Status,
    pub message: String,
    /// Ledger line number and raw text, for events about a specific line
    pub line: Option<(usize, &'a str)>,
}

impl<'a> LogEvent<'a> {
    /// Event stamped with the current local time
    pub fn now(status: Status, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            status,
            message: message.into(),
            line: None,
        }
    }

    /// Attach the offending ledger line
    pub fn with_line(mut self, number: usize, text: &'a str) -> Self {
        self.line = Some((number, text));
        self
    }
}

impl fmt::Display for LogEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.status,
            self.message
        )?;
        match self.line {
            Some((number, text)) => write!(f, "{number}\t{text}"),
            None => f.write_str("\t"),
        }
    }
}

/// Line-oriented sink for [`LogEvent`]s
pub struct AuditLog<W: Write> {
    out: W,
}

impl<W: Write> AuditLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one event followed by a newline
    pub fn record(&mut self, event: &LogEvent<'_>) -> io::Result<()> {
        writeln!(self.out, "{event}")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

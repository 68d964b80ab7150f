//! Console logging for filegate.
//!
//! The poll loop and the guarded file operations emit plain, timestamped
//! progress lines. Logging is behind the `Log` capability so library users
//! can redirect it and tests can capture lines instead of scraping stdout.
//!
//! There are no levels, no buffering, and no destinations beyond the one
//! the chosen `Log` implementation writes to.

use chrono::{DateTime, Local};

/// Logging capability: a single sink for informational messages.
pub trait Log {
    /// Record one message.
    fn log(&self, message: &str);
}

/// Production logger: prefixes each message with the local wall-clock time
/// and writes it to stdout.
///
/// Output format: `[YYYY-MM-DD HH:MM:SS] <message>`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        ConsoleLogger
    }
}

impl Log for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{}", format_line(Local::now(), message));
    }
}

/// Format one log line with the timestamp prefix.
pub(crate) fn format_line(timestamp: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", timestamp.format("%Y-%m-%d %H:%M:%S"), message)
}

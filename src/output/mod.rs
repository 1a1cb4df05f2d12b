//! Line-oriented output sinks.
//!
//! Every status line a handler produces goes through a [`Sink`]. A sink
//! accepts lines at three severities and is closed exactly once when the
//! handler is disposed.
//!
//! # Available Sinks
//!
//! - **Console** ([`ConsoleSink`]): styled lines on a terminal
//! - **Log file** ([`LogFileSink`]): plain UTF-8 lines appended to the run's log
//! - **Aggregate** ([`AggregateSink`]): forwards every line to a set of sinks

pub mod aggregate;
pub mod log_file;
pub mod terminal;

use anyhow::Result;

pub use aggregate::AggregateSink;
pub use log_file::LogFileSink;
pub use terminal::ConsoleSink;

/// How prominently a line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Regular status output
    Default,
    /// Something the user should notice
    Warning,
    /// Secondary detail, rendered dimmed where supported
    Light,
}

/// A destination for human-readable status lines.
pub trait Sink {
    /// Writes one line at `severity`. A trailing newline is added by the sink.
    fn write(&mut self, severity: Severity, line: &str) -> Result<()>;

    /// Flushes pending output and releases the underlying resource.
    fn close(&mut self) -> Result<()>;

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.write(Severity::Default, line)
    }

    fn write_warning_line(&mut self, line: &str) -> Result<()> {
        self.write(Severity::Warning, line)
    }

    fn write_light_line(&mut self, line: &str) -> Result<()> {
        self.write(Severity::Light, line)
    }
}

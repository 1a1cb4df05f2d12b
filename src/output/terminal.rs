//! Console sink.
//!
//! Default lines are printed as-is, warnings in yellow and light lines
//! dimmed. Styling is dropped automatically when the output is not a
//! terminal.

use super::{Severity, Sink};
use anyhow::{Context, Result};
use console::{Style, Term};
use std::io::Write;

pub struct ConsoleSink {
    writer: Box<dyn Write + Send>,
    warning: Style,
    light: Style,
}

impl ConsoleSink {
    /// Console sink on standard output.
    pub fn stdout() -> Self {
        Self::with_writer(Term::stdout())
    }

    /// Console sink writing into an arbitrary writer.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            warning: Style::new().yellow(),
            light: Style::new().dim(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, severity: Severity, line: &str) -> Result<()> {
        let result = match severity {
            Severity::Default => writeln!(self.writer, "{}", line),
            Severity::Warning => writeln!(self.writer, "{}", self.warning.apply_to(line)),
            Severity::Light => writeln!(self.writer, "{}", self.light.apply_to(line)),
        };
        result.context("Failed to write to console")
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush console")
    }
}

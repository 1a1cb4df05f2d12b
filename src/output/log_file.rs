//! Log-file sink.
//!
//! Lines are appended to the run's log file as plain UTF-8 text without a
//! byte-order mark. Severity does not change how a line is written. Output
//! is buffered and flushed on [`close`](Sink::close).

use super::{Severity, Sink};
use anyhow::{Context, Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct LogFileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl LogFileSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes lines verbatim and flushes them to disk.
    pub fn write_block(&mut self, lines: &[&str]) -> Result<()> {
        for line in lines {
            self.write(Severity::Default, line)?;
        }
        let (path, writer) = self.open_writer()?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush log file '{}'", path.display()))
    }

    fn open_writer(&mut self) -> Result<(&Path, &mut BufWriter<File>)> {
        let path = self.path.as_path();
        match self.writer.as_mut() {
            Some(writer) => Ok((path, writer)),
            None => Err(anyhow!("Log file '{}' is already closed", path.display())),
        }
    }
}

impl Sink for LogFileSink {
    fn write(&mut self, _severity: Severity, line: &str) -> Result<()> {
        let (path, writer) = self.open_writer()?;
        writeln!(writer, "{}", line)
            .with_context(|| format!("Failed to write log file '{}'", path.display()))
    }

    fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .with_context(|| format!("Failed to flush log file '{}'", self.path.display())),
            None => Ok(()),
        }
    }
}

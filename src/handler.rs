//! The file handler: shared engine behind every `tur` command.
//!
//! A [`FileHandler`] owns the run's sinks, its cancellation token and the
//! scan buffer size, and exposes the three primitives commands are built
//! from:
//!
//! - [`enumerate_files`](FileHandler::enumerate_files) /
//!   [`enumerate_directories`](FileHandler::enumerate_directories)
//! - [`copy`](FileHandler::copy)
//! - [`is_same_file`](FileHandler::is_same_file)
//!
//! A command hands its body to [`run`](FileHandler::run), which writes the
//! log-file header, times the body and reports completion on every sink.
//! [`dispose`](FileHandler::dispose) closes the sinks; dropping an
//! undisposed handler does the same, ignoring errors.
//!
//! ```rust,no_run
//! use tur::{CancellationToken, Config, FileHandler, Sink};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::new("/tmp", "copy").with_exclude(["**/*.tmp"]);
//! let mut handler = FileHandler::new(config, CancellationToken::new())?;
//!
//! let code = handler.run(|h| {
//!     for file in h.enumerate_files("/data".as_ref(), true, false)? {
//!         let dest = std::path::Path::new("/backup").join(&file);
//!         h.copy(&std::path::Path::new("/data").join(&file), &dest, |_| {})?;
//!         h.output().write_line(&format!("copied {}", file.display()))?;
//!     }
//!     Ok(0)
//! })?;
//!
//! handler.dispose()?;
//! std::process::exit(code);
//! # }
//! ```

use crate::cancel::CancellationToken;
use crate::compare;
use crate::config::Config;
use crate::copy::{self, CopyOutcome, ProgressSample};
use crate::filter::FilterSpec;
use crate::memory;
use crate::metrics::{RunTimer, format_elapsed};
use crate::output::{AggregateSink, ConsoleSink, LogFileSink, Sink};
use crate::scan::{self, EntryKind, PathForm};
use anyhow::{Context, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::fs;
use std::path::{Path, PathBuf};

/// First line of every log file.
pub const VERSION_LINE: &str = concat!("tur v", env!("CARGO_PKG_VERSION"));

/// Length of the random token in log file names.
const LOG_TOKEN_LEN: usize = 12;

/// Line emitted on disposal when the run was cancelled.
pub const CANCELLED_NOTICE: &str = "user requested cancellation";

/// Builder for [`FileHandler`].
pub struct HandlerBuilder {
    config: Config,
    cancel: CancellationToken,
    console: Option<ConsoleSink>,
    scan_buffer_size: Option<usize>,
}

impl HandlerBuilder {
    /// Replaces the stdout console sink.
    pub fn console(mut self, console: ConsoleSink) -> Self {
        self.console = Some(console);
        self
    }

    /// Fixes the scan buffer size instead of sizing it from available memory.
    /// Values below 1 are raised to 1.
    pub fn scan_buffer_size(mut self, bytes: usize) -> Self {
        self.scan_buffer_size = Some(bytes.max(1));
        self
    }

    /// Creates the output directory if needed and opens the log file.
    ///
    /// # Errors
    /// Returns an error if the output directory or the log file cannot be
    /// created.
    pub fn build(self) -> Result<FileHandler> {
        let scan_buffer_size = self
            .scan_buffer_size
            .unwrap_or_else(memory::detect_scan_buffer_size);

        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory '{}'", output_dir.display())
        })?;

        let log_path = output_dir.join(log_file_name(&self.config.command_name));
        let log_file = LogFileSink::open(&log_path)?;

        tracing::debug!(
            command = %self.config.command_name,
            log = %log_path.display(),
            scan_buffer_size,
            "handler ready"
        );

        Ok(FileHandler {
            config: self.config,
            cancel: self.cancel,
            scan_buffer_size,
            log_path,
            console: self.console.unwrap_or_default(),
            log_file,
            disposed: false,
        })
    }
}

pub struct FileHandler {
    config: Config,
    cancel: CancellationToken,
    scan_buffer_size: usize,
    log_path: PathBuf,
    console: ConsoleSink,
    log_file: LogFileSink,
    disposed: bool,
}

impl FileHandler {
    /// Creates a handler writing to stdout and a fresh log file in
    /// `config.output_dir`.
    pub fn new(config: Config, cancel: CancellationToken) -> Result<Self> {
        Self::builder(config, cancel).build()
    }

    pub fn builder(config: Config, cancel: CancellationToken) -> HandlerBuilder {
        HandlerBuilder {
            config,
            cancel,
            console: None,
            scan_buffer_size: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Largest buffer any chunked operation of this handler allocates.
    pub fn scan_buffer_size(&self) -> usize {
        self.scan_buffer_size
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn console(&mut self) -> &mut ConsoleSink {
        &mut self.console
    }

    pub fn log_file(&mut self) -> &mut LogFileSink {
        &mut self.log_file
    }

    /// Sink that writes to both the console and the log file.
    pub fn output(&mut self) -> AggregateSink<'_> {
        AggregateSink::new(vec![
            &mut self.console as &mut dyn Sink,
            &mut self.log_file,
        ])
    }

    /// Lists every file below `root`.
    ///
    /// With `apply_filter`, only files selected by the configured
    /// include/exclude patterns are returned. Paths are absolute when
    /// `absolute` is set, otherwise relative to `root`. A missing `root`
    /// yields an empty list.
    pub fn enumerate_files(
        &self,
        root: &Path,
        apply_filter: bool,
        absolute: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate(root, EntryKind::File, apply_filter, absolute)
    }

    /// Lists every directory below `root`. See [`enumerate_files`](Self::enumerate_files).
    pub fn enumerate_directories(
        &self,
        root: &Path,
        apply_filter: bool,
        absolute: bool,
    ) -> Result<Vec<PathBuf>> {
        self.enumerate(root, EntryKind::Dir, apply_filter, absolute)
    }

    fn enumerate(
        &self,
        root: &Path,
        kind: EntryKind,
        apply_filter: bool,
        absolute: bool,
    ) -> Result<Vec<PathBuf>> {
        let filter = if apply_filter {
            Some(FilterSpec::from_config(&self.config)?)
        } else {
            None
        };
        scan::enumerate(root, kind, filter.as_ref(), PathForm::from(absolute))
    }

    /// Copies `source` to `dest` through the scan buffer, reporting progress
    /// after every chunk. A missing source is a no-op.
    pub fn copy<F>(&self, source: &Path, dest: &Path, on_progress: F) -> Result<CopyOutcome>
    where
        F: FnMut(ProgressSample),
    {
        copy::copy_file(source, dest, self.scan_buffer_size, &self.cancel, on_progress)
    }

    /// Byte-for-byte comparison of `a` and `b`. Answers `false` once
    /// cancellation has been requested.
    pub fn is_same_file(&self, a: &Path, b: &Path) -> Result<bool> {
        compare::is_same_file(a, b, self.scan_buffer_size, &self.cancel)
    }

    /// Runs a command body inside the handler's lifecycle.
    ///
    /// Writes the log header, runs `body`, then writes
    /// `"<command> finished in <elapsed>"` to every sink and returns the
    /// body's exit code. Errors from `body` are returned unchanged.
    pub fn run<F>(&mut self, body: F) -> Result<i32>
    where
        F: FnOnce(&mut FileHandler) -> Result<i32>,
    {
        self.write_header()?;

        let timer = RunTimer::start(self.display_name());
        let code = body(self)?;
        let timing = timer.stop();

        let summary = format!(
            "{} finished in {}",
            timing.command,
            format_elapsed(timing.elapsed)
        );
        self.output().write_line(&summary)?;

        tracing::debug!(command = %timing.command, code, elapsed = ?timing.elapsed, "run complete");
        Ok(code)
    }

    /// Writes the version and command-line header to the log file.
    ///
    /// Skipped when cancellation was already requested; a failure while
    /// cancelling is ignored.
    fn write_header(&mut self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        let command_line = self.config.command_line();
        match self
            .log_file
            .write_block(&[VERSION_LINE, command_line.as_str(), ""])
        {
            Err(_) if self.cancel.is_cancelled() => Ok(()),
            result => result,
        }
    }

    fn display_name(&self) -> &str {
        if self.config.command_name.is_empty() {
            "tur"
        } else {
            &self.config.command_name
        }
    }

    /// Reports cancellation, names the log file and closes every sink.
    ///
    /// All steps are attempted; the first failure is returned.
    pub fn dispose(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let mut first_error = None;

        if self.cancel.is_cancelled() {
            if let Err(e) = self.output().write_warning_line(CANCELLED_NOTICE) {
                first_error.get_or_insert(e);
            }
        }

        let notice = format!("log file: {}", self.log_path.display());
        if let Err(e) = self.console.write_light_line(&notice) {
            first_error.get_or_insert(e);
        }

        if let Err(e) = self.output().close() {
            first_error.get_or_insert(e);
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "failed to close handler sinks");
        }
    }
}

/// `tur-<command>-<12 random alphanumerics>.log`
fn log_file_name(command_name: &str) -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LOG_TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("tur-{}-{}.log", command_name, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name("dedupe");
        let token = name
            .strip_prefix("tur-dedupe-")
            .and_then(|rest| rest.strip_suffix(".log"))
            .expect("unexpected log file name");

        assert_eq!(token.len(), LOG_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_log_file_names_differ() {
        assert_ne!(log_file_name("copy"), log_file_name("copy"));
    }

    #[test]
    fn test_builder_creates_output_dir_and_log() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("logs").join("nested");
        let handler = FileHandler::builder(Config::new(&out, "copy"), CancellationToken::new())
            .console(ConsoleSink::with_writer(std::io::sink()))
            .scan_buffer_size(0)
            .build()
            .unwrap();

        assert!(handler.log_path().starts_with(&out));
        assert!(handler.log_path().exists());
        assert_eq!(handler.scan_buffer_size(), 1);
        handler.dispose().unwrap();
    }

    #[test]
    fn test_header_skipped_when_already_cancelled() {
        let temp_dir = TempDir::new().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let mut handler = FileHandler::builder(Config::new(temp_dir.path(), "copy"), token)
            .console(ConsoleSink::with_writer(std::io::sink()))
            .build()
            .unwrap();
        let log_path = handler.log_path().to_path_buf();

        assert_eq!(handler.run(|_| Ok(0)).unwrap(), 0);
        handler.dispose().unwrap();

        let log = fs::read_to_string(log_path).unwrap();
        assert!(!log.contains(VERSION_LINE));
        assert!(log.contains("copy finished in"));
        assert!(log.contains(CANCELLED_NOTICE));
    }
}

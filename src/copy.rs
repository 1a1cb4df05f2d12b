//! Chunked file copy with progress reporting.
//!
//! The source is streamed through a buffer of at most
//! `min(chunk_limit, source_len)` bytes. After every chunk is written a
//! [`ProgressSample`] is reported. The cancellation token is checked before
//! each read and each write; a cancelled copy keeps whatever was already
//! written.

use crate::cancel::CancellationToken;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Smallest elapsed window used for throughput, so a chunk that finishes
/// within timer resolution still yields a finite rate.
const MIN_CHUNK_WINDOW: Duration = Duration::from_nanos(1);

/// Progress after one copied chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Share of the source written so far, truncated to an integer (0..=100)
    pub percent: u8,
    /// Instantaneous throughput of the last chunk
    pub bytes_per_second: f64,
}

/// How a copy call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Every byte of the source was written to the destination
    Completed { bytes: u64 },
    /// The source did not exist; nothing was touched
    SourceMissing,
    /// Cancellation was observed; the destination holds `bytes` bytes
    Cancelled { bytes: u64 },
}

impl CopyOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CopyOutcome::Completed { .. })
    }
}

/// Copies `source` to `dest` in chunks of at most `chunk_limit` bytes.
///
/// The destination's parent directories are created as needed and any
/// existing destination content is truncated before writing. A destination
/// that is the source itself (same path, an alias of it, or a hard link) is
/// left untouched and reported as completed.
///
/// # Errors
/// Returns an error if a directory cannot be created or a file cannot be
/// opened, read, or written.
pub fn copy_file<F>(
    source: &Path,
    dest: &Path,
    chunk_limit: usize,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<CopyOutcome>
where
    F: FnMut(ProgressSample),
{
    if !source.exists() {
        tracing::debug!(source = %source.display(), "copy skipped, source missing");
        return Ok(CopyOutcome::SourceMissing);
    }

    if dest.exists() && same_file(source, dest)? {
        let bytes = fs::metadata(source)
            .with_context(|| format!("Failed to stat '{}'", source.display()))?
            .len();
        tracing::debug!(
            source = %source.display(),
            dest = %dest.display(),
            "copy skipped, destination is the source"
        );
        if bytes > 0 {
            on_progress(ProgressSample {
                percent: 100,
                bytes_per_second: 0.0,
            });
        }
        return Ok(CopyOutcome::Completed { bytes });
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let mut reader = File::open(source)
        .with_context(|| format!("Failed to open '{}' for reading", source.display()))?;
    let mut writer = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(dest)
        .with_context(|| format!("Failed to open '{}' for writing", dest.display()))?;
    writer
        .set_len(0)
        .with_context(|| format!("Failed to truncate '{}'", dest.display()))?;

    let total = reader
        .metadata()
        .with_context(|| format!("Failed to stat '{}'", source.display()))?
        .len();
    let chunk_size = chunk_len(chunk_limit, total);
    let mut buffer = vec![0u8; chunk_size];
    let mut written: u64 = 0;
    let mut timer = Instant::now();

    loop {
        if cancel.is_cancelled() {
            return cancelled(&mut writer, dest, written);
        }

        let read = reader
            .read(&mut buffer)
            .with_context(|| format!("Failed to read '{}'", source.display()))?;
        if read == 0 {
            break;
        }

        if cancel.is_cancelled() {
            return cancelled(&mut writer, dest, written);
        }

        writer
            .write_all(&buffer[..read])
            .with_context(|| format!("Failed to write '{}'", dest.display()))?;
        written += read as u64;

        let elapsed = timer.elapsed().max(MIN_CHUNK_WINDOW);
        timer = Instant::now();

        on_progress(ProgressSample {
            percent: percent_of(written, total),
            bytes_per_second: throughput(read, elapsed),
        });
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush '{}'", dest.display()))?;

    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        bytes = written,
        "copy complete"
    );

    Ok(CopyOutcome::Completed { bytes: written })
}

fn cancelled(writer: &mut File, dest: &Path, written: u64) -> Result<CopyOutcome> {
    writer
        .flush()
        .with_context(|| format!("Failed to flush '{}'", dest.display()))?;
    tracing::debug!(dest = %dest.display(), bytes = written, "copy cancelled");
    Ok(CopyOutcome::Cancelled { bytes: written })
}

/// True if `a` and `b` name the same file on disk (aliases and hard links included).
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let meta_a = fs::metadata(a).with_context(|| format!("Failed to stat '{}'", a.display()))?;
    let meta_b = fs::metadata(b).with_context(|| format!("Failed to stat '{}'", b.display()))?;
    Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> Result<bool> {
    let canonical_a =
        fs::canonicalize(a).with_context(|| format!("Failed to resolve '{}'", a.display()))?;
    let canonical_b =
        fs::canonicalize(b).with_context(|| format!("Failed to resolve '{}'", b.display()))?;
    Ok(canonical_a == canonical_b)
}

/// Buffer length for a file of `total` bytes: `min(limit, total)`, never 0.
pub(crate) fn chunk_len(limit: usize, total: u64) -> usize {
    let limit = limit.max(1);
    usize::try_from(total).map_or(limit, |total| limit.min(total).max(1))
}

/// `written / total` as a truncated percentage, capped at 100.
fn percent_of(written: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (written as u128 * 100 / total as u128).min(100);
    percent as u8
}

/// Rate of one chunk, counting its read and its write against the window.
fn throughput(chunk: usize, elapsed: Duration) -> f64 {
    2.0 * chunk as f64 / elapsed.as_secs_f64()
}

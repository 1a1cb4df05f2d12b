//! Terminal progress bar for chunked copies.
//!
//! [`CopyProgressBar`] turns the [`ProgressSample`]s produced by
//! [`crate::FileHandler::copy`] into an `indicatif` bar that shows the
//! percentage and the current throughput.
//!
//! ```rust,no_run
//! use tur::progress::CopyProgressBar;
//! # fn demo(handler: &mut tur::FileHandler) -> anyhow::Result<()> {
//! let bar = CopyProgressBar::new("big.iso")?;
//! handler.copy("big.iso".as_ref(), "backup/big.iso".as_ref(), |s| bar.update(s))?;
//! bar.finish();
//! # Ok(())
//! # }
//! ```

use crate::copy::ProgressSample;
use anyhow::{Context, Result};
use humansize::{BINARY, format_size};
use indicatif::{ProgressBar, ProgressStyle};

pub struct CopyProgressBar {
    bar: ProgressBar,
}

impl CopyProgressBar {
    /// Creates a visible bar labelled with `name`.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_bar(ProgressBar::new(100), name)
    }

    /// Creates a bar that draws nothing, for non-interactive runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn with_bar(bar: ProgressBar, name: &str) -> Result<Self> {
        bar.set_style(
            ProgressStyle::with_template("{prefix} [{bar:30}] {pos:>3}% {msg}")
                .context("Failed to set progress template")?
                .progress_chars("=> "),
        );
        bar.set_prefix(name.to_string());
        Ok(Self { bar })
    }

    pub fn update(&self, sample: ProgressSample) {
        self.bar.set_position(u64::from(sample.percent));
        self.bar.set_message(format_rate(sample.bytes_per_second));
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

/// Formats a throughput as e.g. `"12.5 MiB/s"`.
pub fn format_rate(bytes_per_second: f64) -> String {
    let rate = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second as u64
    } else {
        0
    };
    format!("{}/s", format_size(rate, BINARY))
}

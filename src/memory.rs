//! Adaptive sizing of the scan buffer.
//!
//! The scan buffer is the largest byte window any chunked copy or comparison
//! may allocate. It is sized once per handler from the memory the platform
//! reports as available, so large files stream through a bounded buffer
//! without starving the host process.

use sysinfo::System;

/// Upper bound on the scan buffer, regardless of available memory.
pub const SCAN_BUFFER_CEILING: usize = 3 * 1024 * 1024;

/// Share of available memory the scan buffer may claim (1/N).
const MEMORY_DIVISOR: u64 = 10;

/// Computes the scan buffer size for a given amount of available memory.
///
/// Returns `min(available_bytes / 10, 3 MiB)`, clamped into `1..=i32::MAX`.
/// An `available_bytes` of zero means the platform could not report a value
/// and yields the ceiling.
///
/// # Examples
/// ```rust
/// use tur::memory::scan_buffer_size_for;
///
/// assert_eq!(scan_buffer_size_for(100 * 1024 * 1024), 3 * 1024 * 1024);
/// assert_eq!(scan_buffer_size_for(10 * 1024 * 1024), 1024 * 1024);
/// ```
pub fn scan_buffer_size_for(available_bytes: u64) -> usize {
    if available_bytes == 0 {
        return SCAN_BUFFER_CEILING;
    }

    let share = (available_bytes / MEMORY_DIVISOR)
        .min(SCAN_BUFFER_CEILING as u64)
        .min(i32::MAX as u64);

    (share as usize).max(1)
}

/// Returns the memory currently available to the process, in bytes.
///
/// Returns `None` when `sysinfo` reports nothing for this platform.
pub fn available_memory() -> Option<u64> {
    let mut system = System::new();
    system.refresh_memory();

    match system.available_memory() {
        0 => None,
        bytes => Some(bytes),
    }
}

/// Measures available memory and derives the scan buffer size from it.
pub fn detect_scan_buffer_size() -> usize {
    let available = available_memory();
    let size = scan_buffer_size_for(available.unwrap_or(0));
    tracing::debug!(?available, scan_buffer = size, "sized scan buffer");
    size
}

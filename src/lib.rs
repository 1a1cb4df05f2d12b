//! Library crate for tur
//!
//! The shared file-processing core of the `tur` file-maintenance commands
//! (copy, duplicate detection, synchronization). Commands build a
//! [`FileHandler`] and express their work through its primitives.
//!
//! # Features
//!
//! - **Filtered Enumeration**: Recursive file and directory listing with include/exclude globs
//! - **Chunked Copy**: Streaming copy through a memory-bounded buffer with progress samples
//! - **Chunked Comparison**: Byte-for-byte equality checks under the same buffer bound
//! - **Sinks**: Console, log-file and fan-out line output
//! - **Cancellation**: One cooperative signal observed between every chunk
//!
//! # Modules
//!
//! - [`cancel`]: Shared cancellation token
//! - [`config`]: Options common to every command
//! - [`filter`]: Include/exclude glob matching
//! - [`memory`]: Scan buffer sizing from available memory
//! - [`scan`]: Recursive enumeration
//! - [`copy`]: Chunked copy with progress
//! - [`compare`]: Chunked byte comparison
//! - [`output`]: Line sinks
//! - [`handler`]: Lifecycle wrapper tying everything together
//! - [`progress`]: Terminal progress bar for copies
//! - [`metrics`]: Run timing

pub mod cancel;
pub mod compare;
pub mod config;
pub mod copy;
pub mod filter;
pub mod handler;
pub mod memory;
pub mod metrics;
pub mod output;
pub mod progress;
pub mod scan;

pub use cancel::CancellationToken;
pub use config::Config;
pub use copy::{CopyOutcome, ProgressSample};
pub use filter::FilterSpec;
pub use handler::{FileHandler, HandlerBuilder};
pub use output::{AggregateSink, ConsoleSink, LogFileSink, Severity, Sink};

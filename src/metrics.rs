//! Wall-clock timing of a handler run and its summary rendering.
//!
//! ```rust
//! use tur::metrics::{RunTimer, format_elapsed};
//!
//! let timing = RunTimer::start("copy").stop();
//! println!("{} finished in {}", timing.command, format_elapsed(timing.elapsed));
//! ```

use std::time::{Duration, Instant};

/// Measures one run of a named command.
#[derive(Debug)]
pub struct RunTimer {
    command: String,
    started: Instant,
}

impl RunTimer {
    pub fn start(command: &str) -> Self {
        Self {
            command: command.to_string(),
            started: Instant::now(),
        }
    }

    /// Stops the clock.
    pub fn stop(self) -> RunTiming {
        RunTiming {
            elapsed: self.started.elapsed(),
            command: self.command,
        }
    }
}

/// A finished run: which command it was and how long it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTiming {
    pub command: String,
    pub elapsed: Duration,
}

/// Renders `duration` at millisecond precision, e.g. `"1m 3s 250ms"`.
pub fn format_elapsed(duration: Duration) -> String {
    let millis = Duration::from_millis(duration.as_millis() as u64);
    if millis.is_zero() {
        return "0ms".to_string();
    }
    humantime::format_duration(millis).to_string()
}

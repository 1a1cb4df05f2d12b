//! Shared options consumed by every handler.
//!
//! [`Config`] is the option group common to all `tur` commands. It derives
//! [`clap::Args`] so a concrete command can flatten it into its own parser:
//!
//! ```rust
//! use clap::Parser;
//! use tur::Config;
//!
//! #[derive(Parser, Debug)]
//! struct CopyCommand {
//!     #[command(flatten)]
//!     common: Config,
//!
//!     /// Destination directory
//!     target: std::path::PathBuf,
//! }
//!
//! let cmd = CopyCommand::parse_from(["copy", "out", "--exclude", "**/*.tmp"]);
//! assert_eq!(cmd.common.exclude, vec!["**/*.tmp".to_string()]);
//! ```
//!
//! The command name and the raw argument list are not parsed; the command
//! layer fills them in with [`Config::with_command`] and [`Config::with_args`].

use std::path::PathBuf;

/// Options shared by every handler. Immutable once the handler is built.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory that receives the run's log file
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Only process paths matching these glob patterns (default: everything)
    #[arg(long, value_name = "PATTERN", num_args = 1.., action = clap::ArgAction::Append)]
    pub include: Vec<String>,

    /// Skip paths matching these glob patterns (applied after --include)
    #[arg(long, value_name = "PATTERN", num_args = 1.., action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Name of the command being run, used in the log file name and header
    #[arg(skip)]
    pub command_name: String,

    /// Raw invocation arguments, echoed into the log file header
    #[arg(skip)]
    pub raw_args: Vec<String>,
}

impl Config {
    /// Creates a config for `command_name` logging into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, command_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            command_name: command_name.into(),
            ..Self::default()
        }
    }

    pub fn with_command(mut self, command_name: impl Into<String>) -> Self {
        self.command_name = command_name.into();
        self
    }

    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Rebuilds the invocation as a single shell-like line.
    ///
    /// Arguments containing whitespace or quotes are double-quoted, with
    /// embedded quotes and backslashes escaped.
    pub fn command_line(&self) -> String {
        let mut parts = vec!["tur".to_string()];
        if !self.command_name.is_empty() {
            parts.push(self.command_name.clone());
        }
        parts.extend(self.raw_args.iter().map(|arg| quote_arg(arg)));
        parts.join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if !needs_quotes {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

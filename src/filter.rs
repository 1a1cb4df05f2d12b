//! Include/exclude glob filtering.
//!
//! A [`FilterSpec`] compiles the include and exclude pattern lists of a
//! [`Config`] into two [`GlobSet`]s. A path is selected when it matches the
//! include set (or no include patterns were given) and matches none of the
//! exclude patterns. Matching is done on the path relative to the
//! enumeration root, one path at a time, so the result does not depend on
//! traversal order.
//!
//! Patterns follow shell-glob rules: `*` and `?` stay within one path
//! component, `**` spans any number of components, and `{a,b}` / `[...]`
//! alternations are supported.

use crate::config::Config;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Compiled include/exclude rule set.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FilterSpec {
    /// Compiles the patterns of `config`.
    ///
    /// # Errors
    /// Returns an error naming the first pattern that is not a valid glob.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.include, &config.exclude)
    }

    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_matcher(include)?)
        };

        Ok(Self {
            include,
            exclude: build_matcher(exclude)?,
        })
    }

    /// A filter that selects every path.
    pub fn match_all() -> Self {
        Self {
            include: None,
            exclude: GlobSet::empty(),
        }
    }

    /// Returns true if `relative` (a path relative to the enumeration root)
    /// is selected by this filter.
    pub fn is_match(&self, relative: &Path) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|set| set.is_match(relative));

        included && !self.exclude.is_match(relative)
    }
}

/// Compiles a list of glob patterns into a `GlobSet` matcher.
///
/// `*` does not cross path separators, matching shell behavior.
pub fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern.trim())
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid glob pattern: '{}'", pattern))?;
        builder.add(glob);
    }
    builder.build().context("Failed to build glob set")
}

//! Recursive, filtered enumeration of files and directories.
//!
//! This module handles:
//! - Recursive directory traversal using `WalkDir`
//! - Optional include/exclude filtering via [`FilterSpec`]
//! - Returning entries as absolute paths or paths relative to the root
//!
//! A root that does not exist yields an empty listing rather than an error.
//! Entries come back in traversal order; callers that need a stable order
//! must sort.

use crate::filter::FilterSpec;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which kind of entry an enumeration collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "FILE",
            EntryKind::Dir => "DIR",
        }
    }
}

/// How returned paths are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathForm {
    /// `root` joined with the relative path
    Absolute,
    /// Path relative to `root`
    Relative,
}

impl From<bool> for PathForm {
    fn from(absolute: bool) -> Self {
        if absolute {
            PathForm::Absolute
        } else {
            PathForm::Relative
        }
    }
}

/// Recursively lists entries of `kind` below `root`.
///
/// `root` itself is never part of the result. When `filter` is given, each
/// entry's path relative to `root` must be selected by it.
///
/// # Errors
/// Returns an error if an existing directory below `root` cannot be read.
pub fn enumerate(
    root: &Path,
    kind: EntryKind,
    filter: Option<&FilterSpec>,
    form: PathForm,
) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        tracing::debug!(root = %root.display(), "enumeration root does not exist");
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to enumerate '{}'", root.display()))?;

        // Symlinks count as what they point at; linked directories are not descended into.
        let file_type = entry.file_type();
        let wanted = if file_type.is_symlink() {
            match kind {
                EntryKind::File => entry.path().is_file(),
                EntryKind::Dir => entry.path().is_dir(),
            }
        } else {
            match kind {
                EntryKind::File => file_type.is_file(),
                EntryKind::Dir => file_type.is_dir(),
            }
        };
        if !wanted {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        if let Some(filter) = filter {
            if !filter.is_match(relative) {
                tracing::trace!(path = %relative.display(), "filtered out");
                continue;
            }
        }

        entries.push(match form {
            PathForm::Absolute => normalize(entry.path()),
            PathForm::Relative => normalize(relative),
        });
    }

    tracing::debug!(
        root = %root.display(),
        kind = kind.as_str(),
        count = entries.len(),
        "enumeration complete"
    );

    Ok(entries)
}

/// Rebuilds `path` component by component so it carries the host separator.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("top.txt"), "t").unwrap();
        fs::write(root.join("a/one.txt"), "1").unwrap();
        fs::write(root.join("a/b/two.log"), "2").unwrap();
        temp_dir
    }

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    #[test]
    fn test_relative_files_unfiltered() {
        let temp_dir = tree();
        let files = enumerate(temp_dir.path(), EntryKind::File, None, PathForm::Relative).unwrap();

        assert_eq!(
            sorted(files),
            vec![
                PathBuf::from("a").join("b").join("two.log"),
                PathBuf::from("a").join("one.txt"),
                PathBuf::from("top.txt"),
            ]
        );
    }

    #[test]
    fn test_absolute_directories() {
        let temp_dir = tree();
        let root = temp_dir.path();
        let dirs = enumerate(root, EntryKind::Dir, None, PathForm::Absolute).unwrap();

        assert_eq!(sorted(dirs), vec![root.join("a"), root.join("a").join("b")]);
    }

    #[test]
    fn test_filter_is_applied_to_relative_path() {
        let temp_dir = tree();
        let filter = FilterSpec::new(&["**/*.txt".to_string()], &[]).unwrap();
        let files = enumerate(
            temp_dir.path(),
            EntryKind::File,
            Some(&filter),
            PathForm::Absolute,
        )
        .unwrap();

        assert_eq!(
            sorted(files),
            vec![
                temp_dir.path().join("a").join("one.txt"),
                temp_dir.path().join("top.txt"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(enumerate(&missing, EntryKind::File, None, PathForm::Relative)
            .unwrap()
            .is_empty());
        assert!(enumerate(&missing, EntryKind::Dir, None, PathForm::Absolute)
            .unwrap()
            .is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_classified_by_target() {
        use std::os::unix::fs::symlink;

        let temp_dir = tree();
        let root = temp_dir.path();
        symlink(root.join("top.txt"), root.join("link.txt")).unwrap();
        symlink(root.join("a"), root.join("linked_dir")).unwrap();
        symlink(root.join("missing"), root.join("dangling")).unwrap();

        let files = enumerate(root, EntryKind::File, None, PathForm::Relative).unwrap();
        assert_eq!(
            sorted(files),
            vec![
                PathBuf::from("a").join("b").join("two.log"),
                PathBuf::from("a").join("one.txt"),
                PathBuf::from("link.txt"),
                PathBuf::from("top.txt"),
            ]
        );

        let dirs = enumerate(root, EntryKind::Dir, None, PathForm::Relative).unwrap();
        assert_eq!(
            sorted(dirs),
            vec![
                PathBuf::from("a"),
                PathBuf::from("a").join("b"),
                PathBuf::from("linked_dir"),
            ]
        );
    }

    #[test]
    fn test_path_form_from_bool() {
        assert_eq!(PathForm::from(true), PathForm::Absolute);
        assert_eq!(PathForm::from(false), PathForm::Relative);
    }
}

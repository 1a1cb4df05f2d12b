//! Byte-for-byte file comparison.
//!
//! Two files are read side by side in chunks of `min(chunk_limit, len)`
//! bytes and compared exactly. Lengths are checked first so files of
//! different size are rejected without reading content. A tripped
//! cancellation token means equality cannot be confirmed, so the comparison
//! answers `false`.

use crate::cancel::CancellationToken;
use crate::copy::chunk_len;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Returns true if `a` and `b` hold identical bytes.
///
/// Identical textual paths are equal without touching the filesystem.
///
/// # Errors
/// Returns an error if either file cannot be stat'ed, opened, or read.
pub fn is_same_file(
    a: &Path,
    b: &Path,
    chunk_limit: usize,
    cancel: &CancellationToken,
) -> Result<bool> {
    if a == b {
        return Ok(true);
    }

    let len_a = file_len(a)?;
    let len_b = file_len(b)?;
    if len_a != len_b {
        tracing::trace!(a = %a.display(), b = %b.display(), len_a, len_b, "length mismatch");
        return Ok(false);
    }

    if cancel.is_cancelled() {
        return Ok(false);
    }

    let mut file_a =
        File::open(a).with_context(|| format!("Failed to open '{}'", a.display()))?;
    let mut file_b =
        File::open(b).with_context(|| format!("Failed to open '{}'", b.display()))?;

    let chunk_size = chunk_len(chunk_limit, len_a);
    let chunks = len_a.div_ceil(chunk_size as u64);
    let mut buf_a = vec![0u8; chunk_size];
    let mut buf_b = vec![0u8; chunk_size];

    for chunk in 0..chunks {
        if cancel.is_cancelled() {
            tracing::debug!(chunk, "comparison cancelled");
            return Ok(false);
        }

        let read_a = read_chunk(&mut file_a, &mut buf_a)
            .with_context(|| format!("Failed to read '{}'", a.display()))?;
        let read_b = read_chunk(&mut file_b, &mut buf_b)
            .with_context(|| format!("Failed to read '{}'", b.display()))?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            tracing::trace!(a = %a.display(), b = %b.display(), chunk, "content mismatch");
            return Ok(false);
        }
    }

    Ok(true)
}

fn file_len(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)
        .with_context(|| format!("Failed to stat '{}'", path.display()))?
        .len())
}

/// Fills `buf` from `reader`, stopping early only at end of file.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Reader that hands out at most `step` bytes per call
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    #[test]
    fn test_read_chunk_survives_short_reads() {
        let mut reader = Trickle {
            inner: Cursor::new(b"abcdefgh".to_vec()),
            step: 3,
        };
        let mut buf = [0u8; 5];

        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"abcde");
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"fgh");
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_identical_path_needs_no_io() {
        let ghost = Path::new("/definitely/not/here.bin");
        let token = CancellationToken::new();
        token.cancel();

        assert!(is_same_file(ghost, ghost, 16, &token).unwrap());
    }

    #[test]
    fn test_last_byte_difference() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::write(&a, b"abcdefghij").unwrap();
        fs::write(&b, b"abcdefghiX").unwrap();

        let token = CancellationToken::new();
        assert!(!is_same_file(&a, &b, 3, &token).unwrap());
        assert!(!is_same_file(&a, &b, 1024, &token).unwrap());
    }

    #[test]
    fn test_empty_files_are_equal() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::write(&a, b"").unwrap();
        fs::write(&b, b"").unwrap();

        assert!(is_same_file(&a, &b, 16, &CancellationToken::new()).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        fs::write(&a, b"x").unwrap();

        let result = is_same_file(&a, &temp_dir.path().join("b"), 16, &CancellationToken::new());
        assert!(result.is_err());
    }
}

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tur::{CancellationToken, Config, ConsoleSink, FileHandler};

/// Writer whose contents stay readable after it has been moved into a sink.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, with terminal styling removed.
    pub fn text(&self) -> String {
        let bytes = self.0.lock().unwrap().clone();
        console::strip_ansi_codes(&String::from_utf8_lossy(&bytes)).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Deterministic, non-repeating-looking bytes of length `len`.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 7)) as u8).collect()
}

/// Routes `tracing` output through the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Handler logging into `config.output_dir` whose console output is captured.
pub fn captured_handler(
    config: Config,
    cancel: CancellationToken,
    scan_buffer_size: usize,
) -> (FileHandler, SharedBuffer) {
    init_tracing();
    let console = SharedBuffer::default();
    let handler = FileHandler::builder(config, cancel)
        .console(ConsoleSink::with_writer(console.clone()))
        .scan_buffer_size(scan_buffer_size)
        .build()
        .expect("Failed to build handler");
    (handler, console)
}

/// Creates a temp directory with separate `data/` and `logs/` areas.
pub fn workspace() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let data = temp_dir.path().join("data");
    let logs = temp_dir.path().join("logs");
    fs::create_dir_all(&data).unwrap();
    (temp_dir, data, logs)
}

pub fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_buffer_survives_clone() {
        let buffer = SharedBuffer::default();
        let mut writer = buffer.clone();
        writer.write_all(b"hello\n").unwrap();
        assert_eq!(buffer.text(), "hello\n");
    }

    #[test]
    fn test_write_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(temp_dir.path(), "a/b/c.txt", b"x");
        assert_eq!(fs::read(path).unwrap(), b"x");
    }
}

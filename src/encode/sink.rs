use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::encode::encoder::OutputFormat;
use crate::foundation::error::SnapframeResult;

/// Receiver of exported composites (a download, a file, a share sheet...).
pub trait OutputConsumer: Send {
    /// Take ownership of encoded bytes along with a suggested file name.
    fn accept(&mut self, bytes: Vec<u8>, suggested_filename: &str) -> SnapframeResult<()>;
}

/// `{prefix}-{unix_millis}.{ext}`.
pub fn suggested_filename(prefix: &str, format: OutputFormat, unix_millis: u128) -> String {
    format!("{prefix}-{unix_millis}.{}", format.extension())
}

/// Milliseconds since the Unix epoch; zero if the clock is before it.
pub fn unix_millis_now() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Writes each output into a directory under its suggested name.
#[derive(Clone, Debug)]
pub struct DirectoryOutput {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryOutput {
    /// Output into `dir`, which is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputConsumer for DirectoryOutput {
    fn accept(&mut self, bytes: Vec<u8>, suggested_filename: &str) -> SnapframeResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(suggested_filename);
        std::fs::write(&path, &bytes)
            .with_context(|| format!("write output '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote composite");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps the most recent output in memory.
#[derive(Debug, Default)]
pub struct MemoryOutput {
    last: Option<(String, Vec<u8>)>,
    count: usize,
}

impl MemoryOutput {
    /// Empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent `(suggested_filename, bytes)`.
    pub fn last(&self) -> Option<(&str, &[u8])> {
        self.last
            .as_ref()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    /// Outputs accepted so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl OutputConsumer for MemoryOutput {
    fn accept(&mut self, bytes: Vec<u8>, suggested_filename: &str) -> SnapframeResult<()> {
        self.last = Some((suggested_filename.to_owned(), bytes));
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::assets::decode::decode_asset;
use crate::foundation::error::{AssetLoadFailure, SnapframeError, SnapframeResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded overlay asset in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Source of overlay assets, keyed by logical name (`frame`, `logo`, ...).
///
/// A load is a suspension point; the returned future owns everything it needs so the resolver
/// can share it between waiters.
pub trait AssetStore: Send + Sync {
    /// Fetch and decode the asset called `name`.
    fn load(&self, name: &str) -> BoxFuture<'static, Result<PreparedImage, AssetLoadFailure>>;
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SnapframeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SnapframeError::config("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(SnapframeError::config("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SnapframeError::config("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SnapframeError::config("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Assets read from disk below a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
    paths: HashMap<String, String>,
}

impl FsAssetStore {
    /// Store rooted at `root` with no named assets yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: HashMap::new(),
        }
    }

    /// Map `name` to a root-relative path. The path is validated when loaded.
    pub fn with_asset(mut self, name: impl Into<String>, rel_path: impl Into<String>) -> Self {
        self.paths.insert(name.into(), rel_path.into());
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, name: &str) -> SnapframeResult<PathBuf> {
        let rel = self.paths.get(name).ok_or_else(|| {
            SnapframeError::config(format!("no path configured for asset '{name}'"))
        })?;
        let norm = normalize_rel_path(rel)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl AssetStore for FsAssetStore {
    fn load(&self, name: &str) -> BoxFuture<'static, Result<PreparedImage, AssetLoadFailure>> {
        let path = self.resolve_path(name);
        async move {
            let path = path?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("read asset bytes from '{}'", path.display()))
                .map_err(SnapframeError::from)?;
            let image = tokio::task::spawn_blocking(move || decode_asset(&bytes))
                .await
                .map_err(|e| AssetLoadFailure::new(format!("decode task failed: {e}")))??;
            Ok(image)
        }
        .boxed()
    }
}

/// In-memory encoded assets with optional simulated latency.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    entries: HashMap<String, Arc<Vec<u8>>>,
    latency: Option<Duration>,
    loads: Arc<AtomicUsize>,
}

impl MemoryAssetStore {
    /// Empty store; every load fails with "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes (PNG, JPEG, SVG, ...) under `name`.
    pub fn with_bytes(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.entries.insert(name.into(), Arc::new(bytes));
        self
    }

    /// Delay every load by `latency` before decoding.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of loads started so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl AssetStore for MemoryAssetStore {
    fn load(&self, name: &str) -> BoxFuture<'static, Result<PreparedImage, AssetLoadFailure>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let entry = self.entries.get(name).cloned();
        let latency = self.latency;
        let name = name.to_owned();
        async move {
            if let Some(d) = latency {
                tokio::time::sleep(d).await;
            }
            let bytes =
                entry.ok_or_else(|| AssetLoadFailure::new(format!("asset '{name}' not found")))?;
            Ok(decode_asset(&bytes)?)
        }
        .boxed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

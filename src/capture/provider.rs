use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::capture::frame::RawFrame;
use crate::foundation::error::SnapframeResult;

/// Which way the capturing camera faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera; frames arrive mirrored.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl FacingMode {
    /// Whether frames from this camera are mirrored.
    pub fn is_mirrored(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Source of the current video frame. Snapshotting is a suspension point.
pub trait CaptureProvider: Send + Sync {
    /// Snapshot the frame being shown right now.
    fn current_frame(&self) -> BoxFuture<'_, SnapframeResult<RawFrame>>;
}

/// Provider that always returns the same decoded still image.
#[derive(Clone, Debug)]
pub struct StillImageProvider {
    frame: Arc<RawFrame>,
}

impl StillImageProvider {
    /// Provider over an already-built frame.
    pub fn new(frame: RawFrame) -> Self {
        Self {
            frame: Arc::new(frame),
        }
    }

    /// Decode `bytes` as a still taken with `facing`.
    pub fn from_bytes(bytes: &[u8], facing: FacingMode) -> SnapframeResult<Self> {
        let img = image::load_from_memory(bytes).context("decode still image")?;
        Ok(Self::new(RawFrame::from_image(&img, facing.is_mirrored())))
    }

    /// Read and decode the image at `path`.
    pub fn from_path(path: &Path, facing: FacingMode) -> SnapframeResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read still image '{}'", path.display()))?;
        Self::from_bytes(&bytes, facing)
    }
}

impl CaptureProvider for StillImageProvider {
    fn current_frame(&self) -> BoxFuture<'_, SnapframeResult<RawFrame>> {
        let frame = self.frame.as_ref().clone();
        async move { Ok(frame) }.boxed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/provider.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::capture::provider::CaptureProvider;
use crate::compose::compositor::Compositor;
use crate::encode::encoder::{CompositeResult, encode};
use crate::encode::sink::{OutputConsumer, suggested_filename, unix_millis_now};
use crate::foundation::error::{SnapframeError, SnapframeResult};

/// One capture screen: takes snapshots, composes them, and exports the result.
///
/// At most one composite is in flight per session. A second `capture` while one is running is
/// rejected with [`SnapframeError::Busy`]; [`CaptureSession::retake`] discards the running one.
#[derive(Debug)]
pub struct CaptureSession {
    compositor: Arc<Compositor>,
    busy: AtomicBool,
    generation: AtomicU64,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CaptureSession {
    /// Session composing with `compositor`.
    pub fn new(compositor: Arc<Compositor>) -> Self {
        Self {
            compositor,
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Underlying compositor.
    pub fn compositor(&self) -> &Arc<Compositor> {
        &self.compositor
    }

    /// Whether a capture is being composed right now.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> SnapframeResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SnapframeError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    /// Snapshot `provider` and compose the frame into the configured target.
    #[tracing::instrument(skip_all)]
    pub async fn capture(
        &self,
        provider: &dyn CaptureProvider,
    ) -> SnapframeResult<CompositeResult> {
        let _guard = self.begin()?;
        let generation = self.generation.load(Ordering::Acquire);
        let is_current = || self.generation.load(Ordering::Acquire) == generation;

        let frame = provider.current_frame().await?;
        if !is_current() {
            return Err(SnapframeError::Cancelled);
        }
        let target = self.compositor.config().target;
        self.compositor
            .compose_checked(frame, &target, is_current)
            .await
    }

    /// Discard the current capture. A composite still in flight returns `Cancelled`.
    pub fn retake(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "capture discarded");
    }

    /// Encode `result` with the configured format and hand it to `consumer`.
    ///
    /// An encoding failure is retried once. Returns the suggested file name.
    pub fn export(
        &self,
        result: &CompositeResult,
        consumer: &mut dyn OutputConsumer,
    ) -> SnapframeResult<String> {
        let config = self.compositor.config();
        let bytes = match encode(result, config.output_format, config.output_quality) {
            Err(err) if err.is_retryable() => {
                tracing::warn!(error = %err, "encoding failed, retrying once");
                encode(result, config.output_format, config.output_quality)?
            }
            other => other?,
        };
        let name = suggested_filename(
            &config.filename_prefix,
            config.output_format,
            unix_millis_now(),
        );
        consumer.accept(bytes, &name)?;
        Ok(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/session.rs"]
mod tests;

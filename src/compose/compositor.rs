use std::sync::Arc;

use crate::assets::resolver::{FRAME_ASSET, LOGO_ASSET, OverlayResolver, ResolvedOverlay};
use crate::assets::store::PreparedImage;
use crate::capture::frame::RawFrame;
use crate::compose::config::{CompositorConfig, TargetSpec};
use crate::compose::surface::Surface;
use crate::encode::encoder::CompositeResult;
use crate::foundation::core::Rect;
use crate::foundation::error::{SnapframeError, SnapframeResult};
use crate::geometry::fit::{fit_contain_rect, fit_cover_rect};
use crate::geometry::mirror::MirrorTransform;

/// Turns a captured frame into a fixed-size framed composite.
///
/// Overlay resolution is the only suspension point. Once both overlays are resolved every draw
/// step runs synchronously, in order, on one surface.
#[derive(Debug)]
pub struct Compositor {
    config: CompositorConfig,
    resolver: Arc<OverlayResolver>,
}

impl Compositor {
    /// Compositor with an explicit resolver. The configuration is validated.
    pub fn new(config: CompositorConfig, resolver: Arc<OverlayResolver>) -> SnapframeResult<Self> {
        config.validate()?;
        Ok(Self { config, resolver })
    }

    /// Compositor reading overlays from the configured asset directory.
    pub fn from_config(config: CompositorConfig) -> SnapframeResult<Self> {
        config.validate()?;
        let resolver = config.overlay_resolver(Arc::new(config.asset_store()));
        Self::new(config, Arc::new(resolver))
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Shared overlay resolver.
    pub fn resolver(&self) -> &Arc<OverlayResolver> {
        &self.resolver
    }

    /// Compose `frame` into a `target`-sized result.
    pub async fn compose(
        &self,
        frame: RawFrame,
        target: &TargetSpec,
    ) -> SnapframeResult<CompositeResult> {
        self.compose_checked(frame, target, || true).await
    }

    /// Like [`Compositor::compose`], but gives up with [`SnapframeError::Cancelled`] when
    /// `is_current` reports the capture was discarded while overlays were resolving.
    #[tracing::instrument(skip_all, fields(
        width = frame.width,
        height = frame.height,
        mirrored = frame.is_mirrored_source
    ))]
    pub async fn compose_checked(
        &self,
        frame: RawFrame,
        target: &TargetSpec,
        is_current: impl Fn() -> bool,
    ) -> SnapframeResult<CompositeResult> {
        target.validate()?;
        let mirrored = frame.is_mirrored_source;
        let photo = frame.into_prepared()?;

        let (frame_overlay, logo) = tokio::join!(
            self.resolver.resolve(FRAME_ASSET),
            self.resolver.resolve(LOGO_ASSET)
        );
        if !is_current() {
            tracing::debug!("capture discarded before drawing");
            return Err(SnapframeError::Cancelled);
        }

        let mut surface = Surface::new(target.width, target.height)?;
        surface.clear(self.config.background)?;

        let photo_rect = self.config.overlay_style.photo_rect(target);
        let placed = fit_cover_rect(f64::from(photo.width), f64::from(photo.height), photo_rect)?;
        let transform = MirrorTransform::new(mirrored, photo_rect).placement(
            f64::from(photo.width),
            f64::from(photo.height),
            placed,
        );
        surface.draw_image(&photo, transform, photo_rect)?;

        draw_overlay(&mut surface, &frame_overlay, target, target.rect(), |s, img, region| {
            s.draw_image_stretched(img, region)
        })?;

        let logo_region = self.config.logo_region.rect(target);
        draw_overlay(&mut surface, &logo, target, logo_region, |s, img, region| {
            let dest = fit_contain_rect(f64::from(img.width), f64::from(img.height), region)?;
            s.draw_image_stretched(img, dest)
        })?;

        let rgba8_premul = surface.finish()?;
        tracing::debug!("composite finished");
        Ok(CompositeResult {
            width: target.width,
            height: target.height,
            rgba8_premul,
            format: self.config.output_format,
            quality: self.config.output_quality,
            background: self.config.background,
        })
    }
}

fn draw_overlay(
    surface: &mut Surface,
    overlay: &ResolvedOverlay,
    target: &TargetSpec,
    region: Rect,
    draw_image: impl FnOnce(&mut Surface, &PreparedImage, Rect) -> SnapframeResult<()>,
) -> SnapframeResult<()> {
    match overlay {
        ResolvedOverlay::Image(img) => draw_image(surface, img, region),
        ResolvedOverlay::Fallback { renderer, .. } => renderer.draw(surface, region, target),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;

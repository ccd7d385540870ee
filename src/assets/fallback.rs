use std::sync::Arc;

use crate::assets::text::FontLibrary;
use crate::compose::config::TargetSpec;
use crate::compose::style::{FillStyle, TextStyle};
use crate::compose::surface::Surface;
use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::SnapframeResult;

/// Procedural stand-in for an overlay asset that could not be loaded.
///
/// `region` is where the asset would have gone: the full target for the frame overlay, the logo
/// box for the logo. `target` is the spec being composed.
pub trait FallbackRenderer: Send + Sync + std::fmt::Debug {
    /// Draw into `surface` within `region`.
    fn draw(
        &self,
        surface: &mut Surface,
        region: Rect,
        target: &TargetSpec,
    ) -> SnapframeResult<()>;
}

/// Draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct OmitOverlay;

impl FallbackRenderer for OmitOverlay {
    fn draw(&self, _: &mut Surface, _: Rect, _: &TargetSpec) -> SnapframeResult<()> {
        Ok(())
    }
}

/// Gradient ring over the padding band of a bordered composite. The band is as thick as the
/// composed target's `padding_inset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientBorderFallback {
    /// Colour at the left edge.
    pub start: Rgba8,
    /// Colour at the right edge.
    pub end: Rgba8,
}

impl GradientBorderFallback {
    /// The four bands of a `padding`-thick ring inside `region`, clamped so they never overlap.
    pub fn ring(region: Rect, padding: f64) -> [Rect; 4] {
        let p = padding
            .max(0.0)
            .min(region.width() / 2.0)
            .min(region.height() / 2.0);
        [
            Rect::new(region.x0, region.y0, region.x1, region.y0 + p),
            Rect::new(region.x0, region.y1 - p, region.x1, region.y1),
            Rect::new(region.x0, region.y0 + p, region.x0 + p, region.y1 - p),
            Rect::new(region.x1 - p, region.y0 + p, region.x1, region.y1 - p),
        ]
    }
}

impl FallbackRenderer for GradientBorderFallback {
    fn draw(
        &self,
        surface: &mut Surface,
        region: Rect,
        target: &TargetSpec,
    ) -> SnapframeResult<()> {
        let padding = f64::from(target.padding_inset);
        if padding <= 0.0 {
            return Ok(());
        }
        surface.fill_rects(
            &Self::ring(region, padding),
            FillStyle::HorizontalGradient {
                start: self.start,
                end: self.end,
            },
        )
    }
}

/// One line of the text logo.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoLine {
    /// Text content.
    pub text: String,
    /// Colour.
    pub color: Rgba8,
    /// Relative size; the block is scaled so all lines fit the region.
    pub scale: f32,
    /// Font weight, 100..=900.
    pub weight: u16,
}

/// Stacked, centered text lines drawn in place of a missing logo image.
///
/// Text needs a font; without one each line becomes a solid bar in its colour so the region is
/// never left empty.
#[derive(Debug)]
pub struct LogoTextFallback {
    lines: Vec<LogoLine>,
    fonts: Option<Arc<FontLibrary>>,
}

const LINE_SPACING: f32 = 1.2;

impl LogoTextFallback {
    pub(crate) fn new(lines: Vec<LogoLine>, fonts: Option<Arc<FontLibrary>>) -> Self {
        Self { lines, fonts }
    }

    /// Lines drawn by this fallback.
    pub fn lines(&self) -> &[LogoLine] {
        &self.lines
    }

    fn base_size(&self, region: Rect) -> f32 {
        let units: f32 = self.lines.iter().map(|l| l.scale.max(0.0)).sum();
        if units <= 0.0 {
            return 0.0;
        }
        (region.height() as f32) / (units * LINE_SPACING)
    }

    fn draw_text(
        &self,
        surface: &mut Surface,
        region: Rect,
        fonts: &FontLibrary,
    ) -> SnapframeResult<bool> {
        let base = self.base_size(region);
        let mut shaped = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let Some(face) = fonts.face(line.weight) else {
                return Ok(false);
            };
            let style = TextStyle::new(line.color, base * line.scale).with_weight(line.weight);
            shaped.push((face, style));
        }

        let mut layouts = Vec::with_capacity(shaped.len());
        for ((face, style), line) in shaped.iter().zip(&self.lines) {
            layouts.push(surface.shape_line(&line.text, face, *style)?);
        }

        // Shrink the whole block when the widest line overflows.
        let widest = layouts.iter().map(|l| l.width()).fold(0.0, f64::max);
        if widest > region.width() && widest > 0.0 {
            let factor = (region.width() / widest) as f32;
            layouts.clear();
            for ((face, style), line) in shaped.iter().zip(&self.lines) {
                layouts.push(surface.shape_line(&line.text, face, style.scaled(factor))?);
            }
        }

        let total: f64 = layouts.iter().map(|l| l.height()).sum();
        let mut top = region.y0 + (region.height() - total).max(0.0) / 2.0;
        for layout in &layouts {
            surface.draw_line(layout, region, top);
            top += layout.height();
        }
        Ok(true)
    }

    fn draw_bars(&self, surface: &mut Surface, region: Rect) -> SnapframeResult<()> {
        let base = f64::from(self.base_size(region));
        let mut top = region.y0;
        for line in &self.lines {
            let slot = base * f64::from(line.scale) * f64::from(LINE_SPACING);
            let bar_h = base * f64::from(line.scale);
            let chars = line.text.chars().count() as f64;
            let bar_w = (chars * bar_h * 0.55).min(region.width());
            let x0 = region.x0 + (region.width() - bar_w) / 2.0;
            let y0 = top + (slot - bar_h) / 2.0;
            surface.fill_rect(
                Rect::new(x0, y0, x0 + bar_w, y0 + bar_h),
                FillStyle::Solid(line.color),
            )?;
            top += slot;
        }
        Ok(())
    }
}

impl FallbackRenderer for LogoTextFallback {
    fn draw(&self, surface: &mut Surface, region: Rect, _: &TargetSpec) -> SnapframeResult<()> {
        if self.lines.is_empty() || region.is_zero_area() {
            return Ok(());
        }
        if let Some(fonts) = &self.fonts {
            match self.draw_text(surface, region, fonts) {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "logo text fallback could not shape text"),
            }
        }
        self.draw_bars(surface, region)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fallback.rs"]
mod tests;

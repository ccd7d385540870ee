use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::assets::text::{FontFace, TextBrushRgba8, TextLayoutEngine};
use crate::compose::style::{FillStyle, TextAlign, TextStyle};
use crate::foundation::core::{Affine, MAX_SURFACE_DIM, Rect, Rgba8};
use crate::foundation::error::{SnapframeError, SnapframeResult};

/// A shaped single line of text, ready to draw.
pub(crate) struct TextLine {
    layout: parley::Layout<TextBrushRgba8>,
    font: vello_cpu::peniko::FontData,
    align: TextAlign,
}

impl TextLine {
    pub(crate) fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

/// Fixed-size CPU drawing surface.
///
/// Draw calls are recorded in painter's order and rasterized once by [`Surface::finish`]. Every
/// call takes its paint explicitly; the only state carried between calls is the recorded scene.
pub struct Surface {
    width: u32,
    height: u32,
    ctx: vello_cpu::RenderContext,
    text: TextLayoutEngine,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Blank transparent surface.
    pub fn new(width: u32, height: u32) -> SnapframeResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(w, h),
            text: TextLayoutEngine::new(),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(0, 0, width, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Drop everything drawn so far and fill with `color`.
    pub fn clear(&mut self, color: Rgba8) -> SnapframeResult<()> {
        self.ctx.reset();
        self.fill_rect(self.bounds(), FillStyle::Solid(color))
    }

    /// Fill `rect` (surface coordinates).
    pub fn fill_rect(&mut self, rect: Rect, style: FillStyle) -> SnapframeResult<()> {
        self.fill_rects(&[rect], style)
    }

    /// Fill several rectangles with one paint. Gradients span the surface, not each rectangle.
    pub fn fill_rects(&mut self, rects: &[Rect], style: FillStyle) -> SnapframeResult<()> {
        match style {
            FillStyle::Solid(c) => {
                self.ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                for r in rects {
                    self.ctx.fill_rect(&rect_to_cpu(*r));
                }
            }
            FillStyle::HorizontalGradient { start, end } => {
                // One-pixel-tall ramp stretched over the full height.
                let ramp = horizontal_ramp(start, end, self.width)?;
                let stretch = Affine::scale_non_uniform(1.0, f64::from(self.height));
                let inv = stretch.inverse();
                self.ctx.set_transform(affine_to_cpu(stretch));
                self.ctx.set_paint(ramp);
                for r in rects {
                    self.ctx.fill_rect(&rect_to_cpu(inv.transform_rect_bbox(*r)));
                }
            }
        }
        Ok(())
    }

    /// Draw `image` through `transform` (image pixels to surface), limited to `clip`.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        transform: Affine,
        clip: Rect,
    ) -> SnapframeResult<()> {
        let det = transform.determinant();
        if !det.is_finite() || det == 0.0 {
            return Err(SnapframeError::invalid_dimension(
                "image transform must be invertible",
            ));
        }
        let image_bounds = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let visible = transform
            .inverse()
            .transform_rect_bbox(clip)
            .intersect(image_bounds);
        if visible.is_zero_area() {
            return Ok(());
        }

        let paint = image_paint(image)?;
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&rect_to_cpu(visible));
        Ok(())
    }

    /// Stretch `image` onto exactly `dest`.
    pub fn draw_image_stretched(
        &mut self,
        image: &PreparedImage,
        dest: Rect,
    ) -> SnapframeResult<()> {
        let t = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / f64::from(image.width),
                dest.height() / f64::from(image.height),
            );
        self.draw_image(image, t, dest)
    }

    /// Shape `text` in `face` without drawing it.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        face: &FontFace,
        style: TextStyle,
    ) -> SnapframeResult<TextLine> {
        let layout = self
            .text
            .layout_line(text, face, style.size_px, style.color.into())?;
        Ok(TextLine {
            layout,
            font: face.font_data().clone(),
            align: style.align,
        })
    }

    /// Draw a shaped line inside the horizontal span of `bounds`, top edge at `top`.
    pub(crate) fn draw_line(&mut self, line: &TextLine, bounds: Rect, top: f64) {
        let x = match line.align {
            TextAlign::Start => bounds.x0,
            TextAlign::Center => bounds.x0 + (bounds.width() - line.width()) / 2.0,
        };
        self.ctx.set_transform(affine_to_cpu(Affine::translate((x, top))));
        for l in line.layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&line.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn and return premultiplied RGBA8 pixels.
    pub fn finish(mut self) -> SnapframeResult<Vec<u8>> {
        let (w, h) = surface_dims(self.width, self.height)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

fn surface_dims(width: u32, height: u32) -> SnapframeResult<(u16, u16)> {
    if width == 0 || height == 0 || width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(SnapframeError::invalid_dimension(format!(
            "surface is {width}x{height}, must be within 1..={MAX_SURFACE_DIM} per side"
        )));
    }
    Ok((width as u16, height as u16))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SnapframeResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SnapframeError::invalid_dimension("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn image_paint(image: &PreparedImage) -> SnapframeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn horizontal_ramp(start: Rgba8, end: Rgba8, width: u32) -> SnapframeResult<vello_cpu::Image> {
    let w1 = (width.max(1) - 1) as f32;
    let mut bytes = Vec::with_capacity(width as usize * 4);
    for x in 0..width {
        let t = if w1 <= 0.0 { 0.0 } else { (x as f32) / w1 };
        bytes.extend_from_slice(&start.lerp(end, t).premultiplied().to_array());
    }
    image_paint(&PreparedImage {
        width,
        height: 1,
        rgba8_premul: Arc::new(bytes),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/surface.rs"]
mod tests;

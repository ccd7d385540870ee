use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::PreparedImage;
use crate::foundation::core::MAX_SURFACE_DIM;
use crate::foundation::error::{SnapframeError, SnapframeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decode encoded overlay bytes, sniffing SVG by its leading markup.
pub fn decode_asset(bytes: &[u8]) -> SnapframeResult<PreparedImage> {
    if looks_like_svg(bytes) {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

/// Decode a raster format supported by `image` into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SnapframeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    check_raster_size(width, height)?;

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse an SVG document and rasterize it at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> SnapframeResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let width = svg_px(size.width())?;
    let height = svg_px(size.height())?;
    check_raster_size(width, height)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("failed to allocate svg pixmap {width}x{height}"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

fn svg_px(v: f32) -> SnapframeResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(SnapframeError::invalid_dimension(
            "svg has invalid width/height",
        ));
    }
    Ok((v.ceil() as u32).max(1))
}

fn check_raster_size(width: u32, height: u32) -> SnapframeResult<()> {
    if width == 0 || height == 0 || width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
        return Err(SnapframeError::invalid_dimension(format!(
            "decoded asset is {width}x{height}, must be within 1..={MAX_SURFACE_DIM} per side"
        )));
    }
    Ok(())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"<")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

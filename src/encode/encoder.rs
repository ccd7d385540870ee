use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SnapframeError, SnapframeResult};
use crate::foundation::math::{flatten_premul_over_bg_to_rgb8, unpremultiply_rgba8};

/// Export encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// PNG, alpha preserved, quality ignored.
    #[default]
    Lossless,
    /// JPEG, alpha flattened over the background.
    Lossy,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Lossless => "png",
            Self::Lossy => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Lossless => "image/png",
            Self::Lossy => "image/jpeg",
        }
    }
}

/// A finished composite: premultiplied RGBA8 pixels at the target size plus how to export them.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeResult {
    /// Width in pixels; equals the target width.
    pub width: u32,
    /// Height in pixels; equals the target height.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
    /// Requested encoding.
    pub format: OutputFormat,
    /// Lossy quality in `[0, 1]`.
    pub quality: f32,
    /// Colour transparent pixels are flattened onto for lossy output.
    pub background: Rgba8,
}

impl CompositeResult {
    /// Encode with the result's own format and quality.
    pub fn encode(&self) -> SnapframeResult<Vec<u8>> {
        encode(self, self.format, self.quality)
    }

    /// Straight-alpha pixel at `(x, y)`, if inside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        let s = unpremultiply_rgba8(px);
        Some(Rgba8::new(s[0], s[1], s[2], s[3]))
    }

    /// Straight-alpha copy as an `image` buffer.
    pub fn to_rgba_image(&self) -> SnapframeResult<image::RgbaImage> {
        check_buffer(self)?;
        let straight = unpremultiply_rgba8(&self.rgba8_premul);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| SnapframeError::encoding("pixel buffer does not match dimensions"))
    }
}

fn check_buffer(result: &CompositeResult) -> SnapframeResult<()> {
    if result.width == 0 || result.height == 0 {
        return Err(SnapframeError::encoding("composite has zero dimensions"));
    }
    let expected = (result.width as usize)
        .saturating_mul(result.height as usize)
        .saturating_mul(4);
    if result.rgba8_premul.len() != expected {
        return Err(SnapframeError::encoding(format!(
            "pixel buffer is {} bytes, expected {expected} for {}x{}",
            result.rgba8_premul.len(),
            result.width,
            result.height
        )));
    }
    Ok(())
}

/// Map `[0, 1]` quality onto the JPEG 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> SnapframeResult<u8> {
    if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
        return Err(SnapframeError::encoding(format!(
            "quality must be within [0, 1], got {quality}"
        )));
    }
    Ok(((quality * 100.0).round() as u8).clamp(1, 100))
}

/// Serialize `result` to PNG or JPEG bytes. Identical inputs give identical bytes.
#[tracing::instrument(skip(result), fields(width = result.width, height = result.height))]
pub fn encode(
    result: &CompositeResult,
    format: OutputFormat,
    quality: f32,
) -> SnapframeResult<Vec<u8>> {
    check_buffer(result)?;
    let mut out = Vec::new();
    match format {
        OutputFormat::Lossless => {
            let straight = unpremultiply_rgba8(&result.rgba8_premul);
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(
                    &straight,
                    result.width,
                    result.height,
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| SnapframeError::encoding(format!("png: {e}")))?;
        }
        OutputFormat::Lossy => {
            let q = jpeg_quality(quality)?;
            let bg = result.background;
            let rgb = flatten_premul_over_bg_to_rgb8(&result.rgba8_premul, [bg.r, bg.g, bg.b]);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, q)
                .write_image(
                    &rgb,
                    result.width,
                    result.height,
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| SnapframeError::encoding(format!("jpeg: {e}")))?;
        }
    }
    tracing::debug!(bytes = out.len(), "encoded composite");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;

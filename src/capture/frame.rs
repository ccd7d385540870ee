use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::MAX_SURFACE_DIM;
use crate::foundation::error::{SnapframeError, SnapframeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// One captured video frame: straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub rgba8: Vec<u8>,
    /// True for front-facing captures, which arrive mirrored.
    pub is_mirrored_source: bool,
}

impl RawFrame {
    /// Wrap a pixel buffer without validating it; see [`RawFrame::validate`].
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>, is_mirrored_source: bool) -> Self {
        Self {
            width,
            height,
            rgba8,
            is_mirrored_source,
        }
    }

    /// Frame from a decoded still image.
    pub fn from_image(image: &image::DynamicImage, is_mirrored_source: bool) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw(), is_mirrored_source)
    }

    /// Reject frames the compositor cannot draw.
    pub fn validate(&self) -> SnapframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapframeError::invalid_frame(format!(
                "frame has zero dimension ({}x{})",
                self.width, self.height
            )));
        }
        if self.width > MAX_SURFACE_DIM || self.height > MAX_SURFACE_DIM {
            return Err(SnapframeError::invalid_frame(format!(
                "frame {}x{} exceeds the {MAX_SURFACE_DIM}px raster limit",
                self.width, self.height
            )));
        }
        let expected = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4);
        if self.rgba8.len() != expected {
            return Err(SnapframeError::invalid_frame(format!(
                "buffer is {} bytes, expected {expected} for {}x{} RGBA8",
                self.rgba8.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Validate and convert into a premultiplied image, consuming the frame.
    pub(crate) fn into_prepared(self) -> SnapframeResult<PreparedImage> {
        self.validate()?;
        let mut px = self.rgba8;
        premultiply_rgba8_in_place(&mut px);
        Ok(PreparedImage {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::new(px),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;

use crate::foundation::core::Rgba8;

/// Paint for a single fill call. Passed by value into every draw operation; the surface keeps no
/// fill state between calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillStyle {
    /// Uniform colour.
    Solid(Rgba8),
    /// Left-to-right blend between two colours across the surface width.
    HorizontalGradient {
        /// Colour at `x = 0`.
        start: Rgba8,
        /// Colour at the right edge.
        end: Rgba8,
    },
}

/// Alignment of a text line inside its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Flush left.
    Start,
    /// Centered.
    #[default]
    Center,
}

/// Typography for one line of procedural text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Glyph colour.
    pub color: Rgba8,
    /// Font size in pixels.
    pub size_px: f32,
    /// CSS-style weight, 100..=900.
    pub weight: u16,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl TextStyle {
    /// Centered regular-weight text.
    pub fn new(color: Rgba8, size_px: f32) -> Self {
        Self {
            color,
            size_px,
            weight: 400,
            align: TextAlign::Center,
        }
    }

    /// Same style with another weight.
    pub fn with_weight(self, weight: u16) -> Self {
        Self { weight, ..self }
    }

    /// Same style scaled by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            size_px: self.size_px * factor,
            ..self
        }
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::fallback::{
    FallbackRenderer, GradientBorderFallback, LogoLine, LogoTextFallback, OmitOverlay,
};
use crate::assets::resolver::{FRAME_ASSET, LOGO_ASSET, OverlayResolver};
use crate::assets::store::{AssetStore, FsAssetStore};
use crate::assets::text::FontLibrary;
use crate::encode::encoder::OutputFormat;
use crate::foundation::core::{MAX_SURFACE_DIM, Rect, Rgba8};
use crate::foundation::error::{SnapframeError, SnapframeResult};

/// Output raster size and the padding reserved by the bordered style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Inset on every side, in pixels.
    pub padding_inset: u32,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            padding_inset: 40,
        }
    }
}

impl TargetSpec {
    /// Full target rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Target shrunk by the padding on all sides.
    pub fn inset_rect(&self) -> Rect {
        let p = f64::from(self.padding_inset);
        Rect::new(p, p, f64::from(self.width) - p, f64::from(self.height) - p)
    }

    /// Reject sizes the raster cannot hold and paddings that leave no photo area.
    pub fn validate(&self) -> SnapframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapframeError::config("target width/height must be > 0"));
        }
        if self.width > MAX_SURFACE_DIM || self.height > MAX_SURFACE_DIM {
            return Err(SnapframeError::config(format!(
                "target {}x{} exceeds {MAX_SURFACE_DIM}px",
                self.width, self.height
            )));
        }
        let inset = self.inset_rect();
        if inset.width() <= 0.0 || inset.height() <= 0.0 {
            return Err(SnapframeError::config(format!(
                "padding_inset {} leaves no room inside {}x{}",
                self.padding_inset, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// How the photo relates to the frame overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    /// Photo covers the whole target; the frame graphic sits on top.
    #[default]
    FullBleed,
    /// Photo covers the inset rectangle; the padding ring shows the frame.
    Bordered,
}

impl OverlayStyle {
    /// Rectangle the photo is fitted into, which is also the mirror axis.
    pub fn photo_rect(self, target: &TargetSpec) -> Rect {
        match self {
            Self::FullBleed => target.rect(),
            Self::Bordered => target.inset_rect(),
        }
    }
}

/// Fixed box the logo is contained in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoRegion {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Distance below the padding inset.
    pub top_margin: f64,
}

impl Default for LogoRegion {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 60.0,
            top_margin: 20.0,
        }
    }
}

impl LogoRegion {
    /// Horizontally centered in `target`, top edge at `padding_inset + top_margin`.
    pub fn rect(&self, target: &TargetSpec) -> Rect {
        let x0 = (f64::from(target.width) - self.width) / 2.0;
        let y0 = f64::from(target.padding_inset) + self.top_margin;
        Rect::new(x0, y0, x0 + self.width, y0 + self.height)
    }
}

/// One configured line of the text logo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoLineConfig {
    /// Text content.
    pub text: String,
    /// Colour.
    pub color: Rgba8,
    /// Size relative to the other lines.
    #[serde(default = "one")]
    pub scale: f32,
    /// Font weight, 100..=900.
    #[serde(default = "regular")]
    pub weight: u16,
}

fn one() -> f32 {
    1.0
}

fn regular() -> u16 {
    400
}

/// Text drawn when the logo image is unavailable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackLogoConfig {
    /// Lines from top to bottom.
    pub lines: Vec<LogoLineConfig>,
    /// Font file; system sans-serif when absent.
    pub font_path: Option<PathBuf>,
}

impl Default for FallbackLogoConfig {
    fn default() -> Self {
        let teal = Rgba8::opaque(0x0c, 0x85, 0x96);
        let magenta = Rgba8::opaque(0xa3, 0x21, 0x6e);
        Self {
            lines: vec![
                LogoLineConfig {
                    text: "It Takes a".to_owned(),
                    color: teal,
                    scale: 1.0,
                    weight: 400,
                },
                LogoLineConfig {
                    text: "Community".to_owned(),
                    color: magenta,
                    scale: 2.0,
                    weight: 700,
                },
                LogoLineConfig {
                    text: "to drive Change".to_owned(),
                    color: teal,
                    scale: 1.0,
                    weight: 400,
                },
            ],
            font_path: None,
        }
    }
}

/// Where overlay assets live on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetPaths {
    /// Directory the other paths are relative to.
    pub root: PathBuf,
    /// Frame overlay, relative to `root`.
    pub frame: String,
    /// Logo, relative to `root`.
    pub logo: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            frame: "frame.png".to_owned(),
            logo: "logo/logo.png".to_owned(),
        }
    }
}

/// Everything that shapes a composite. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Output size and padding.
    pub target: TargetSpec,
    /// Full-bleed or bordered.
    pub overlay_style: OverlayStyle,
    /// Export encoding.
    pub output_format: OutputFormat,
    /// Lossy quality in `[0, 1]`.
    pub output_quality: f32,
    /// Colour under everything, and behind transparent pixels in lossy output.
    pub background: Rgba8,
    /// Left and right colours of the fallback border ring.
    pub border_gradient: [Rgba8; 2],
    /// Logo placement.
    pub logo_region: LogoRegion,
    /// Text logo used when the logo image is unavailable.
    pub fallback_logo: FallbackLogoConfig,
    /// Overlay asset locations.
    pub assets: AssetPaths,
    /// Upper bound for one overlay load.
    pub asset_timeout_ms: u64,
    /// Start of suggested export file names.
    pub filename_prefix: String,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            overlay_style: OverlayStyle::default(),
            output_format: OutputFormat::default(),
            output_quality: 0.9,
            background: Rgba8::WHITE,
            border_gradient: [
                Rgba8::opaque(0x0c, 0x85, 0x96),
                Rgba8::opaque(0xa3, 0x21, 0x6e),
            ],
            logo_region: LogoRegion::default(),
            fallback_logo: FallbackLogoConfig::default(),
            assets: AssetPaths::default(),
            asset_timeout_ms: 5000,
            filename_prefix: "framed-photo".to_owned(),
        }
    }
}

impl CompositorConfig {
    /// Parse JSON from a reader. Does not validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> SnapframeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SnapframeError::config(format!("parse config JSON: {e}")))
    }

    /// Parse a JSON file from disk. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> SnapframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SnapframeError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> SnapframeResult<()> {
        self.target.validate()?;
        if !self.output_quality.is_finite() || !(0.0..=1.0).contains(&self.output_quality) {
            return Err(SnapframeError::config(format!(
                "output_quality must be within [0, 1], got {}",
                self.output_quality
            )));
        }
        let region = self.logo_region;
        if !(region.width.is_finite() && region.height.is_finite() && region.top_margin.is_finite())
            || region.width <= 0.0
            || region.height <= 0.0
            || region.top_margin < 0.0
        {
            return Err(SnapframeError::config(
                "logo_region width/height must be > 0 and top_margin >= 0",
            ));
        }
        if region.width > f64::from(self.target.width) {
            return Err(SnapframeError::config(format!(
                "logo_region width {} is wider than the {}px target",
                region.width, self.target.width
            )));
        }
        if self.asset_timeout_ms == 0 {
            return Err(SnapframeError::config("asset_timeout_ms must be > 0"));
        }
        if let Some(line) = self
            .fallback_logo
            .lines
            .iter()
            .find(|l| !(l.scale.is_finite() && l.scale > 0.0) || !(100..=900).contains(&l.weight))
        {
            return Err(SnapframeError::config(format!(
                "fallback logo line '{}' needs scale > 0 and weight within 100..=900",
                line.text
            )));
        }
        if self.filename_prefix.is_empty() || self.filename_prefix.contains(['/', '\\']) {
            return Err(SnapframeError::config(
                "filename_prefix must be non-empty and contain no path separators",
            ));
        }
        Ok(())
    }

    /// Per-load timeout.
    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }

    /// Rectangle the photo is fitted into for the configured style and target.
    pub fn photo_rect(&self) -> Rect {
        self.overlay_style.photo_rect(&self.target)
    }

    /// Asset store reading `assets.frame` and `assets.logo` below `assets.root`.
    pub fn asset_store(&self) -> FsAssetStore {
        FsAssetStore::new(&self.assets.root)
            .with_asset(FRAME_ASSET, &self.assets.frame)
            .with_asset(LOGO_ASSET, &self.assets.logo)
    }

    /// Fallback for a missing frame: the gradient ring when bordered, nothing when full-bleed.
    pub fn frame_fallback(&self) -> Arc<dyn FallbackRenderer> {
        match self.overlay_style {
            OverlayStyle::FullBleed => Arc::new(OmitOverlay),
            OverlayStyle::Bordered => Arc::new(GradientBorderFallback {
                start: self.border_gradient[0],
                end: self.border_gradient[1],
            }),
        }
    }

    pub(crate) fn logo_lines(&self) -> Vec<LogoLine> {
        self.fallback_logo
            .lines
            .iter()
            .map(|l| LogoLine {
                text: l.text.clone(),
                color: l.color,
                scale: l.scale,
                weight: l.weight,
            })
            .collect()
    }

    /// Text logo fallback. Loads fonts, so build it once per configuration.
    pub fn logo_fallback(&self) -> Arc<dyn FallbackRenderer> {
        let fonts = FontLibrary::load(self.fallback_logo.font_path.as_deref()).map(Arc::new);
        if fonts.is_none() {
            tracing::warn!("no fonts available, logo fallback draws solid bars");
        }
        Arc::new(LogoTextFallback::new(self.logo_lines(), fonts))
    }

    /// Resolver over `store` with this configuration's timeout and fallbacks.
    pub fn overlay_resolver(&self, store: Arc<dyn AssetStore>) -> OverlayResolver {
        OverlayResolver::new(store, self.asset_timeout())
            .with_fallback(FRAME_ASSET, self.frame_fallback())
            .with_fallback(LOGO_ASSET, self.logo_fallback())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/config.rs"]
mod tests;

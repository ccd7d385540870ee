#![forbid(unsafe_code)]
//! Capture-to-still compositing.
//!
//! A [`RawFrame`] from a [`CaptureProvider`] is fitted to cover a fixed portrait target, mirrored
//! when the source was, overlaid with a full-bleed frame and a logo (or their procedural
//! fallbacks), and encoded to PNG or JPEG for an [`OutputConsumer`].

mod assets;
mod capture;
mod compose;
mod encode;
mod foundation;
mod geometry;

pub use assets::decode::{decode_asset, decode_image, decode_svg};
pub use assets::fallback::{
    FallbackRenderer, GradientBorderFallback, LogoLine, LogoTextFallback, OmitOverlay,
};
pub use assets::resolver::{AssetState, FRAME_ASSET, LOGO_ASSET, OverlayResolver, ResolvedOverlay};
pub use assets::store::{
    AssetStore, FsAssetStore, MemoryAssetStore, PreparedImage, normalize_rel_path,
};
pub use capture::frame::RawFrame;
pub use capture::provider::{CaptureProvider, FacingMode, StillImageProvider};
pub use compose::compositor::Compositor;
pub use compose::config::{
    AssetPaths, CompositorConfig, FallbackLogoConfig, LogoLineConfig, LogoRegion, OverlayStyle,
    TargetSpec,
};
pub use compose::session::CaptureSession;
pub use compose::style::{FillStyle, TextAlign, TextStyle};
pub use compose::surface::Surface;
pub use encode::encoder::{CompositeResult, OutputFormat, encode, jpeg_quality};
pub use encode::sink::{
    DirectoryOutput, MemoryOutput, OutputConsumer, suggested_filename, unix_millis_now,
};
pub use foundation::core::{Affine, MAX_SURFACE_DIM, Point, Rect, Rgba8, Rgba8Premul, Size, Vec2};
pub use foundation::error::{AssetLoadFailure, SnapframeError, SnapframeResult};
pub use geometry::fit::{FitGeometry, fit_contain_rect, fit_cover, fit_cover_rect};
pub use geometry::mirror::MirrorTransform;

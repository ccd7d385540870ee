use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SnapframeError, SnapframeResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// One font face: raw file bytes, face index inside the file and its weight.
#[derive(Clone, Debug)]
pub(crate) struct FontFace {
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) index: u32,
    pub(crate) weight: u16,
    font: vello_cpu::peniko::FontData,
}

impl FontFace {
    pub(crate) fn new(data: Vec<u8>, index: u32, weight: u16) -> Self {
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(data.clone()), index);
        Self {
            data: Arc::new(data),
            index,
            weight,
            font,
        }
    }

    /// Face data for the CPU glyph rasterizer.
    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }
}

/// Faces available to procedural text, backed by a `fontdb` database.
///
/// Either a single configured font file or the system fonts.
pub(crate) struct FontLibrary {
    db: usvg::fontdb::Database,
    // Keyed by requested weight; keeps face bytes shared so shaping reuses registered families.
    faces: Mutex<HashMap<u16, Option<FontFace>>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontLibrary {
    /// Library holding only the faces of the font file at `path`.
    pub(crate) fn from_file(path: &Path) -> SnapframeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes);
        if db.is_empty() {
            return Err(SnapframeError::config(format!(
                "no usable font faces in '{}'",
                path.display()
            )));
        }
        Ok(Self::with_db(db))
    }

    fn with_db(db: usvg::fontdb::Database) -> Self {
        Self {
            db,
            faces: Mutex::new(HashMap::new()),
        }
    }

    /// Library over the fonts installed on this machine. May be empty.
    pub(crate) fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_db(db)
    }

    /// Configured file when given, else the system fonts; `None` when nothing usable exists.
    pub(crate) fn load(font_path: Option<&Path>) -> Option<Self> {
        if let Some(path) = font_path {
            match Self::from_file(path) {
                Ok(lib) => return Some(lib),
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "falling back to system fonts"
                    );
                }
            }
        }
        let lib = Self::system();
        if lib.db.is_empty() { None } else { Some(lib) }
    }

    /// Closest sans-serif face to `weight` (100..=900), falling back to any face.
    pub(crate) fn face(&self, weight: u16) -> Option<FontFace> {
        let mut faces = self.faces.lock().unwrap_or_else(PoisonError::into_inner);
        faces
            .entry(weight)
            .or_insert_with(|| self.query_face(weight))
            .clone()
    }

    fn query_face(&self, weight: u16) -> Option<FontFace> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let families = [Family::SansSerif, Family::Serif, Family::Monospace];
        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;
        let actual_weight = self.db.face(id).map(|f| f.weight.0).unwrap_or(weight);

        self.db
            .with_face_data(id, |data, index| FontFace::new(data.to_vec(), index, actual_weight))
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<(usize, u32), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> SnapframeResult<String> {
        let key = (Arc::as_ptr(&face.data) as usize, face.index);
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.data.to_vec()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SnapframeError::config("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SnapframeError::config("registered font family has no name"))?
            .to_string();

        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Shape a single unwrapped line in `face` at `size_px`.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SnapframeResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SnapframeError::invalid_dimension(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;

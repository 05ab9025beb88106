//! Font faces backed by ttf-parser

use std::path::Path as FsPath;
use std::sync::Arc;

use ttf_parser::{name_id, Face, GlyphId, OutlineBuilder};
use waah_paint::{Path, Point};

use crate::glyph::{GlyphOutline, GlyphSource};
use crate::{Result, TextError};

/// Requested style flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// A parsed font face.
///
/// The raw font data is shared; the ttf-parser view is rebuilt on each
/// lookup, which only reads table offsets.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<[u8]>,
    face_index: u32,
    units_per_em: u16,
    name: Option<String>,
    family: Option<String>,
    style: Option<String>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("family", &self.family)
            .field("style", &self.style)
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontFace {
    /// Load a font file from disk
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            TextError::FontLoad(format!("Failed to read font file {:?}: {}", path, e))
        })?;
        let face = Self::from_data(data)?;
        tracing::debug!("Loaded font {:?} from {:?}", face.name, path);
        Ok(face)
    }

    /// Parse the first face in `data`
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Parse face `face_index` of a font file or collection
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data: Arc<[u8]> = data.into();
        let face = Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParse(e.to_string()))?;
        let units_per_em = face.units_per_em();
        let name = postscript_name(&face);
        Ok(Self {
            data,
            face_index,
            units_per_em,
            name,
            family: None,
            style: None,
        })
    }

    /// Built-in face with no glyphs. Every character advances by half an em.
    pub fn fallback() -> Self {
        Self {
            data: Arc::from(Vec::new()),
            face_index: 0,
            units_per_em: 1000,
            name: None,
            family: None,
            style: None,
        }
    }

    /// Attach family and style names from a font database
    pub(crate) fn with_metadata(mut self, family: String, style: String) -> Self {
        self.family = Some(family);
        self.style = Some(style);
        self
    }

    /// PostScript name from the font's name table
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Family name, known only for faces found through the registry
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Style name, known only for faces found through the registry
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn is_fallback(&self) -> bool {
        self.data.is_empty()
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.face_index).ok()
    }

    pub fn glyph_count(&self) -> u16 {
        self.face().map_or(0, |f| f.number_of_glyphs())
    }
}

fn postscript_name(face: &Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|n| n.to_string())
}

impl GlyphSource for FontFace {
    fn units_per_em(&self) -> f64 {
        self.units_per_em as f64
    }

    fn glyph(&self, c: char) -> Option<GlyphOutline> {
        let face = self.face()?;
        let id = face.glyph_index(c)?;
        let mut builder = PathCollector::default();
        // Glyphs without contours (spaces) have no outline but still advance.
        face.outline_glyph(id, &mut builder);
        Some(GlyphOutline {
            path: builder.path,
            advance: face.glyph_hor_advance(id).unwrap_or(0) as f64,
        })
    }

    fn fallback_advance(&self) -> f64 {
        self.face()
            .and_then(|f| f.glyph_hor_advance(GlyphId(0)))
            .filter(|a| *a > 0)
            .map_or(self.units_per_em() / 2.0, |a| a as f64)
    }
}

/// Collects ttf-parser outline callbacks into a path; quadratic segments
/// are raised to cubics.
#[derive(Default)]
struct PathCollector {
    path: Path,
}

impl OutlineBuilder for PathCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x as f64, y as f64);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.path.current_point().unwrap_or(Point::ZERO);
        let q = Point::new(x1 as f64, y1 as f64);
        let p = Point::new(x as f64, y as f64);
        let c1 = p0 + (q - p0) * (2.0 / 3.0);
        let c2 = p + (q - p) * (2.0 / 3.0);
        self.path.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path.curve_to(
            x1 as f64, y1 as f64, x2 as f64, y2 as f64, x as f64, y as f64,
        );
    }

    fn close(&mut self) {
        self.path.close();
    }
}

//! Glyph outlines as consumed by the shaper

use std::fmt::Debug;

use waah_paint::Path;

/// Outline of one character in font design units, y pointing up
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphOutline {
    pub path: Path,
    pub advance: f64,
}

/// Anything that can supply glyph outlines.
///
/// Implemented by [`FontFace`](crate::FontFace); tests and embedders can
/// provide their own outlines without a font file.
pub trait GlyphSource: Debug + Send + Sync {
    /// Design units per em; outlines are scaled by `size / units_per_em`
    fn units_per_em(&self) -> f64;

    /// Outline for `c`, or `None` when the font has no glyph for it
    fn glyph(&self, c: char) -> Option<GlyphOutline>;

    /// Advance used for characters without a glyph
    fn fallback_advance(&self) -> f64 {
        self.units_per_em() / 2.0
    }
}

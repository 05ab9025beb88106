//! Text to path conversion
//!
//! Glyphs are laid out left to right on a single baseline. Each outline is
//! scaled from design units by `size / units_per_em`, flipped so font y-up
//! becomes canvas y-down, and placed at the pen position.

use waah_paint::{Matrix, Path, Point};

use crate::glyph::GlyphSource;

/// Ink and advance metrics of a run of text, relative to its origin.
///
/// `x_bearing`/`y_bearing` locate the top-left of the ink box; with y
/// pointing down, `y_bearing` is negative for text above the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub x_advance: f64,
    pub y_advance: f64,
}

/// Outlines of a shaped run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedText {
    pub path: Path,
    /// Pen position after the last glyph
    pub end: Point,
}

/// Lays out text with a fixed size and letter spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShaper {
    size: f64,
    letter_spacing: f64,
}

impl TextShaper {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            letter_spacing: 0.0,
        }
    }

    /// Extra advance after every glyph, in output units
    pub fn with_letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Outline `text` with its baseline origin at `origin`
    pub fn shape(&self, text: &str, font: &dyn GlyphSource, origin: Point) -> ShapedText {
        let upem = font.units_per_em();
        let scale = if upem > 0.0 { self.size / upem } else { 0.0 };
        let mut path = Path::new();
        let mut pen_x = origin.x;
        let mut missing = 0usize;

        for c in text.chars() {
            let advance = match font.glyph(c) {
                Some(glyph) => {
                    if !glyph.path.is_empty() {
                        let place = Matrix::new(scale, 0.0, 0.0, -scale, pen_x, origin.y);
                        path.append(&glyph.path.transformed(&place));
                    }
                    glyph.advance
                }
                None => {
                    missing += 1;
                    font.fallback_advance()
                }
            };
            pen_x += advance * scale + self.letter_spacing;
        }

        if missing > 0 {
            tracing::trace!("{} characters of {:?} have no glyph", missing, text);
        }

        ShapedText {
            path,
            end: Point::new(pen_x, origin.y),
        }
    }

    /// Metrics of `text` as `shape` would lay it out at the origin
    pub fn extents(&self, text: &str, font: &dyn GlyphSource) -> TextExtents {
        let shaped = self.shape(text, font, Point::ZERO);
        let mut extents = TextExtents {
            x_advance: shaped.end.x,
            ..Default::default()
        };
        if let Some(bounds) = shaped.path.bounds() {
            extents.width = bounds.width;
            extents.height = bounds.height;
            extents.x_bearing = bounds.x;
            extents.y_bearing = bounds.y;
        }
        extents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphOutline;
    use waah_paint::primitives;

    /// 'I' is a 100x700 bar, space is empty; nothing else exists.
    #[derive(Debug)]
    struct BarFont;

    impl GlyphSource for BarFont {
        fn units_per_em(&self) -> f64 {
            1000.0
        }

        fn glyph(&self, c: char) -> Option<GlyphOutline> {
            let mut path = Path::new();
            match c {
                'I' => {
                    path.extend(primitives::rect(0.0, 0.0, 100.0, 700.0));
                    Some(GlyphOutline {
                        path,
                        advance: 200.0,
                    })
                }
                ' ' => Some(GlyphOutline {
                    path,
                    advance: 250.0,
                }),
                _ => None,
            }
        }
    }

    #[test]
    fn test_pen_advances_by_scaled_width() {
        let shaper = TextShaper::new(10.0);
        let shaped = shaper.shape("I I", &BarFont, Point::new(5.0, 20.0));
        // 2 + 2.5 + 2
        assert!((shaped.end.x - 11.5).abs() < 1e-9);
        assert_eq!(shaped.end.y, 20.0);
        assert_eq!(shaped.path.subpaths().len(), 2);
    }

    #[test]
    fn test_glyph_is_flipped_onto_baseline() {
        let shaper = TextShaper::new(10.0);
        let shaped = shaper.shape("I", &BarFont, Point::new(5.0, 20.0));
        let b = shaped.path.bounds().unwrap();
        assert!((b.x - 5.0).abs() < 1e-9);
        assert!((b.y - 13.0).abs() < 1e-9);
        assert!((b.bottom() - 20.0).abs() < 1e-9);
        assert!((b.width - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_glyph_uses_fallback_advance() {
        let shaper = TextShaper::new(10.0);
        let shaped = shaper.shape("xI", &BarFont, Point::ZERO);
        // x: 500 units -> 5.0, then I at 5.0
        assert!((shaped.end.x - 7.0).abs() < 1e-9);
        assert_eq!(shaped.path.subpaths().len(), 1);
        let b = shaped.path.bounds().unwrap();
        assert!((b.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_letter_spacing() {
        let shaper = TextShaper::new(10.0).with_letter_spacing(1.5);
        let shaped = shaper.shape("II", &BarFont, Point::ZERO);
        assert!((shaped.end.x - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_extents() {
        let e = TextShaper::new(10.0).extents(" I", &BarFont);
        assert!((e.x_bearing - 2.5).abs() < 1e-9);
        assert!((e.y_bearing + 7.0).abs() < 1e-9);
        assert!((e.width - 1.0).abs() < 1e-9);
        assert!((e.height - 7.0).abs() < 1e-9);
        assert!((e.x_advance - 4.5).abs() < 1e-9);
        assert_eq!(e.y_advance, 0.0);
    }

    #[test]
    fn test_empty_text() {
        let e = TextShaper::new(12.0).extents("", &BarFont);
        assert_eq!(e, TextExtents::default());
    }
}

//! Text for the waah canvas
//!
//! This crate provides:
//! - Font loading and parsing (TTF/OTF via ttf-parser)
//! - System font discovery with a never-failing fallback (fontdb)
//! - Conversion of text into path geometry

pub mod font;
pub mod glyph;
pub mod registry;
pub mod shaper;

pub use font::{FontFace, FontStyle};
pub use glyph::{GlyphOutline, GlyphSource};
pub use registry::{
    fallback_chain, global_font_registry, select_fallback, FontCandidate, FontInfo,
    FontRegistry, GenericFont,
};
pub use shaper::{ShapedText, TextExtents, TextShaper};

use thiserror::Error;

/// Text errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Failed to parse font: {0}")]
    FontParse(String),
}

pub type Result<T> = std::result::Result<T, TextError>;

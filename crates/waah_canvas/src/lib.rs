//! waah
//!
//! An immediate-mode 2D vector graphics canvas: build a path, pick a paint,
//! fill or stroke, and take a snapshot of the pixels.
//!
//! # Example
//!
//! ```ignore
//! use waah_canvas::{Canvas, Pattern};
//!
//! let mut c = Canvas::new(256, 256)?;
//!
//! let mut gradient = Pattern::linear(0.0, 0.0, 0.0, 256.0);
//! gradient.color_stop(0.0, 0xff, 0xff, 0).color_stop(1.0, 0, 0, 0);
//! c.rect(0.0, 0.0, 256.0, 256.0).set_paint(gradient);
//! c.fill()?;
//!
//! c.with_rotate(0.5, |c| {
//!     c.rect(20.0, 20.0, 100.0, 100.0).color(0xff, 0, 0);
//!     c.stroke()
//! })?;
//!
//! c.snapshot()?.to_png("out.png")?;
//! ```

mod canvas;
mod config;
mod state;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use state::{DrawState, TransformScope};

pub use waah_image::{Image, ImageError};
pub use waah_paint::{
    primitives, Color, Gradient, GradientKind, GradientStop, ImagePaint, LineCap, LineJoin,
    Matrix, Paint, PaintError, Path, PathBuilder, PathCommand, Point, Rect, StrokeStyle,
};
pub use waah_text::{
    FontFace, FontInfo, FontRegistry, FontStyle, GlyphOutline, GlyphSource, TextError,
    TextExtents,
};

/// Gradients are called patterns on the canvas surface
pub use waah_paint::Gradient as Pattern;

/// Captured canvas pixels; an independent copy of the buffer
pub type Snapshot = Image;

use thiserror::Error;

/// Canvas errors
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Paint(#[from] PaintError),

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type Result<T> = std::result::Result<T, CanvasError>;

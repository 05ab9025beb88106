//! waah Paint
//!
//! Geometry and paint for the waah canvas.
//!
//! # Features
//!
//! - Paths with subpaths, relative commands and SVG endpoint arcs
//! - Shape primitives (rect, circle, ellipse, rounded rect)
//! - Affine transforms
//! - Solid, linear/radial gradient and image paint
//!
//! # Example
//!
//! ```ignore
//! use waah_paint::{Gradient, Path};
//!
//! let mut path = Path::new();
//! path.move_to(10.0, 10.0).rel_line_to(100.0, 0.0).rel_vertical_to(50.0).close();
//!
//! let mut pattern = Gradient::linear(0.0, 0.0, 0.0, 256.0);
//! pattern.color_stop(0.0, 255, 255, 255).color_stop(1.0, 0, 0, 0);
//! ```

use thiserror::Error;

pub mod color;
pub mod gradient;
pub mod paint;
pub mod path;
pub mod primitives;
pub mod transform;

pub use color::Color;
pub use gradient::{Gradient, GradientKind, GradientStop};
pub use paint::{ImagePaint, LineCap, LineJoin, Paint, PaintSource, StrokeStyle};
pub use path::{Path, PathBuilder, PathCommand, Point, Polyline, Subpath, DEFAULT_TOLERANCE};
pub use primitives::Rect;
pub use transform::Matrix;

/// Paint error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    #[error("gradient has no color stops")]
    EmptyGradient,

    #[error("paint transform is not invertible")]
    SingularTransform,
}

/// Result type for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;

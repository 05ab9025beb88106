//! waah Raster
//!
//! CPU rasterization for the waah canvas.
//!
//! # Features
//!
//! - Exact-area antialiased scanline fill with the nonzero rule
//! - Stroke expansion with butt/round/square caps and miter/round/bevel joins
//! - Source-over compositing into a straight-alpha RGBA8 pixmap, with clip masks

pub mod pixmap;
pub mod rasterizer;
pub mod stroker;

pub use pixmap::Pixmap;
pub use rasterizer::{fill_path, fill_polygons, Mask, Rasterizer};
pub use stroker::stroke_to_polygons;

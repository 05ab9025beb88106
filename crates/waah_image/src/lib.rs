//! waah Image
//!
//! Decoded image buffers for the waah canvas.
//!
//! # Features
//!
//! - Load PNG and JPEG images from file paths or memory
//! - Wrap pre-decoded RGBA buffers
//! - Encode buffers (canvas snapshots) as PNG
//!
//! # Example
//!
//! ```ignore
//! use waah_image::Image;
//!
//! let bg = Image::load("test/bg.jpg")?;
//! assert_eq!((bg.width(), bg.height()), (347, 310));
//! bg.to_png("copy.png")?;
//! ```

mod error;
mod loader;

pub use error::{ImageError, Result};
pub use loader::Image;

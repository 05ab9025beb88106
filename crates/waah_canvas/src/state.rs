//! Saved drawing state and scoped transforms

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use waah_paint::{Matrix, Paint, StrokeStyle};
use waah_raster::Mask;
use waah_text::GlyphSource;

use crate::canvas::Canvas;

/// Everything `push`/`pop` saves and restores
#[derive(Clone, Debug)]
pub struct DrawState {
    /// user space -> device space
    pub transform: Matrix,
    pub paint: Paint,
    pub stroke: StrokeStyle,
    /// Resolved lazily from the configured family on first use
    pub font: Option<Arc<dyn GlyphSource>>,
    pub font_size: f64,
    /// Device-space clip coverage; `None` is unclipped
    pub clip: Option<Arc<Mask>>,
}

/// Guard that unwinds the canvas stacks when dropped.
///
/// Created by [`Canvas::scope`] and the `with_*` methods. A transform scope
/// restores only the current matrix, so paint, line style, font and clip
/// changes made inside it persist. A [`Canvas::with_push`] scope restores
/// the whole drawing state. Either way, states pushed and not popped while
/// the guard lives are popped on drop, including during unwinding.
pub struct TransformScope<'a> {
    canvas: &'a mut Canvas,
    depth: usize,
    transform_depth: Option<usize>,
}

impl<'a> TransformScope<'a> {
    pub(crate) fn new(canvas: &'a mut Canvas, delta: Option<Matrix>) -> Self {
        let transform_depth = delta.map(|delta| {
            let depth = canvas.transform_depth();
            canvas.push_transform(&delta);
            depth
        });
        let depth = canvas.depth();
        if transform_depth.is_none() {
            canvas.push();
        }
        Self {
            canvas,
            depth,
            transform_depth,
        }
    }

    /// State stack depth the canvas returns to
    pub fn base_depth(&self) -> usize {
        self.depth
    }
}

impl Deref for TransformScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.canvas.restore_depth(self.depth);
        if let Some(depth) = self.transform_depth {
            self.canvas.restore_transform_depth(depth);
        }
    }
}

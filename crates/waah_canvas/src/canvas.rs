//! The drawing surface and its state machine

use std::sync::{Arc, PoisonError};

use waah_image::Image;
use waah_paint::{
    primitives, Color, ImagePaint, LineCap, LineJoin, Matrix, Paint, Path, Point, Rect,
    StrokeStyle,
};
use waah_raster::{fill_path, fill_polygons, stroke_to_polygons, Mask, Pixmap};
use waah_text::{global_font_registry, FontStyle, GlyphSource, TextExtents, TextShaper};

use crate::config::CanvasConfig;
use crate::state::{DrawState, TransformScope};
use crate::{CanvasError, Result, Snapshot};

/// An RGBA drawing surface with a current path and a stack of drawing
/// states.
///
/// Paths are recorded in user space and mapped through the current
/// transform when they are filled, stroked or used as a clip.
pub struct Canvas {
    pixmap: Pixmap,
    path: Path,
    state: DrawState,
    saved: Vec<DrawState>,
    transforms: Vec<Matrix>,
    tolerance: f64,
    letter_spacing: f64,
    font_family: String,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("depth", &self.depth())
            .field("transform_depth", &self.transform_depth())
            .field("transform", &self.state.transform)
            .finish()
    }
}

impl Canvas {
    /// Canvas with default configuration
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, &CanvasConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: &CanvasConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        config.validate()?;
        let background = config.background_color()?;
        tracing::debug!("Creating {}x{} canvas", width, height);
        Ok(Self {
            pixmap: Pixmap::filled(width, height, background),
            path: Path::new(),
            state: DrawState {
                transform: Matrix::identity(),
                paint: Paint::default(),
                stroke: config.stroke_style()?,
                font: None,
                font_size: config.font_size,
                clip: None,
            },
            saved: Vec::new(),
            transforms: Vec::new(),
            tolerance: config.tolerance,
            letter_spacing: config.letter_spacing,
            font_family: config.font_family.clone(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Current pixel at (x, y) as straight RGBA
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y)
    }

    /// Copy of the pixels as they are now
    pub fn snapshot(&self) -> Result<Snapshot> {
        let image = Image::from_rgba(self.pixmap.data().to_vec(), self.width(), self.height())?;
        Ok(image)
    }

    // ------------------------------------------------------------------
    // Path construction
    // ------------------------------------------------------------------

    /// The current path, for chained path commands
    pub fn path(&mut self) -> &mut Path {
        &mut self.path
    }

    pub fn current_path(&self) -> &Path {
        &self.path
    }

    pub fn new_path(&mut self) -> &mut Self {
        self.path.clear();
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.path.extend(primitives::rect(x, y, width, height));
        self
    }

    pub fn rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> &mut Self {
        self.path
            .extend(primitives::rounded_rect(x, y, width, height, radius));
        self
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        self.path.extend(primitives::circle(cx, cy, radius));
        self
    }

    /// Ellipse centred on (cx, cy) with full diameters `width` and `height`
    pub fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> &mut Self {
        self.path.extend(primitives::ellipse(cx, cy, width, height));
        self
    }

    /// Arc of increasing angle, joined to the current point by a line
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64) -> &mut Self {
        self.path.arc(cx, cy, radius, angle1, angle2);
        self
    }

    pub fn arc_negative(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    ) -> &mut Self {
        self.path.arc_negative(cx, cy, radius, angle1, angle2);
        self
    }

    /// Bounds of the current path in user space; zero when empty
    pub fn path_extents(&self) -> Rect {
        self.path.bounds().unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Append the outlines of `text` with its baseline starting at (x, y).
    /// The current point ends after the last glyph.
    pub fn text(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        let font = self.current_font();
        let shaped = self.shaper().shape(text, font.as_ref(), Point::new(x, y));
        self.path.append(&shaped.path);
        self.path.move_to(shaped.end.x, shaped.end.y);
        self
    }

    /// Metrics of `text` in the current font and size
    pub fn text_extents(&mut self, text: &str) -> TextExtents {
        let font = self.current_font();
        self.shaper().extents(text, font.as_ref())
    }

    fn shaper(&self) -> TextShaper {
        TextShaper::new(self.state.font_size).with_letter_spacing(self.letter_spacing)
    }

    /// Use `font` for subsequent text
    pub fn font(&mut self, font: Arc<dyn GlyphSource>) -> &mut Self {
        self.state.font = Some(font);
        self
    }

    /// Look up a system font; falls back instead of failing
    pub fn font_family(&mut self, family: &str, style: FontStyle) -> &mut Self {
        let face: Arc<dyn GlyphSource> = find_font(family, style);
        self.state.font = Some(face);
        self
    }

    pub fn font_size(&mut self, size: f64) -> &mut Self {
        self.state.font_size = size;
        self
    }

    fn current_font(&mut self) -> Arc<dyn GlyphSource> {
        if let Some(font) = &self.state.font {
            return Arc::clone(font);
        }
        let face: Arc<dyn GlyphSource> = find_font(&self.font_family, FontStyle::NORMAL);
        self.state.font = Some(Arc::clone(&face));
        face
    }

    // ------------------------------------------------------------------
    // Paint and line style
    // ------------------------------------------------------------------

    /// Opaque color from 0-255 channels
    pub fn color(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.set_paint(Color::from_rgba8(r, g, b, 255))
    }

    /// Color from 0-255 channels including alpha
    pub fn color_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) -> &mut Self {
        self.set_paint(Color::from_rgba8(r, g, b, a))
    }

    /// Color from 0-255 channels and a 0.0-1.0 alpha
    pub fn color_alpha(&mut self, r: u8, g: u8, b: u8, alpha: f32) -> &mut Self {
        self.set_paint(Color::from_rgb8_alpha(r, g, b, alpha))
    }

    /// Use a color, gradient or image as paint.
    ///
    /// Gradients are positioned in the user space current at fill time.
    pub fn set_paint(&mut self, paint: impl Into<Paint>) -> &mut Self {
        self.state.paint = paint.into();
        self
    }

    /// Use `image` as paint with its top-left corner at (x, y) in the
    /// current user space. Later transform changes do not move it.
    pub fn image(&mut self, image: &Arc<Image>, x: f64, y: f64) -> &mut Self {
        let transform = self.state.transform.multiply(&Matrix::translate(x, y));
        self.set_paint(ImagePaint::new(Arc::clone(image), transform))
    }

    pub fn paint(&self) -> &Paint {
        &self.state.paint
    }

    pub fn line_width(&mut self, width: f64) -> &mut Self {
        self.state.stroke.width = width;
        self
    }

    pub fn line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.state.stroke.cap = cap;
        self
    }

    pub fn line_join(&mut self, join: LineJoin) -> &mut Self {
        self.state.stroke.join = join;
        self
    }

    pub fn miter_limit(&mut self, limit: f64) -> &mut Self {
        self.state.stroke.miter_limit = limit;
        self
    }

    pub fn stroke_style(&self) -> &StrokeStyle {
        &self.state.stroke
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Fill the current path and clear it. The path is cleared even when
    /// the paint cannot be used.
    pub fn fill(&mut self) -> Result<()> {
        let path = std::mem::take(&mut self.path);
        self.render_fill(&path)
    }

    pub fn fill_preserve(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.render_fill(&path)
    }

    /// Stroke the current path and clear it
    pub fn stroke(&mut self) -> Result<()> {
        let path = std::mem::take(&mut self.path);
        self.render_stroke(&path)
    }

    pub fn stroke_preserve(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.render_stroke(&path)
    }

    /// Paint every pixel inside the clip with the current paint
    pub fn clear(&mut self) -> Result<()> {
        let state = &self.state;
        let source = state.paint.resolve(&state.transform).map_err(|e| {
            tracing::warn!("clear skipped: {}", e);
            e
        })?;
        self.pixmap.paint(state.clip.as_deref(), &source);
        Ok(())
    }

    fn render_fill(&mut self, path: &Path) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let state = &self.state;
        let source = state.paint.resolve(&state.transform).map_err(|e| {
            tracing::warn!("fill skipped: {}", e);
            e
        })?;
        let device = path.transformed(&state.transform);
        let mask = fill_path(
            &device,
            self.pixmap.width() as usize,
            self.pixmap.height() as usize,
            self.tolerance,
        );
        self.pixmap.composite(&mask, state.clip.as_deref(), &source);
        Ok(())
    }

    fn render_stroke(&mut self, path: &Path) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let state = &self.state;
        let source = state.paint.resolve(&state.transform).map_err(|e| {
            tracing::warn!("stroke skipped: {}", e);
            e
        })?;
        let scale = state.transform.scale_factor();
        if scale <= 0.0 || !scale.is_finite() {
            tracing::trace!("stroke under a singular transform draws nothing");
            return Ok(());
        }

        let polygons: Vec<Vec<Point>> =
            stroke_to_polygons(path, &state.stroke, self.tolerance / scale)
                .into_iter()
                .map(|polygon| {
                    polygon
                        .into_iter()
                        .map(|p| state.transform.transform_point(p))
                        .collect()
                })
                .collect();
        let mask = fill_polygons(
            &polygons,
            self.pixmap.width() as usize,
            self.pixmap.height() as usize,
        );
        self.pixmap.composite(&mask, state.clip.as_deref(), &source);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clipping
    // ------------------------------------------------------------------

    /// Intersect the clip with the current path and clear the path
    pub fn clip(&mut self) -> &mut Self {
        let path = std::mem::take(&mut self.path);
        self.clip_path(&path);
        self
    }

    pub fn clip_preserve(&mut self) -> &mut Self {
        let path = self.path.clone();
        self.clip_path(&path);
        self
    }

    pub fn reset_clip(&mut self) -> &mut Self {
        self.state.clip = None;
        self
    }

    fn clip_path(&mut self, path: &Path) {
        let device = path.transformed(&self.state.transform);
        let mut mask: Mask = fill_path(
            &device,
            self.pixmap.width() as usize,
            self.pixmap.height() as usize,
            self.tolerance,
        );
        if let Some(existing) = &self.state.clip {
            mask.intersect(existing);
        }
        self.state.clip = Some(Arc::new(mask));
    }

    // ------------------------------------------------------------------
    // State stack and transforms
    // ------------------------------------------------------------------

    /// Number of saved drawing states
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Number of matrices on the transform stack
    pub fn transform_depth(&self) -> usize {
        self.transforms.len()
    }

    pub fn current_transform(&self) -> Matrix {
        self.state.transform
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Save the whole drawing state, current matrix included
    pub fn push(&mut self) -> &mut Self {
        self.saved.push(self.state.clone());
        self
    }

    /// Restore the last saved drawing state; a no-op at the base level
    pub fn pop(&mut self) -> &mut Self {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("pop without matching push ignored"),
        }
        self
    }

    /// Save the current matrix, then apply `delta` in the current user space.
    ///
    /// Only the matrix is saved; paint and style changes survive
    /// `pop_transform`.
    pub fn push_transform(&mut self, delta: &Matrix) -> &mut Self {
        self.transforms.push(self.state.transform);
        self.transform(delta)
    }

    /// Restore the matrix saved by the last `push_transform`
    pub fn pop_transform(&mut self) -> &mut Self {
        match self.transforms.pop() {
            Some(matrix) => self.state.transform = matrix,
            None => tracing::warn!("pop_transform without matching push_transform ignored"),
        }
        self
    }

    pub(crate) fn restore_depth(&mut self, depth: usize) {
        if self.saved.len() < depth {
            tracing::warn!(
                "state stack at depth {} is below scope depth {}",
                self.saved.len(),
                depth
            );
        }
        while self.saved.len() > depth {
            self.pop();
        }
    }

    pub(crate) fn restore_transform_depth(&mut self, depth: usize) {
        if self.transforms.len() <= depth {
            tracing::warn!(
                "transform stack at depth {} is below scope depth {}",
                self.transforms.len(),
                depth + 1
            );
            return;
        }
        self.state.transform = self.transforms[depth];
        self.transforms.truncate(depth);
    }

    /// Apply `delta` in the current user space
    pub fn transform(&mut self, delta: &Matrix) -> &mut Self {
        self.state.transform = self.state.transform.multiply(delta);
        if self.state.transform.invert().is_none() {
            tracing::warn!("current transform is singular: {:?}", self.state.transform);
        }
        self
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.transform(&Matrix::translate(x, y))
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.transform(&Matrix::scale(sx, sy))
    }

    /// Rotate user space by `angle` radians about its origin
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.transform(&Matrix::rotate(angle))
    }

    /// Apply `delta` until the returned guard is dropped
    pub fn scope(&mut self, delta: &Matrix) -> TransformScope<'_> {
        TransformScope::new(self, Some(*delta))
    }

    /// Run `f` with the whole drawing state saved, restoring it however
    /// `f` exits
    pub fn with_push<R>(&mut self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let mut scope = TransformScope::new(self, None);
        f(&mut *scope)
    }

    /// Run `f` with `delta` applied, restoring the matrix however `f` exits
    pub fn with_transform<R>(&mut self, delta: &Matrix, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let mut scope = self.scope(delta);
        f(&mut *scope)
    }

    pub fn with_translate<R>(&mut self, x: f64, y: f64, f: impl FnOnce(&mut Canvas) -> R) -> R {
        self.with_transform(&Matrix::translate(x, y), f)
    }

    pub fn with_scale<R>(&mut self, sx: f64, sy: f64, f: impl FnOnce(&mut Canvas) -> R) -> R {
        self.with_transform(&Matrix::scale(sx, sy), f)
    }

    pub fn with_rotate<R>(&mut self, angle: f64, f: impl FnOnce(&mut Canvas) -> R) -> R {
        self.with_transform(&Matrix::rotate(angle), f)
    }
}

fn find_font(family: &str, style: FontStyle) -> Arc<waah_text::FontFace> {
    let registry = global_font_registry();
    let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
    registry.find(family, style)
}

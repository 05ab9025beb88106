//! Paint sources and stroke style

use std::str::FromStr;
use std::sync::Arc;

use waah_image::Image;

use crate::color::Color;
use crate::gradient::Gradient;
use crate::path::Point;
use crate::transform::Matrix;
use crate::{PaintError, Result};

/// Paint for fills and strokes
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
    Image(ImagePaint),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

impl From<ImagePaint> for Paint {
    fn from(image: ImagePaint) -> Self {
        Paint::Image(image)
    }
}

/// An image used as paint.
///
/// `transform` maps image pixel coordinates to device space. It is fixed
/// when the paint is created, so later transform changes do not move the
/// image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePaint {
    pub image: Arc<Image>,
    pub transform: Matrix,
}

impl ImagePaint {
    pub fn new(image: Arc<Image>, transform: Matrix) -> Self {
        Self { image, transform }
    }
}

impl Paint {
    /// Bind the paint to the transform current at fill time.
    ///
    /// Fails for a gradient without stops and for paint whose coordinate
    /// space cannot be inverted.
    pub fn resolve(&self, ctm: &Matrix) -> Result<PaintSource<'_>> {
        match self {
            Paint::Solid(color) => Ok(PaintSource::Solid(*color)),
            Paint::Gradient(gradient) => {
                if gradient.is_empty() {
                    return Err(PaintError::EmptyGradient);
                }
                let inverse = ctm.invert().ok_or(PaintError::SingularTransform)?;
                Ok(PaintSource::Gradient { gradient, inverse })
            }
            Paint::Image(paint) => {
                let inverse = paint
                    .transform
                    .invert()
                    .ok_or(PaintError::SingularTransform)?;
                Ok(PaintSource::Image {
                    image: &paint.image,
                    inverse,
                })
            }
        }
    }
}

/// Paint ready to be sampled in device space
#[derive(Clone, Copy, Debug)]
pub enum PaintSource<'a> {
    Solid(Color),
    Gradient {
        gradient: &'a Gradient,
        /// device -> gradient user space
        inverse: Matrix,
    },
    Image {
        image: &'a Image,
        /// device -> image pixel space
        inverse: Matrix,
    },
}

impl PaintSource<'_> {
    /// Color at device point (x, y). Uncovered points are transparent.
    pub fn sample(&self, x: f64, y: f64) -> Color {
        match self {
            PaintSource::Solid(color) => *color,
            PaintSource::Gradient { gradient, inverse } => gradient
                .color_for_point(inverse.transform_point(Point::new(x, y)))
                .unwrap_or(Color::TRANSPARENT),
            PaintSource::Image { image, inverse } => {
                sample_bilinear(image, inverse.transform_point(Point::new(x, y)))
            }
        }
    }

    /// The color when it is the same everywhere
    pub fn uniform_color(&self) -> Option<Color> {
        match self {
            PaintSource::Solid(color) => Some(*color),
            _ => None,
        }
    }
}

/// Premultiplied texel as floats, transparent outside the image
fn texel(image: &Image, x: i64, y: i64) -> [f32; 4] {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return [0.0; 4];
    }
    let i = (y as usize * image.width() as usize + x as usize) * 4;
    let px = &image.pixels()[i..i + 4];
    let a = px[3] as f32 / 255.0;
    [
        px[0] as f32 / 255.0 * a,
        px[1] as f32 / 255.0 * a,
        px[2] as f32 / 255.0 * a,
        a,
    ]
}

/// Bilinear sample with texel centres at half-integer coordinates
fn sample_bilinear(image: &Image, p: Point) -> Color {
    if !p.x.is_finite() || !p.y.is_finite() {
        return Color::TRANSPARENT;
    }
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = (fx - x0) as f32;
    let ty = (fy - y0) as f32;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let t00 = texel(image, x0, y0);
    let t10 = texel(image, x0 + 1, y0);
    let t01 = texel(image, x0, y0 + 1);
    let t11 = texel(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f32; 4];
    for (i, out) in acc.iter_mut().enumerate() {
        let top = t00[i] + (t10[i] - t00[i]) * tx;
        let bottom = t01[i] + (t11[i] - t01[i]) * tx;
        *out = top + (bottom - top) * ty;
    }

    let a = acc[3];
    if a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }
    Color::new(acc[0] / a, acc[1] / a, acc[2] / a, a)
}

/// Line cap style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl FromStr for LineCap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            other => Err(format!("unknown line cap '{other}'")),
        }
    }
}

/// Line join style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl FromStr for LineJoin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            other => Err(format!("unknown line join '{other}'")),
        }
    }
}

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
            miter_limit: 10.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Arc<Image> {
        // 2x2: red, green / blue, transparent
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 0, 0, 0, 0,
        ];
        Arc::new(Image::from_rgba(data, 2, 2).unwrap())
    }

    #[test]
    fn test_default_paint_is_black() {
        assert_eq!(Paint::default(), Paint::Solid(Color::BLACK));
    }

    #[test]
    fn test_empty_gradient_fails_at_resolve() {
        let paint = Paint::from(Gradient::linear(0.0, 0.0, 10.0, 0.0));
        assert!(matches!(
            paint.resolve(&Matrix::identity()),
            Err(PaintError::EmptyGradient)
        ));
    }

    #[test]
    fn test_gradient_uses_fill_time_transform() {
        let paint = Paint::from(Gradient::linear_simple(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Color::BLACK,
            Color::WHITE,
        ));
        // User x = 5 sits at device x = 105 under the translation.
        let source = paint.resolve(&Matrix::translate(100.0, 0.0)).unwrap();
        assert_eq!(source.sample(105.0, 0.0).to_rgba8(), [128, 128, 128, 255]);
        assert_eq!(source.sample(5.0, 0.0), Color::BLACK);
    }

    #[test]
    fn test_singular_transform() {
        let paint = Paint::from(Gradient::linear(0.0, 0.0, 1.0, 0.0).with_stop(0.0, Color::RED));
        assert!(matches!(
            paint.resolve(&Matrix::scale(0.0, 0.0)),
            Err(PaintError::SingularTransform)
        ));
    }

    #[test]
    fn test_image_texel_centres() {
        let paint = Paint::from(ImagePaint::new(checker(), Matrix::identity()));
        let source = paint.resolve(&Matrix::identity()).unwrap();
        assert_eq!(source.sample(0.5, 0.5).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(source.sample(1.5, 0.5).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(source.sample(0.5, 1.5).to_rgba8(), [0, 0, 255, 255]);
        assert!(source.sample(1.5, 1.5).is_transparent());
    }

    #[test]
    fn test_image_out_of_bounds_is_transparent() {
        let paint = Paint::from(ImagePaint::new(checker(), Matrix::translate(10.0, 10.0)));
        let source = paint.resolve(&Matrix::identity()).unwrap();
        assert!(source.sample(2.0, 2.0).is_transparent());
        assert_eq!(source.sample(10.5, 10.5).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_bilinear_does_not_bleed_transparent_color() {
        // Halfway between opaque red and transparent black stays red, at half alpha.
        let data = vec![255, 0, 0, 255, 0, 0, 0, 0];
        let image = Arc::new(Image::from_rgba(data, 2, 1).unwrap());
        let paint = Paint::from(ImagePaint::new(image, Matrix::identity()));
        let c = paint.resolve(&Matrix::identity()).unwrap().sample(1.0, 0.5);
        assert_eq!(c.to_rgba8(), [255, 0, 0, 128]);
    }

    #[test]
    fn test_line_style_parsing() {
        assert_eq!("Round".parse::<LineCap>(), Ok(LineCap::Round));
        assert_eq!("bevel".parse::<LineJoin>(), Ok(LineJoin::Bevel));
        assert!("pointy".parse::<LineJoin>().is_err());
        let style = StrokeStyle::default();
        assert_eq!(style.width, 2.0);
        assert_eq!(style.miter_limit, 10.0);
    }
}

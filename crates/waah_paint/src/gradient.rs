//! Gradient fills

use crate::color::Color;
use crate::path::Point;

const EPSILON: f64 = 1e-12;

/// A gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32, // 0.0 to 1.0
    pub color: Color,
}

/// Gradient geometry, in the user space the gradient is filled in
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientKind {
    Linear {
        start: Point,
        end: Point,
    },
    /// Two-circle gradient: t = 0 on the start circle, t = 1 on the end circle
    Radial {
        center0: Point,
        radius0: f64,
        center1: Point,
        radius1: f64,
    },
}

/// A linear or radial gradient with stops sorted by offset.
///
/// Stops may be added at any time. An empty gradient is representable and
/// only rejected when it is painted.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(kind: GradientKind) -> Self {
        Self {
            kind,
            stops: Vec::new(),
        }
    }

    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(GradientKind::Linear {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
        })
    }

    pub fn radial(cx0: f64, cy0: f64, r0: f64, cx1: f64, cy1: f64, r1: f64) -> Self {
        Self::new(GradientKind::Radial {
            center0: Point::new(cx0, cy0),
            radius0: r0.abs(),
            center1: Point::new(cx1, cy1),
            radius1: r1.abs(),
        })
    }

    /// Create a simple linear gradient between two colors
    pub fn linear_simple(start: Point, end: Point, from: Color, to: Color) -> Self {
        Self::linear(start.x, start.y, end.x, end.y)
            .with_stop(0.0, from)
            .with_stop(1.0, to)
    }

    pub fn kind(&self) -> &GradientKind {
        &self.kind
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Insert a stop, clamping its offset to [0, 1]. A stop with the same
    /// offset as existing ones goes after them, so repeated offsets make a
    /// hard edge in insertion order.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) -> &mut Self {
        let offset = if offset.is_nan() { 0.0 } else { offset.clamp(0.0, 1.0) };
        let index = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        self
    }

    /// Add a stop from 0-255 channels
    pub fn color_stop(&mut self, offset: f32, r: u8, g: u8, b: u8) -> &mut Self {
        self.add_color_stop(offset, Color::from_rgba8(r, g, b, 255))
    }

    /// Add a stop from 0-255 channels and a 0.0-1.0 alpha
    pub fn color_stop_alpha(&mut self, offset: f32, r: u8, g: u8, b: u8, alpha: f32) -> &mut Self {
        self.add_color_stop(offset, Color::from_rgb8_alpha(r, g, b, alpha))
    }

    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    /// Color at gradient parameter `t`, clamped to the outermost stops.
    /// `None` when there are no stops.
    pub fn color_at(&self, t: f32) -> Option<Color> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        let t = if t.is_nan() { 0.0 } else { t };
        if t <= first.offset {
            return Some(first.color);
        }
        if t >= last.offset {
            return Some(last.color);
        }
        let index = self.stops.partition_point(|s| s.offset <= t);
        let (lo, hi) = (&self.stops[index - 1], &self.stops[index]);
        let span = hi.offset - lo.offset;
        if span <= f32::EPSILON {
            return Some(hi.color);
        }
        Some(lo.color.lerp(hi.color, (t - lo.offset) / span))
    }

    /// Gradient parameter for a user-space point, clamped to [0, 1].
    ///
    /// `None` when the point is not covered: a linear gradient whose
    /// endpoints coincide, or a radial sample with no non-negative radius
    /// solution.
    pub fn parameter_at(&self, p: Point) -> Option<f32> {
        let t = match self.kind {
            GradientKind::Linear { start, end } => {
                let d = end - start;
                let len2 = d.dot(d);
                if len2 < EPSILON {
                    return None;
                }
                (p - start).dot(d) / len2
            }
            GradientKind::Radial {
                center0,
                radius0,
                center1,
                radius1,
            } => radial_parameter(p, center0, radius0, center1, radius1)?,
        };
        t.is_finite().then(|| t.clamp(0.0, 1.0) as f32)
    }

    /// Color for a user-space point, `None` when the point is not covered
    /// or there are no stops.
    pub fn color_for_point(&self, p: Point) -> Option<Color> {
        self.color_at(self.parameter_at(p)?)
    }
}

/// Largest t with |p - c(t)| = r(t) and r(t) >= 0, where c and r
/// interpolate linearly between the two circles.
fn radial_parameter(p: Point, c0: Point, r0: f64, c1: Point, r1: f64) -> Option<f64> {
    let cd = c1 - c0;
    let pd = p - c0;
    let dr = r1 - r0;
    let a = cd.dot(cd) - dr * dr;
    let b = pd.dot(cd) + r0 * dr;
    let c = pd.dot(pd) - r0 * r0;
    let valid = |t: f64| r0 + t * dr >= 0.0;

    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return None;
        }
        let t = c / (2.0 * b);
        return valid(t).then_some(t);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let (t1, t2) = ((b + s) / a, (b - s) / a);
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
    if valid(hi) {
        Some(hi)
    } else if valid(lo) {
        Some(lo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-4
            && (a.g - b.g).abs() < 1e-4
            && (a.b - b.b).abs() < 1e-4
            && (a.a - b.a).abs() < 1e-4
    }

    #[test]
    fn test_stops_stay_sorted() {
        let mut g = Gradient::linear(0.0, 0.0, 1.0, 0.0);
        g.add_color_stop(0.8, Color::RED)
            .add_color_stop(0.2, Color::GREEN)
            .add_color_stop(0.5, Color::BLUE);
        let offsets: Vec<f32> = g.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn test_offsets_are_clamped() {
        let mut g = Gradient::linear(0.0, 0.0, 1.0, 0.0);
        g.add_color_stop(-3.0, Color::RED).add_color_stop(7.0, Color::BLUE);
        assert_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.stops()[1].offset, 1.0);
    }

    #[test]
    fn test_midpoint_is_mean() {
        let g = Gradient::linear(0.0, 0.0, 100.0, 0.0)
            .with_stop(0.0, Color::rgb(1.0, 0.0, 0.2))
            .with_stop(1.0, Color::rgb(0.0, 1.0, 0.6));
        let c = g.color_for_point(Point::new(50.0, 12.0)).unwrap();
        assert!(approx(c, Color::rgb(0.5, 0.5, 0.4)), "{c:?}");
    }

    #[test]
    fn test_edges_extend() {
        let g = Gradient::linear(0.0, 0.0, 10.0, 0.0)
            .with_stop(0.25, Color::RED)
            .with_stop(0.75, Color::BLUE);
        assert_eq!(g.color_for_point(Point::new(-50.0, 0.0)), Some(Color::RED));
        assert_eq!(g.color_for_point(Point::new(1.0, 0.0)), Some(Color::RED));
        assert_eq!(g.color_for_point(Point::new(60.0, 0.0)), Some(Color::BLUE));
    }

    #[test]
    fn test_hard_edge_on_repeated_offset() {
        let g = Gradient::linear(0.0, 0.0, 1.0, 0.0)
            .with_stop(0.0, Color::RED)
            .with_stop(0.5, Color::RED)
            .with_stop(0.5, Color::BLUE)
            .with_stop(1.0, Color::BLUE);
        assert_eq!(g.color_at(0.49), Some(Color::RED));
        assert_eq!(g.color_at(0.5), Some(Color::BLUE));
    }

    #[test]
    fn test_empty_gradient_has_no_color() {
        let g = Gradient::linear(0.0, 0.0, 1.0, 0.0);
        assert!(g.is_empty());
        assert_eq!(g.color_at(0.5), None);
    }

    #[test]
    fn test_degenerate_linear() {
        let g = Gradient::linear(5.0, 5.0, 5.0, 5.0).with_stop(0.0, Color::RED);
        assert_eq!(g.parameter_at(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_concentric_radial() {
        let g = Gradient::radial(50.0, 50.0, 0.0, 50.0, 50.0, 40.0)
            .with_stop(0.0, Color::WHITE)
            .with_stop(1.0, Color::BLACK);
        let at = |x: f64, y: f64| g.parameter_at(Point::new(x, y)).unwrap();
        assert!(at(50.0, 50.0).abs() < 1e-6);
        assert!((at(70.0, 50.0) - 0.5).abs() < 1e-6);
        assert!((at(50.0, 90.0) - 1.0).abs() < 1e-6);
        assert_eq!(g.color_for_point(Point::new(90.0, 50.0)), Some(Color::BLACK));
        assert_eq!(g.color_for_point(Point::new(0.0, 0.0)), Some(Color::BLACK));
    }

    #[test]
    fn test_focal_radial() {
        // Start circle is a point at (10, 0); end circle has radius 100 at the origin.
        let g = Gradient::radial(10.0, 0.0, 0.0, 0.0, 0.0, 100.0);
        assert!(g.parameter_at(Point::new(10.0, 0.0)).unwrap().abs() < 1e-6);
        let t = g.parameter_at(Point::new(100.0, 0.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        let t = g.parameter_at(Point::new(-100.0, 0.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_stop_channels() {
        let mut g = Gradient::linear(0.0, 0.0, 1.0, 0.0);
        g.color_stop(0.0, 255, 0, 0).color_stop_alpha(1.0, 0, 0, 255, 0.5);
        assert_eq!(g.stops()[0].color, Color::RED);
        assert_eq!(g.stops()[1].color.a, 0.5);
    }
}

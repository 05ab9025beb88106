//! Geometric primitives
//!
//! Shapes are pure functions from parameters to command sequences. Each
//! sequence starts with a `MoveTo`; closed shapes end with `Close`.
//! Degenerate input is normalised instead of rejected: negative sizes are
//! flipped, out-of-range radii are clamped, and zero-sized circles produce
//! no commands at all.

use crate::path::{PathCommand, Point};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Control point distance for a quarter-circle cubic, relative to the radius.
///
/// The radial error of the resulting circle is below 0.03% of the radius.
pub const KAPPA: f64 = 0.552_284_749_830_793_4;

const EPSILON: f64 = 1e-12;

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_points(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle containing `self` and `point`
    pub fn include(&self, point: Point) -> Self {
        Self::from_points(
            Point::new(self.x.min(point.x), self.y.min(point.y)),
            Point::new(self.right().max(point.x), self.bottom().max(point.y)),
        )
    }
}

/// Closed rectangle: move, three lines, close
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo(Point::new(x, y)),
        PathCommand::LineTo(Point::new(x + width, y)),
        PathCommand::LineTo(Point::new(x + width, y + height)),
        PathCommand::LineTo(Point::new(x, y + height)),
        PathCommand::Close,
    ]
}

/// Closed circle made of four cubic arcs
pub fn circle(cx: f64, cy: f64, radius: f64) -> Vec<PathCommand> {
    let r = radius.abs();
    ellipse_commands(Point::new(cx, cy), r, r)
}

/// Closed ellipse centred on (cx, cy); `width` and `height` are full diameters
pub fn ellipse(cx: f64, cy: f64, width: f64, height: f64) -> Vec<PathCommand> {
    ellipse_commands(Point::new(cx, cy), width.abs() / 2.0, height.abs() / 2.0)
}

fn ellipse_commands(center: Point, rx: f64, ry: f64) -> Vec<PathCommand> {
    if rx < EPSILON || ry < EPSILON || !rx.is_finite() || !ry.is_finite() {
        return Vec::new();
    }
    let (cx, cy) = (center.x, center.y);
    let (kx, ky) = (KAPPA * rx, KAPPA * ry);
    vec![
        PathCommand::MoveTo(Point::new(cx + rx, cy)),
        PathCommand::CubicTo {
            control1: Point::new(cx + rx, cy + ky),
            control2: Point::new(cx + kx, cy + ry),
            end: Point::new(cx, cy + ry),
        },
        PathCommand::CubicTo {
            control1: Point::new(cx - kx, cy + ry),
            control2: Point::new(cx - rx, cy + ky),
            end: Point::new(cx - rx, cy),
        },
        PathCommand::CubicTo {
            control1: Point::new(cx - rx, cy - ky),
            control2: Point::new(cx - kx, cy - ry),
            end: Point::new(cx, cy - ry),
        },
        PathCommand::CubicTo {
            control1: Point::new(cx + kx, cy - ry),
            control2: Point::new(cx + rx, cy - ky),
            end: Point::new(cx + rx, cy),
        },
        PathCommand::Close,
    ]
}

/// Closed rectangle with circular corners of radius `radius`
pub fn rounded_rect(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Vec<PathCommand> {
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
    let r = radius.abs().min(width / 2.0).min(height / 2.0);
    if r < EPSILON {
        return rect(x, y, width, height);
    }

    let corners = [
        (Point::new(x + width - r, y + r), -FRAC_PI_2, 0.0),
        (Point::new(x + width - r, y + height - r), 0.0, FRAC_PI_2),
        (Point::new(x + r, y + height - r), FRAC_PI_2, PI),
        (Point::new(x + r, y + r), PI, 3.0 * FRAC_PI_2),
    ];

    let mut commands = Vec::with_capacity(14);
    for (center, start, end) in corners {
        for command in arc_segments(center, r, start, end, false) {
            match command {
                PathCommand::MoveTo(p) if !commands.is_empty() => {
                    commands.push(PathCommand::LineTo(p))
                }
                other => commands.push(other),
            }
        }
    }
    commands.push(PathCommand::Close);
    commands
}

/// Circular arc around `center` from `angle1` to `angle2` (radians).
///
/// Positive arcs run in the direction of increasing angle, negative arcs in
/// the direction of decreasing angle; the end angle is wrapped by full turns
/// until it lies on the requested side of the start angle. The first command
/// is a `MoveTo` to the arc's start point. A non-positive radius yields only
/// a `MoveTo` to the centre.
pub fn arc_segments(
    center: Point,
    radius: f64,
    angle1: f64,
    angle2: f64,
    negative: bool,
) -> Vec<PathCommand> {
    if !(radius > EPSILON) || !radius.is_finite() || !angle1.is_finite() || !angle2.is_finite() {
        return vec![PathCommand::MoveTo(center)];
    }

    let mut end = angle2;
    if negative && end > angle1 {
        end -= TAU * ((end - angle1) / TAU).ceil();
    } else if !negative && end < angle1 {
        end += TAU * ((angle1 - end) / TAU).ceil();
    }

    let (sin, cos) = angle1.sin_cos();
    let mut commands = vec![PathCommand::MoveTo(Point::new(
        center.x + radius * cos,
        center.y + radius * sin,
    ))];
    commands.extend(ellipse_arc_cubics(center, radius, radius, 0.0, angle1, end - angle1));
    commands
}

/// Resolve an SVG endpoint arc into cubic segments.
///
/// Radii are made positive and scaled up when too small to span the two
/// endpoints. A zero radius degrades to a straight line; coincident
/// endpoints produce no segments.
pub fn svg_arc_to_cubics(
    from: Point,
    rx: f64,
    ry: f64,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<PathCommand> {
    if from == to {
        return Vec::new();
    }
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if rx < EPSILON || ry < EPSILON || !rx.is_finite() || !ry.is_finite() {
        return vec![PathCommand::LineTo(to)];
    }

    let (sin_phi, cos_phi) = x_rotation.sin_cos();
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        tracing::trace!("arc radii ({}, {}) too small, scaling by {}", rx, ry, s);
        rx *= s;
        ry *= s;
    }

    let (rx2, ry2) = (rx * rx, ry * ry);
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let center = Point::new(
        cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0,
        sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0,
    );

    let (ux, uy) = ((x1p - cxp) / rx, (y1p - cyp) / ry);
    let (vx, vy) = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let start = uy.atan2(ux);
    let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let mut commands = ellipse_arc_cubics(center, rx, ry, x_rotation, start, delta);
    // Pin the final point to the requested endpoint.
    if let Some(PathCommand::CubicTo { end, .. }) = commands.last_mut() {
        *end = to;
    }
    commands
}

/// Cubic approximation of an elliptical arc, one segment per quarter turn
/// or less.
fn ellipse_arc_cubics(
    center: Point,
    rx: f64,
    ry: f64,
    rotation: f64,
    start: f64,
    sweep: f64,
) -> Vec<PathCommand> {
    if sweep.abs() < EPSILON {
        return Vec::new();
    }
    let pieces = ((sweep.abs() / FRAC_PI_2) - 1e-9).ceil().max(1.0) as usize;
    let delta = sweep / pieces as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();
    let (sin_rot, cos_rot) = rotation.sin_cos();
    let map = |ux: f64, uy: f64| {
        let (x, y) = (rx * ux, ry * uy);
        Point::new(
            center.x + cos_rot * x - sin_rot * y,
            center.y + sin_rot * x + cos_rot * y,
        )
    };

    let mut commands = Vec::with_capacity(pieces);
    let mut a = start;
    for _ in 0..pieces {
        let b = a + delta;
        let (sa, ca) = a.sin_cos();
        let (sb, cb) = b.sin_cos();
        commands.push(PathCommand::CubicTo {
            control1: map(ca - k * sa, sa + k * ca),
            control2: map(cb + k * sb, sb - k * cb),
            end: map(cb, sb),
        });
        a = b;
    }
    commands
}

//! Stroke expansion
//!
//! A stroke is the union of a quad per segment, a wedge per join and a
//! shape per cap. Each piece is emitted as its own polygon with positive
//! orientation, so filling them together with the nonzero rule yields the
//! outline without computing offsets or intersections.

use std::f64::consts::PI;

use waah_paint::{LineCap, LineJoin, Path, Point, StrokeStyle};

const MIN_ROUND_SEGMENTS: usize = 8;
const MAX_ROUND_SEGMENTS: usize = 256;

/// Expand `path` into fill polygons in the path's own coordinate space.
///
/// `tolerance` bounds both curve flattening and round join/cap
/// approximation. A non-positive width produces nothing.
pub fn stroke_to_polygons(path: &Path, style: &StrokeStyle, tolerance: f64) -> Vec<Vec<Point>> {
    let half = style.width.abs() / 2.0;
    if !(half > 0.0) || !half.is_finite() {
        return Vec::new();
    }
    let mut stroker = Stroker {
        style,
        half,
        round_segments: round_segments(half, tolerance),
        polygons: Vec::new(),
    };

    for polyline in path.flatten(tolerance) {
        let mut points = polyline.points;
        if polyline.closed && points.len() > 2 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 2 {
            continue;
        }
        stroker.stroke_polyline(&points, polyline.closed);
    }

    tracing::trace!("stroke expanded into {} polygons", stroker.polygons.len());
    stroker.polygons
}

/// Segments for a full circle of radius `r` within `tolerance`
fn round_segments(r: f64, tolerance: f64) -> usize {
    let tolerance = tolerance.max(1e-4);
    if tolerance >= r {
        return MIN_ROUND_SEGMENTS;
    }
    let step = 2.0 * (1.0 - tolerance / r).acos();
    ((2.0 * PI / step).ceil() as usize).clamp(MIN_ROUND_SEGMENTS, MAX_ROUND_SEGMENTS)
}

struct Stroker<'a> {
    style: &'a StrokeStyle,
    half: f64,
    round_segments: usize,
    polygons: Vec<Vec<Point>>,
}

impl Stroker<'_> {
    fn stroke_polyline(&mut self, points: &[Point], closed: bool) {
        let n = points.len();
        let segment_count = if closed { n } else { n - 1 };
        let mut directions = Vec::with_capacity(segment_count);

        for i in 0..segment_count {
            let a = points[i];
            let b = points[(i + 1) % n];
            let Some(dir) = (b - a).normalized() else {
                continue;
            };
            let offset = dir.perp() * self.half;
            self.push(vec![a + offset, b + offset, b - offset, a - offset]);
            directions.push((a, b, dir));
        }

        if directions.is_empty() {
            return;
        }

        for pair in directions.windows(2) {
            self.join(pair[0].1, pair[0].2, pair[1].2);
        }
        if closed {
            if let (Some(last), Some(first)) = (directions.last(), directions.first()) {
                self.join(first.0, last.2, first.2);
            }
        } else if let (Some(first), Some(last)) = (directions.first(), directions.last()) {
            self.cap(first.0, -first.2);
            self.cap(last.1, last.2);
        }
    }

    /// Join at `p` between incoming direction `d0` and outgoing `d1`
    fn join(&mut self, p: Point, d0: Point, d1: Point) {
        let cross = d0.cross(d1);
        let dot = d0.dot(d1);
        if cross.abs() < 1e-9 && dot > 0.0 {
            return;
        }

        if self.style.join == LineJoin::Round {
            self.circle(p);
            return;
        }

        // The outer side of the turn is opposite to the direction of turning.
        let side = if cross > 0.0 { -1.0 } else { 1.0 };
        let n0 = d0.perp() * (self.half * side);
        let n1 = d1.perp() * (self.half * side);

        match self.style.join {
            LineJoin::Miter if miter_within_limit(dot, self.style.miter_limit) => {
                let tip = p + (n0 + n1) * (1.0 / (1.0 + dot));
                self.push(vec![p, p + n0, tip, p + n1]);
            }
            _ => self.push(vec![p, p + n0, p + n1]),
        }
    }

    /// Cap at endpoint `p`, with `dir` pointing away from the line
    fn cap(&mut self, p: Point, dir: Point) {
        match self.style.cap {
            LineCap::Butt => {}
            LineCap::Round => self.circle(p),
            LineCap::Square => {
                let n = dir.perp() * self.half;
                let ext = dir * self.half;
                self.push(vec![p + n, p + n + ext, p - n + ext, p - n]);
            }
        }
    }

    fn circle(&mut self, center: Point) {
        let steps = self.round_segments;
        let points = (0..steps)
            .map(|i| {
                let (sin, cos) = (2.0 * PI * i as f64 / steps as f64).sin_cos();
                Point::new(center.x + self.half * cos, center.y + self.half * sin)
            })
            .collect();
        self.push(points);
    }

    /// Store a polygon with positive signed area; degenerate ones are dropped.
    fn push(&mut self, mut polygon: Vec<Point>) {
        let area = signed_area(&polygon);
        if area.abs() < 1e-12 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            polygon.reverse();
        }
        self.polygons.push(polygon);
    }
}

/// The miter length over the line width is 1 / sin(phi / 2), where phi is
/// the angle between the segments; `dot` is the cosine of the turn angle.
fn miter_within_limit(dot: f64, limit: f64) -> bool {
    let denom = 1.0 + dot;
    denom > 1e-12 && 2.0 / denom <= limit * limit
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].cross(points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

//! Path building and representation
//!
//! A [`Path`] is a list of subpaths. Every subpath starts with exactly one
//! `MoveTo`, followed by drawing commands, optionally terminated by a single
//! `Close`. Relative commands are resolved to absolute coordinates when they
//! are appended, so a stored path never depends on how it was built.

use crate::primitives::{self, Rect};
use crate::transform::Matrix;
use smallvec::SmallVec;
use std::ops::{Add, Mul, Neg, Sub};

/// Default flattening tolerance in device pixels
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Upper bound on line segments produced for a single cubic
const MAX_CUBIC_SUBDIVISIONS: usize = 256;

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for a zero vector
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        (len > 1e-12 && len.is_finite()).then(|| Point::new(self.x / len, self.y / len))
    }

    /// Rotated a quarter turn (+x towards +y)
    pub fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Path command, always in absolute coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// SVG-style endpoint arc; `x_rotation` is in radians
    ArcTo {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    Close,
}

impl PathCommand {
    /// Point the pen rests on after this command, if it moves the pen
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { end, .. } | PathCommand::ArcTo { end, .. } => Some(end),
            PathCommand::Close => None,
        }
    }

    fn map_points(self, m: &Matrix) -> PathCommand {
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(m.transform_point(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(m.transform_point(p)),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: m.transform_point(control1),
                control2: m.transform_point(control2),
                end: m.transform_point(end),
            },
            // Arcs are resolved to cubics before mapping.
            PathCommand::ArcTo { end, .. } => PathCommand::LineTo(m.transform_point(end)),
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// One connected run of commands beginning with a `MoveTo`
#[derive(Clone, Debug, PartialEq)]
pub struct Subpath {
    commands: SmallVec<[PathCommand; 8]>,
}

impl Subpath {
    fn starting_at(point: Point) -> Self {
        let mut commands = SmallVec::new();
        commands.push(PathCommand::MoveTo(point));
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn start_point(&self) -> Point {
        match self.commands.first() {
            Some(PathCommand::MoveTo(p)) => *p,
            _ => Point::ZERO,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Commands after the leading `MoveTo`
    fn segments(&self) -> &[PathCommand] {
        self.commands.get(1..).unwrap_or(&[])
    }
}

/// A flattened subpath
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A 2D path made of subpaths
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
    current: Option<Point>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// All commands in order
    pub fn commands(&self) -> impl Iterator<Item = &PathCommand> + '_ {
        self.subpaths.iter().flat_map(|s| s.commands.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
        self.current = None;
    }

    /// Base for relative commands: the current point, or the origin
    fn base(&self) -> Point {
        self.current.unwrap_or(Point::ZERO)
    }

    /// Subpath that drawing commands append to. A closed subpath is
    /// continued by a new one starting at `current`.
    fn open_subpath(&mut self, current: Point) -> &mut Subpath {
        if self.subpaths.last().map_or(true, Subpath::is_closed) {
            self.subpaths.push(Subpath::starting_at(current));
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let point = Point::new(x, y);
        match self.subpaths.last_mut() {
            // A moveto directly after a moveto replaces it.
            Some(last) if last.commands.len() == 1 => last.commands[0] = PathCommand::MoveTo(point),
            _ => self.subpaths.push(Subpath::starting_at(point)),
        }
        self.current = Some(point);
        self
    }

    pub fn rel_move_to(&mut self, dx: f64, dy: f64) -> &mut Self {
        let base = self.base();
        self.move_to(base.x + dx, base.y + dy)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let Some(current) = self.current else {
            return self.move_to(x, y);
        };
        let point = Point::new(x, y);
        self.open_subpath(current)
            .commands
            .push(PathCommand::LineTo(point));
        self.current = Some(point);
        self
    }

    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> &mut Self {
        let base = self.base();
        self.line_to(base.x + dx, base.y + dy)
    }

    pub fn horizontal_to(&mut self, x: f64) -> &mut Self {
        let base = self.base();
        self.line_to(x, base.y)
    }

    pub fn rel_horizontal_to(&mut self, dx: f64) -> &mut Self {
        let base = self.base();
        self.line_to(base.x + dx, base.y)
    }

    pub fn vertical_to(&mut self, y: f64) -> &mut Self {
        let base = self.base();
        self.line_to(base.x, y)
    }

    pub fn rel_vertical_to(&mut self, dy: f64) -> &mut Self {
        let base = self.base();
        self.line_to(base.x, base.y + dy)
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> &mut Self {
        let current = match self.current {
            Some(p) => p,
            None => {
                self.move_to(x1, y1);
                Point::new(x1, y1)
            }
        };
        let end = Point::new(x, y);
        self.open_subpath(current)
            .commands
            .push(PathCommand::CubicTo {
                control1: Point::new(x1, y1),
                control2: Point::new(x2, y2),
                end,
            });
        self.current = Some(end);
        self
    }

    /// Cubic with all three points relative to the current point
    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx: f64,
        dy: f64,
    ) -> &mut Self {
        let b = self.base();
        self.curve_to(
            b.x + dx1,
            b.y + dy1,
            b.x + dx2,
            b.y + dy2,
            b.x + dx,
            b.y + dy,
        )
    }

    /// SVG endpoint arc to (x, y)
    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) -> &mut Self {
        let Some(current) = self.current else {
            return self.move_to(x, y);
        };
        let end = Point::new(x, y);
        self.open_subpath(current)
            .commands
            .push(PathCommand::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                end,
            });
        self.current = Some(end);
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rel_arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        dx: f64,
        dy: f64,
    ) -> &mut Self {
        let b = self.base();
        self.arc_to(rx, ry, x_rotation, large_arc, sweep, b.x + dx, b.y + dy)
    }

    /// Circular arc around (cx, cy) in the direction of increasing angle.
    ///
    /// With a current point, a line joins it to the arc's start.
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64) -> &mut Self {
        self.append_arc(cx, cy, radius, angle1, angle2, false)
    }

    /// Circular arc around (cx, cy) in the direction of decreasing angle
    pub fn arc_negative(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    ) -> &mut Self {
        self.append_arc(cx, cy, radius, angle1, angle2, true)
    }

    /// Circular arc whose centre is given relative to the current point
    pub fn rel_arc(
        &mut self,
        dcx: f64,
        dcy: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    ) -> &mut Self {
        let b = self.base();
        self.append_arc(b.x + dcx, b.y + dcy, radius, angle1, angle2, false)
    }

    pub fn rel_arc_negative(
        &mut self,
        dcx: f64,
        dcy: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
    ) -> &mut Self {
        let b = self.base();
        self.append_arc(b.x + dcx, b.y + dcy, radius, angle1, angle2, true)
    }

    fn append_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        angle1: f64,
        angle2: f64,
        negative: bool,
    ) -> &mut Self {
        let commands =
            primitives::arc_segments(Point::new(cx, cy), radius, angle1, angle2, negative);
        for command in commands {
            match command {
                PathCommand::MoveTo(p) if self.current.is_some() => {
                    self.line_to(p.x, p.y);
                }
                other => {
                    self.push(other);
                }
            }
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(last) = self.subpaths.last_mut() {
            if !last.is_closed() {
                last.commands.push(PathCommand::Close);
            }
            self.current = Some(last.start_point());
        }
        self
    }

    /// Append one absolute command
    pub fn push(&mut self, command: PathCommand) -> &mut Self {
        match command {
            PathCommand::MoveTo(p) => self.move_to(p.x, p.y),
            PathCommand::LineTo(p) => self.line_to(p.x, p.y),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => self.curve_to(control1.x, control1.y, control2.x, control2.y, end.x, end.y),
            PathCommand::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                end,
            } => self.arc_to(rx, ry, x_rotation, large_arc, sweep, end.x, end.y),
            PathCommand::Close => self.close(),
        }
    }

    /// Append every command of a shape
    pub fn extend<I>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = PathCommand>,
    {
        for command in commands {
            self.push(command);
        }
        self
    }

    /// Append another path's subpaths
    pub fn append(&mut self, other: &Path) -> &mut Self {
        self.extend(other.commands().copied())
    }

    /// Copy of this path with every point mapped through `m`.
    ///
    /// Endpoint arcs are converted to cubics first, so the result contains
    /// only moves, lines, cubics and closes.
    pub fn transformed(&self, m: &Matrix) -> Path {
        let mut out = Path {
            subpaths: Vec::with_capacity(self.subpaths.len()),
            current: self.current.map(|p| m.transform_point(p)),
        };
        for subpath in &self.subpaths {
            let start = subpath.start_point();
            let mut mapped = Subpath::starting_at(m.transform_point(start));
            let mut pen = start;
            for command in subpath.segments() {
                match *command {
                    PathCommand::ArcTo {
                        rx,
                        ry,
                        x_rotation,
                        large_arc,
                        sweep,
                        end,
                    } => {
                        let pieces = primitives::svg_arc_to_cubics(
                            pen, rx, ry, x_rotation, large_arc, sweep, end,
                        );
                        mapped
                            .commands
                            .extend(pieces.into_iter().map(|c| c.map_points(m)));
                        pen = end;
                    }
                    PathCommand::MoveTo(_) => {}
                    other => {
                        mapped.commands.push(other.map_points(m));
                        if let Some(p) = other.end_point() {
                            pen = p;
                        }
                    }
                }
            }
            out.subpaths.push(mapped);
        }
        out
    }

    /// Copy with endpoint arcs converted to cubics
    pub fn resolved(&self) -> Path {
        self.transformed(&Matrix::identity())
    }

    /// Approximate every subpath by line segments.
    ///
    /// No point of the polylines is further than `tolerance` from the
    /// curve it approximates.
    pub fn flatten(&self, tolerance: f64) -> Vec<Polyline> {
        let tolerance = if tolerance.is_finite() {
            tolerance.max(1e-4)
        } else {
            DEFAULT_TOLERANCE
        };
        let mut out = Vec::with_capacity(self.subpaths.len());
        for subpath in &self.subpaths {
            let start = subpath.start_point();
            let mut polyline = Polyline {
                points: vec![start],
                closed: false,
            };
            let mut pen = start;
            for command in subpath.segments() {
                match *command {
                    PathCommand::LineTo(p) => push_point(&mut polyline.points, p),
                    PathCommand::CubicTo {
                        control1,
                        control2,
                        end,
                    } => flatten_cubic(
                        [pen, control1, control2, end],
                        tolerance,
                        &mut polyline.points,
                    ),
                    PathCommand::ArcTo {
                        rx,
                        ry,
                        x_rotation,
                        large_arc,
                        sweep,
                        end,
                    } => {
                        let mut arc_pen = pen;
                        for piece in primitives::svg_arc_to_cubics(
                            pen, rx, ry, x_rotation, large_arc, sweep, end,
                        ) {
                            match piece {
                                PathCommand::CubicTo {
                                    control1,
                                    control2,
                                    end,
                                } => {
                                    flatten_cubic(
                                        [arc_pen, control1, control2, end],
                                        tolerance,
                                        &mut polyline.points,
                                    );
                                    arc_pen = end;
                                }
                                PathCommand::LineTo(p) => {
                                    push_point(&mut polyline.points, p);
                                    arc_pen = p;
                                }
                                _ => {}
                            }
                        }
                    }
                    PathCommand::Close => polyline.closed = true,
                    PathCommand::MoveTo(_) => {}
                }
                if let Some(p) = command.end_point() {
                    pen = p;
                }
            }
            out.push(polyline);
        }
        out
    }

    /// Bounding box of the flattened geometry, ignoring lone moves
    pub fn bounds(&self) -> Option<Rect> {
        self.flatten(DEFAULT_TOLERANCE)
            .iter()
            .filter(|p| p.points.len() > 1)
            .flat_map(|p| p.points.iter().copied())
            .fold(None, |acc: Option<Rect>, p| match acc {
                None => Some(Rect::new(p.x, p.y, 0.0, 0.0)),
                Some(r) => Some(r.include(p)),
            })
    }
}

fn push_point(points: &mut Vec<Point>, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

fn cubic_point([p0, p1, p2, p3]: [Point; 4], t: f64) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

/// Uniform subdivision. The chord error of `n` segments is bounded by
/// `0.75 * dd / n^2`, where `dd` is the larger second difference of the
/// control polygon.
fn flatten_cubic(curve: [Point; 4], tolerance: f64, out: &mut Vec<Point>) {
    let [p0, p1, p2, p3] = curve;
    let dd1 = (p0 - p1 * 2.0 + p2).length();
    let dd2 = (p1 - p2 * 2.0 + p3).length();
    let dd = dd1.max(dd2);
    let n = ((0.75 * dd / tolerance).sqrt().ceil() as usize).clamp(1, MAX_CUBIC_SUBDIVISIONS);
    for i in 1..=n {
        push_point(out, cubic_point(curve, i as f64 / n as f64));
    }
}

/// Builder for constructing paths by value
#[derive(Debug, Default)]
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.path.move_to(x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.path.line_to(x, y);
        self
    }

    pub fn curve_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        self.path.curve_to(x1, y1, x2, y2, x, y);
        self
    }

    pub fn arc(mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64) -> Self {
        self.path.arc(cx, cy, radius, angle1, angle2);
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.path.extend(primitives::rect(x, y, width, height));
        self
    }

    pub fn circle(mut self, cx: f64, cy: f64, radius: f64) -> Self {
        self.path.extend(primitives::circle(cx, cy, radius));
        self
    }

    pub fn close(mut self) -> Self {
        self.path.close();
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

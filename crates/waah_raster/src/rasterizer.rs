//! Signed-area coverage rasterizer
//!
//! Every line adds the signed area it sweeps to the cells it crosses; a
//! running sum along each row turns those deltas into winding coverage.
//! Clamping the absolute sum to one gives antialiased nonzero filling.

use smallvec::SmallVec;
use waah_paint::{Path, Point};

#[derive(Clone, Debug)]
pub struct Rasterizer {
    width: usize,
    height: usize,
    /// Cells per row: one extra for the right canvas edge and one for
    /// the spill of lines lying on it.
    stride: usize,
    cells: Vec<f32>,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width + 2;
        Self {
            width,
            height,
            stride,
            cells: vec![0.0; stride * height],
        }
    }

    /// Add an edge in device space. Edges may extend past the canvas.
    pub fn add_line(&mut self, from: Point, to: Point) {
        if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
            return;
        }
        let h = self.height as f64;
        if (from.y <= 0.0 && to.y <= 0.0) || (from.y >= h && to.y >= h) {
            return;
        }

        // Split where the edge crosses the left or right canvas border, then
        // pin the outside pieces onto the border. A piece left of the canvas
        // keeps its winding contribution as a vertical edge at x = 0.
        let w = self.width as f64;
        let mut cuts: SmallVec<[f64; 4]> = SmallVec::new();
        cuts.push(0.0);
        for bound in [0.0, w] {
            if (from.x - bound) * (to.x - bound) < 0.0 {
                cuts.push((bound - from.x) / (to.x - from.x));
            }
        }
        cuts.push(1.0);
        cuts.sort_by(|a, b| a.total_cmp(b));

        for pair in cuts.windows(2) {
            let a = from.lerp(to, pair[0]);
            let b = from.lerp(to, pair[1]);
            self.draw_line(
                Point::new(a.x.clamp(0.0, w), a.y),
                Point::new(b.x.clamp(0.0, w), b.y),
            );
        }
    }

    /// Add a polygon; the closing edge is implied.
    pub fn add_polygon(&mut self, points: &[Point]) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.add_line(pair[0], pair[1]);
        }
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            self.add_line(last, first);
        }
    }

    /// Add a device-space path. Open subpaths are closed for filling.
    pub fn add_path(&mut self, path: &Path, tolerance: f64) {
        for polyline in path.flatten(tolerance) {
            self.add_polygon(&polyline.points);
        }
    }

    /// Accumulation for one edge with x already inside [0, width].
    ///
    /// Greatly inspired by font-rs (raster.rs, `draw_line`).
    fn draw_line(&mut self, from: Point, to: Point) {
        // Horizontal edges do not change the winding.
        if (from.y - to.y).abs() <= f64::EPSILON {
            return;
        }

        let (direction, from, to) = if from.y < to.y {
            (1.0, from, to)
        } else {
            (-1.0, to, from)
        };

        let w = self.width as f64;
        let dxdy = (to.x - from.x) / (to.y - from.y);
        let mut x = from.x;
        if from.y < 0.0 {
            x -= from.y * dxdy;
        }

        let y_start = from.y.max(0.0) as usize;
        let y_end = (self.height as f64).min(to.y.ceil()).max(0.0) as usize;

        for y in y_start..y_end {
            let row = y * self.stride;
            let dy = ((y + 1) as f64).min(to.y) - (y as f64).max(from.y);
            let xnext = (x + dxdy * dy).clamp(0.0, w);
            let d = (dy * direction) as f32;

            let (x0, x1) = if x < xnext { (x, xnext) } else { (xnext, x) };
            let x0floor = x0.floor();
            let x0i = x0floor as usize;
            let x1ceil = x1.ceil();
            let x1i = x1ceil as usize;

            if x1i <= x0i + 1 {
                let xmf = (0.5 * (x + xnext) - x0floor) as f32;
                self.cells[row + x0i] += d - d * xmf;
                self.cells[row + x0i + 1] += d * xmf;
            } else {
                let s = (1.0 / (x1 - x0)) as f32;
                let x0f = (x0 - x0floor) as f32;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = (x1 - x1ceil + 1.0) as f32;
                let am = 0.5 * s * x1f * x1f;

                self.cells[row + x0i] += d * a0;
                if x1i == x0i + 2 {
                    self.cells[row + x0i + 1] += d * (1.0 - a0 - am);
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.cells[row + x0i + 1] += d * (a1 - a0);
                    for xi in x0i + 2..x1i - 1 {
                        self.cells[row + xi] += d * s;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    self.cells[row + x1i - 1] += d * (1.0 - a2 - am);
                }
                self.cells[row + x1i] += d * am;
            }
            x = xnext;
        }
    }

    /// Resolve accumulated edges into per-pixel coverage.
    pub fn into_mask(self) -> Mask {
        let mut coverage = vec![0.0f32; self.width * self.height];
        for y in 0..self.height {
            let cells = &self.cells[y * self.stride..y * self.stride + self.width];
            let out = &mut coverage[y * self.width..(y + 1) * self.width];
            let mut acc = 0.0f32;
            for (cell, px) in cells.iter().zip(out.iter_mut()) {
                acc += *cell;
                *px = acc.abs().min(1.0);
            }
        }
        Mask {
            width: self.width,
            height: self.height,
            coverage,
        }
    }
}

/// Fill `path` (device space) into a coverage mask
pub fn fill_path(path: &Path, width: usize, height: usize, tolerance: f64) -> Mask {
    let mut rasterizer = Rasterizer::new(width, height);
    rasterizer.add_path(path, tolerance);
    rasterizer.into_mask()
}

/// Fill device-space polygons, overlapping areas united
pub fn fill_polygons(polygons: &[Vec<Point>], width: usize, height: usize) -> Mask {
    let mut rasterizer = Rasterizer::new(width, height);
    for polygon in polygons {
        rasterizer.add_polygon(polygon);
    }
    rasterizer.into_mask()
}

/// Per-pixel coverage in [0, 1]
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl Mask {
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn coverage_at(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.coverage[y * self.width + x]
    }

    pub fn coverage(&self) -> &[f32] {
        &self.coverage
    }

    /// True when no pixel has any coverage
    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|c| *c <= 0.0)
    }

    /// Multiply by another mask of the same size
    pub fn intersect(&mut self, other: &Mask) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (c, o) in self.coverage.iter_mut().zip(other.coverage.iter()) {
            *c *= *o;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waah_paint::primitives;

    fn rect_path(x: f64, y: f64, w: f64, h: f64) -> Path {
        let mut path = Path::new();
        path.extend(primitives::rect(x, y, w, h));
        path
    }

    fn total(mask: &Mask) -> f32 {
        mask.coverage().iter().sum()
    }

    #[test]
    fn test_aligned_rect_is_exact() {
        let mask = fill_path(&rect_path(2.0, 3.0, 4.0, 5.0), 10, 10, 0.1);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..6).contains(&x) && (3..8).contains(&y);
                let expected = if inside { 1.0 } else { 0.0 };
                assert!(
                    (mask.coverage_at(x, y) - expected).abs() < 1e-5,
                    "pixel ({x}, {y}) = {}",
                    mask.coverage_at(x, y)
                );
            }
        }
    }

    #[test]
    fn test_half_pixel_edge() {
        let mask = fill_path(&rect_path(0.5, 0.0, 2.0, 1.0), 4, 1, 0.1);
        assert!((mask.coverage_at(0, 0) - 0.5).abs() < 1e-5);
        assert!((mask.coverage_at(1, 0) - 1.0).abs() < 1e-5);
        assert!((mask.coverage_at(2, 0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_winding_direction_does_not_matter() {
        let mut reversed = Path::new();
        reversed
            .move_to(1.0, 1.0)
            .line_to(1.0, 6.0)
            .line_to(6.0, 6.0)
            .line_to(6.0, 1.0)
            .close();
        let a = fill_path(&reversed, 8, 8, 0.1);
        let b = fill_path(&rect_path(1.0, 1.0, 5.0, 5.0), 8, 8, 0.1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonzero_overlap_stays_opaque() {
        let mut path = rect_path(0.0, 0.0, 4.0, 4.0);
        path.extend(primitives::rect(2.0, 2.0, 4.0, 4.0));
        let mask = fill_path(&path, 8, 8, 0.1);
        assert!((mask.coverage_at(3, 3) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_partially_offscreen_shape() {
        let mask = fill_path(&rect_path(-5.0, -5.0, 8.0, 8.0), 6, 6, 0.1);
        assert!((mask.coverage_at(0, 0) - 1.0).abs() < 1e-5);
        assert!((mask.coverage_at(2, 2) - 1.0).abs() < 1e-5);
        assert_eq!(mask.coverage_at(3, 3), 0.0);
    }

    #[test]
    fn test_offscreen_right_edge() {
        let mask = fill_path(&rect_path(2.0, 0.0, 100.0, 2.0), 4, 2, 0.1);
        assert_eq!(mask.coverage_at(1, 0), 0.0);
        assert!((mask.coverage_at(3, 1) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_area() {
        let mut path = Path::new();
        path.extend(primitives::circle(32.0, 32.0, 20.0));
        let mask = fill_path(&path, 64, 64, 0.05);
        let expected = std::f32::consts::PI * 400.0;
        assert!((total(&mask) - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_diagonal_edge_area() {
        // Right triangle covering half of a 10x10 square
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 10.0).line_to(0.0, 10.0).close();
        let mask = fill_path(&path, 10, 10, 0.1);
        assert!((total(&mask) - 50.0).abs() < 1e-3);
        assert!((mask.coverage_at(5, 5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let mask = fill_path(&Path::new(), 5, 5, 0.1);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_degenerate_geometry() {
        let mut path = Path::new();
        path.move_to(1.0, 1.0).line_to(1.0, 1.0).line_to(f64::NAN, 3.0);
        let mask = fill_path(&path, 5, 5, 0.1);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_intersect() {
        let mut a = fill_path(&rect_path(0.0, 0.0, 2.0, 2.0), 4, 4, 0.1);
        let b = fill_path(&rect_path(1.0, 1.0, 2.0, 2.0), 4, 4, 0.1);
        a.intersect(&b);
        assert_eq!(a.coverage_at(0, 0), 0.0);
        assert!((a.coverage_at(1, 1) - 1.0).abs() < 1e-5);
    }
}

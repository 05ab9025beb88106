//! End-to-end fill and stroke through to pixels

use waah_paint::{primitives, Color, Gradient, Matrix, Paint, Path, StrokeStyle};
use waah_raster::{fill_path, fill_polygons, stroke_to_polygons, Pixmap};

#[test]
fn test_full_rect_fill_is_opaque_red() {
    let mut path = Path::new();
    path.extend(primitives::rect(0.0, 0.0, 40.0, 30.0));
    let mask = fill_path(&path, 40, 30, 0.1);

    let mut pixmap = Pixmap::new(40, 30);
    let paint = Paint::from(Color::RED);
    let source = paint.resolve(&Matrix::identity()).unwrap();
    pixmap.composite(&mask, None, &source);

    assert_eq!(pixmap.pixel(20, 15), Some([255, 0, 0, 255]));
    assert!(pixmap.data().chunks(4).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn test_gradient_fill_left_to_right() {
    let mut path = Path::new();
    path.extend(primitives::rect(0.0, 0.0, 100.0, 10.0));
    let mask = fill_path(&path, 100, 10, 0.1);

    let gradient = Gradient::linear(0.0, 0.0, 100.0, 0.0)
        .with_stop(0.0, Color::BLACK)
        .with_stop(1.0, Color::WHITE);
    let paint = Paint::from(gradient);
    let source = paint.resolve(&Matrix::identity()).unwrap();

    let mut pixmap = Pixmap::new(100, 10);
    pixmap.composite(&mask, None, &source);

    let left = pixmap.pixel(0, 5).unwrap();
    let right = pixmap.pixel(99, 5).unwrap();
    assert!(left[0] < 5);
    assert!(right[0] > 250);
    // Pixel 49 is sampled at x = 49.5, just before the middle.
    assert_eq!(pixmap.pixel(49, 5), Some([126, 126, 126, 255]));
}

#[test]
fn test_stroked_circle_leaves_centre_empty() {
    let mut path = Path::new();
    path.extend(primitives::circle(50.0, 50.0, 30.0));
    let polygons = stroke_to_polygons(&path, &StrokeStyle::new(4.0), 0.1);
    let mask = fill_polygons(&polygons, 100, 100);

    let mut pixmap = Pixmap::new(100, 100);
    pixmap.composite(&mask, None, &waah_paint::PaintSource::Solid(Color::BLACK));

    assert_eq!(pixmap.pixel(50, 50), Some([0, 0, 0, 0]));
    assert_eq!(pixmap.pixel(80, 50).map(|p| p[3]), Some(255));
    assert_eq!(pixmap.pixel(95, 50), Some([0, 0, 0, 0]));
}

use std::path::PathBuf;
use waah_image::{Image, ImageError};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("waah_image_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
    }
    data
}

#[test]
fn png_fixture_reports_dimensions() {
    let dir = fixture_dir("png");
    let path = dir.join("bg.png");
    Image::from_rgba(gradient_pixels(347, 310), 347, 310)
        .unwrap()
        .to_png(&path)
        .unwrap();

    let img = Image::load(&path).unwrap();
    assert_eq!(img.width(), 347);
    assert_eq!(img.height(), 310);
    assert_eq!(img.pixel(10, 20), Some([10, 20, 128, 255]));
}

#[test]
fn jpeg_fixture_reports_dimensions() {
    let dir = fixture_dir("jpeg");
    let path = dir.join("bg.jpg");
    let rgb = image::RgbImage::from_fn(347, 310, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 64]));
    rgb.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();

    let img = Image::load(&path).unwrap();
    assert_eq!(img.width(), 347);
    assert_eq!(img.height(), 310);
    // JPEG has no alpha channel; decoded pixels are opaque.
    assert_eq!(img.pixel(0, 0).map(|p| p[3]), Some(255));
}

#[test]
fn writing_into_missing_directory_fails() {
    let img = Image::from_rgba(vec![0; 4], 1, 1).unwrap();
    let err = img
        .to_png("/nonexistent-waah-dir/deeper/out.png")
        .unwrap_err();
    assert!(matches!(err, ImageError::Io(_)));
}

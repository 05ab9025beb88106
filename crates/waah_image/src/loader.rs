//! Decoded RGBA images

use crate::error::{ImageError, Result};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// Encoded formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// An immutable, decoded RGBA8 image
///
/// Pixels are straight (non-premultiplied) RGBA, row-major, without padding.
/// Cloning is cheap: the pixel buffer is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Image {
    /// Load a PNG or JPEG file, choosing the decoder by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .ok_or_else(|| ImageError::UnknownFormat(path.display().to_string()))?;

        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImageError::NotFound(path.to_path_buf()),
            _ => ImageError::Io(e),
        })?;

        let image = Self::decode(&data, Some(format))?;
        tracing::debug!(
            "Loaded {:?} image {} ({}x{})",
            format,
            path.display(),
            image.width,
            image.height
        );
        Ok(image)
    }

    /// Decode encoded bytes, sniffing the format from the signature
    pub fn load_from_memory(data: &[u8]) -> Result<Self> {
        Self::decode(data, None)
    }

    fn decode(data: &[u8], format: Option<ImageFormat>) -> Result<Self> {
        let decoded = match format {
            Some(format) => image::load_from_memory_with_format(data, format.to_image_format()),
            None => image::load_from_memory(data),
        }
        .map_err(|e| match e {
            image::ImageError::Unsupported(u) => ImageError::UnknownFormat(u.to_string()),
            other => ImageError::Decode(other.to_string()),
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw().into(),
        })
    }

    /// Wrap already-decoded RGBA pixels
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: data.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get a pixel at (x, y) as RGBA
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG into memory
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let buffer = self.to_rgba_image()?;
        let mut out = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok(out)
    }

    /// Write the image to a PNG file
    ///
    /// No guarantee is made about the file contents when this fails.
    pub fn to_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        tracing::debug!(
            "Wrote {}x{} PNG to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }

    fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.to_vec()).ok_or(
            ImageError::InvalidDimensions {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Image {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, 0, 255 - v, 255]);
            }
        }
        Image::from_rgba(data, width, height).unwrap()
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        let err = Image::from_rgba(vec![0; 7], 2, 1).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions { len: 7, .. }));
    }

    #[test]
    fn test_from_rgba_rejects_empty() {
        assert!(Image::from_rgba(Vec::new(), 0, 0).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let img = checker(3, 2);
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(1, 0), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(3, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_png_encode_decode_preserves_pixels() {
        let img = checker(5, 4);
        let png = img.encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let decoded = Image::load_from_memory(&png).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_load_unknown_extension() {
        let err = Image::load("picture.tiff").unwrap_err();
        assert!(matches!(err, ImageError::UnknownFormat(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Image::load("/nonexistent/waah/bg.png").unwrap_err();
        assert!(matches!(err, ImageError::NotFound(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a/B.PNG")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path(Path::new("bg.jpg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("bg.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("bg.gif")), None);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_decode_garbage() {
        let path = std::env::temp_dir().join("waah_garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = Image::load(&path).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));

        let err = Image::load_from_memory(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ImageError::UnknownFormat(_)));
    }
}

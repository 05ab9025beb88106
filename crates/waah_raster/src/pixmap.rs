//! Straight-alpha RGBA8 pixel buffer and source-over compositing

use waah_paint::{Color, PaintSource};

use crate::rasterizer::Mask;

/// Row-major RGBA8 pixels, straight alpha, no padding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Pixmap {
    /// Transparent pixmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Pixmap with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut pixmap = Self::new(width, height);
        pixmap.fill(color);
        pixmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite every pixel, ignoring what was there
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Blend `source` over the pixmap wherever `mask` has coverage,
    /// further limited by `clip`.
    pub fn composite(&mut self, mask: &Mask, clip: Option<&Mask>, source: &PaintSource<'_>) {
        self.blend_with(|x, y| {
            let coverage = mask.coverage_at(x, y);
            match clip {
                Some(clip) if coverage > 0.0 => coverage * clip.coverage_at(x, y),
                _ => coverage,
            }
        }, source);
    }

    /// Blend `source` over every pixel inside `clip`
    pub fn paint(&mut self, clip: Option<&Mask>, source: &PaintSource<'_>) {
        self.blend_with(|x, y| clip.map_or(1.0, |c| c.coverage_at(x, y)), source);
    }

    fn blend_with<F>(&mut self, coverage: F, source: &PaintSource<'_>)
    where
        F: Fn(usize, usize) -> f32,
    {
        let uniform = source.uniform_color();
        let width = self.width as usize;
        for (i, px) in self.data.chunks_exact_mut(4).enumerate() {
            let (x, y) = (i % width, i / width);
            let cov = coverage(x, y);
            if cov <= 0.0 {
                continue;
            }
            let color = match uniform {
                Some(color) => color,
                None => source.sample(x as f64 + 0.5, y as f64 + 0.5),
            };
            blend_pixel(px, color, cov);
        }
    }
}

/// Source-over on straight alpha
fn blend_pixel(dst: &mut [u8], src: Color, coverage: f32) {
    let sa = (src.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= f32::EPSILON {
        return;
    }
    let channels = [src.r, src.g, src.b];
    for (d, s) in dst.iter_mut().zip(channels) {
        let dv = *d as f32 / 255.0;
        let v = (s.clamp(0.0, 1.0) * sa + dv * da * (1.0 - sa)) / out_a;
        *d = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

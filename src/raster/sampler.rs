//! Sub-cell to source-pixel sampling.
//!
//! Output sub-cell `(x, y)` maps to source coordinate `(sx * x, sy * y)`.
//! Coordinates past the image edge read as black; inside the image the
//! value is either the truncated nearest pixel or a bilinear blend of the
//! four surrounding pixels, with neighbours past the edge clamped to the
//! last row/column.

use super::pixels::PixelBuffer;

/// Samples luminance from a borrowed [`PixelBuffer`] at a fixed scale.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    image: &'a PixelBuffer,
    sx: f64,
    sy: f64,
    interpolate: bool,
}

impl<'a> Sampler<'a> {
    /// Create a sampler with `sx`/`sy` source pixels per sub-cell.
    pub fn new(image: &'a PixelBuffer, sx: f64, sy: f64, interpolate: bool) -> Self {
        Self {
            image,
            sx,
            sy,
            interpolate,
        }
    }

    /// Source-space coordinate of sub-cell `(x, y)`.
    #[inline]
    pub fn source_coords(&self, x: u32, y: u32) -> (f64, f64) {
        (self.sx * x as f64, self.sy * y as f64)
    }

    /// Luminance at sub-cell `(x, y)`, rounded to 0..=255.
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        let (px, py) = self.source_coords(x, y);
        self.sample_at(px, py)
    }

    /// Luminance at continuous source coordinate `(px, py)`.
    ///
    /// With interpolation the four pixels around `(px, py)` are blended
    /// bilinearly; neighbours past the last column or row are clamped.
    /// Without it the coordinate is truncated to the nearest pixel.
    ///
    /// # Arguments
    /// * `px` - Horizontal source coordinate in pixels
    /// * `py` - Vertical source coordinate in pixels
    ///
    /// # Returns
    /// Luminance (0-255), or 0 when the coordinate lies outside the image
    pub fn sample_at(&self, px: f64, py: f64) -> u8 {
        let width = self.image.width();
        let height = self.image.height();
        if !(px >= 0.0 && py >= 0.0) || px >= width as f64 || py >= height as f64 {
            return 0;
        }

        let x1 = px as u32;
        let y1 = py as u32;
        if !self.interpolate {
            return self.image.get(x1, y1);
        }

        let x2 = (x1 + 1).min(width - 1);
        let y2 = (y1 + 1).min(height - 1);
        let v00 = self.image.get(x1, y1) as f64;
        let v10 = self.image.get(x2, y1) as f64;
        let v01 = self.image.get(x1, y2) as f64;
        let v11 = self.image.get(x2, y2) as f64;

        let dx = px - x1 as f64;
        let dy = py - y1 as f64;
        let top = v00 + (v10 - v00) * dx;
        let bottom = v01 + (v11 - v01) * dx;
        (top + (bottom - top) * dy).round().clamp(0.0, 255.0) as u8
    }
}

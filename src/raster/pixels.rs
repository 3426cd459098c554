//! Single-channel luminance buffers and RGB to grayscale conversion.

use image::{DynamicImage, GrayImage, RgbImage};

use super::error::RasterError;

/// Read-only 8-bit luminance image.
///
/// Samples are stored row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap a raw luminance buffer.
    ///
    /// Fails if `pixels` does not hold exactly `width * height` samples.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert a decoded image of any colour type to luminance.
    ///
    /// Grayscale images are taken as-is, everything else goes through
    /// [`rgb_to_luma`]. Alpha is dropped.
    pub fn from_image(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Self::from(gray.clone()),
            other => {
                let rgb = other.to_rgb8();
                Self {
                    width: rgb.width(),
                    height: rgb.height(),
                    pixels: rgb_to_luma(&rgb),
                }
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Raw row-major samples.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Sample at `(x, y)`. Callers guarantee the coordinate is in bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// 256-bin luminance histogram.
    pub fn histogram(&self) -> [u64; 256] {
        let mut bins = [0u64; 256];
        for &p in &self.pixels {
            bins[p as usize] += 1;
        }
        bins
    }

    /// Copy into an `image` crate buffer for filtering.
    pub fn to_gray_image(&self) -> GrayImage {
        // Length is validated on construction, so from_raw cannot fail here.
        GrayImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(image: GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }
}

/// Convert RGB pixels to luminance with the ITU-R BT.601 formula.
///
/// `Y = 0.299*R + 0.587*G + 0.114*B`, computed with integer coefficients
/// scaled by 1000 and truncated.
pub fn rgb_to_luma(rgb: &RgbImage) -> Vec<u8> {
    let pixel_count = rgb.width() as usize * rgb.height() as usize;
    let mut gray = Vec::with_capacity(pixel_count);

    for px in rgb.as_raw().chunks_exact(3) {
        let r = px[0] as u32;
        let g = px[1] as u32;
        let b = px[2] as u32;
        gray.push(((299 * r + 587 * g + 114 * b) / 1000) as u8);
    }

    gray
}

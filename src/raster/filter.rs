//! Gaussian blur and edge emphasis.

use image::imageops;

use super::pixels::PixelBuffer;

/// Gaussian-blurred copy of `image` with standard deviation `radius`.
pub fn gaussian_blur(image: &PixelBuffer, radius: f32) -> PixelBuffer {
    if image.is_empty() || radius <= 0.0 {
        return image.clone();
    }
    PixelBuffer::from(imageops::blur(&image.to_gray_image(), radius))
}

/// Emphasize edges by pushing each pixel away from its blurred surroundings.
///
/// Bright-side differences are added first, then dark-side differences are
/// subtracted from the result, each scaled by `factor` and saturated to
/// 0..=255. A factor of 0 returns the image unchanged.
pub fn sharpen(image: &PixelBuffer, factor: u8, blur_radius: f32) -> PixelBuffer {
    if factor == 0 || image.is_empty() {
        return image.clone();
    }

    let smooth = gaussian_blur(image, blur_radius);
    let factor = factor as u32;
    let scale = |diff: u8| (diff as u32 * factor).min(255) as u8;

    let pixels = image
        .as_raw()
        .iter()
        .zip(smooth.as_raw())
        .map(|(&p, &s)| {
            let lifted = p.saturating_add(scale(p.saturating_sub(s)));
            lifted.saturating_sub(scale(s.saturating_sub(lifted)))
        })
        .collect();

    log::debug!("edge emphasis by factor {}", factor);
    PixelBuffer::new(image.width(), image.height(), pixels).unwrap_or_else(|_| image.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> PixelBuffer {
        // Left half dark, right half bright.
        let pixels = (0..16 * 16)
            .map(|i| if i % 16 < 8 { 60 } else { 180 })
            .collect();
        PixelBuffer::new(16, 16, pixels).unwrap()
    }

    #[test]
    fn test_blur_flat_image_unchanged() {
        let img = PixelBuffer::new(8, 8, vec![90; 64]).unwrap();
        let blurred = gaussian_blur(&img, 3.0);
        assert!(blurred.as_raw().iter().all(|&p| (89..=91).contains(&p)));
    }

    #[test]
    fn test_blur_softens_edge() {
        let img = step_edge();
        let blurred = gaussian_blur(&img, 2.0);
        let left = blurred.get(7, 8);
        let right = blurred.get(8, 8);
        assert!(left > 60, "left of edge should brighten, got {}", left);
        assert!(right < 180, "right of edge should darken, got {}", right);
    }

    #[test]
    fn test_sharpen_zero_is_identity() {
        let img = step_edge();
        assert_eq!(sharpen(&img, 0, 4.0), img);
    }

    #[test]
    fn test_sharpen_increases_edge_contrast() {
        let img = step_edge();
        let sharp = sharpen(&img, 2, 2.0);
        assert!(sharp.get(7, 8) < 60);
        assert!(sharp.get(8, 8) > 180);
        // Far from the edge the image stays (nearly) flat.
        assert!((56..=64).contains(&sharp.get(0, 8)));
        assert!((176..=184).contains(&sharp.get(15, 8)));
    }
}

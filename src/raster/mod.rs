//! Image to terminal text rasterizer.
//!
//! The pipeline turns a single-channel image into lines of text:
//!
//! 1. **Layout** - terminal geometry and zoom decide the output grid and how
//!    many source pixels each sub-cell covers ([`Layout`])
//! 2. **Sampling** - every sub-cell reads a (bilinear) luminance value
//!    from the source ([`Sampler`], [`SampleGrid`])
//! 3. **Thresholding** - a [`Threshold`] strategy decides the cut-off per
//!    source coordinate
//! 4. **Dithering** - a raster scan lights sub-cells and diffuses the
//!    quantization error ([`dither::scan`])
//! 5. **Encoding** - blocks of sub-cells become glyphs ([`Charset`])
//!
//! # Character Sets
//!
//! - `Braille` - 2x4 dots per character, highest resolution
//! - `Blocks` - quadrant block glyphs over 2x2 sub-cells
//! - `Ascii` - printable ASCII approximation of the quadrant glyphs

pub mod dither;
mod error;
pub mod filter;
pub mod geometry;
pub mod glyph;
pub mod pixels;
pub mod sampler;
pub mod stats;
pub mod threshold;

pub use dither::{BinaryBitmap, DitherKernel, DitherParams, SampleGrid};
pub use error::RasterError;
pub use geometry::{Layout, TermGeometry, Zoom};
pub use glyph::{Charset, GlyphRows, BRAILLE_BASE};
pub use pixels::PixelBuffer;
pub use sampler::Sampler;
pub use threshold::{Threshold, ThresholdMode};

/// Highest accepted brightness percentage.
pub const MAX_BRIGHTNESS: u32 = 199;

/// Everything that controls one rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub zoom: Zoom,
    /// Swap lit and unlit sub-cells when encoding.
    pub invert: bool,
    /// Never produce more rows than the terminal has.
    pub crop_y: bool,
    /// Bilinear sampling instead of nearest neighbour.
    pub interpolate: bool,
    /// Brightness adjustment in percent (100 = unchanged).
    pub brightness: u32,
    /// Error preservation factor, 0.0 disables dithering.
    pub dither: f64,
    pub kernel: DitherKernel,
    pub threshold: ThresholdMode,
    pub threshold_arg: Option<u32>,
    pub charset: Charset,
    /// Edge emphasis strength, 0 disables.
    pub sharpen: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            zoom: Zoom::default(),
            invert: false,
            crop_y: false,
            interpolate: true,
            brightness: 100,
            dither: 0.0,
            kernel: DitherKernel::default(),
            threshold: ThresholdMode::default(),
            threshold_arg: None,
            charset: Charset::default(),
            sharpen: 0,
        }
    }
}

impl RasterOptions {
    /// Check every option range. Called before any image work.
    pub fn validate(&self) -> Result<(), RasterError> {
        self.zoom.validate()?;
        if self.brightness > MAX_BRIGHTNESS {
            return Err(RasterError::BrightnessOutOfRange(self.brightness));
        }
        if !(0.0..=1.0).contains(&self.dither) {
            return Err(RasterError::DitherOutOfRange(self.dither));
        }
        self.threshold.validate_arg(self.threshold_arg)
    }
}

/// Rasterize `image` for a terminal of the given geometry.
///
/// Options and geometry are validated and the threshold strategy is built
/// before anything is sampled, so a configuration error never yields
/// partial output.
///
/// # Arguments
/// * `image` - Luminance image to render
/// * `geometry` - Terminal size in characters and pixels
/// * `options` - Zoom, threshold, dithering and charset settings
///
/// # Returns
/// One string per output row, top to bottom. An empty image yields no rows.
///
/// # Errors
/// Any out-of-range option, a degenerate geometry, or an output grid too
/// large to allocate ([`RasterError::GridTooLarge`]).
pub fn rasterize(
    image: &PixelBuffer,
    geometry: &TermGeometry,
    options: &RasterOptions,
) -> Result<Vec<String>, RasterError> {
    options.validate()?;
    geometry.validate()?;
    let threshold = options.threshold.build(image, options.threshold_arg)?;
    rasterize_with(image, geometry, options, &threshold)
}

/// Rasterize with a prebuilt threshold. Options are assumed valid.
///
/// The grid size is still checked before sampling.
pub fn rasterize_with(
    image: &PixelBuffer,
    geometry: &TermGeometry,
    options: &RasterOptions,
    threshold: &Threshold,
) -> Result<Vec<String>, RasterError> {
    if image.is_empty() {
        return Ok(Vec::new());
    }

    let zoom = options.zoom.resolve(image.width(), geometry);
    log::debug!("resize image to {:.1}%", zoom * 100.0);

    let block = options.charset.block_size();
    let layout = Layout::new(
        geometry,
        image.width(),
        image.height(),
        zoom,
        block,
        options.crop_y,
    );
    let (grid_width, grid_height) = layout.subcell_extent(block)?;

    let sharpened;
    let source = if options.sharpen > 0 {
        let (cell_width, _) = geometry.cell_size();
        sharpened = filter::sharpen(image, options.sharpen, cell_width as f32);
        &sharpened
    } else {
        image
    };

    let sampler = Sampler::new(source, layout.sx, layout.sy, options.interpolate);
    let mut grid = SampleGrid::sample(&sampler, grid_width, grid_height);

    let params = DitherParams {
        kernel: options.kernel,
        factor: options.dither,
        brightness: options.brightness as f64 / 100.0,
        sx: layout.sx,
        sy: layout.sy,
    };
    let bitmap = dither::scan(&mut grid, threshold, &params);

    Ok(glyph::encode(&bitmap, options.charset, options.invert))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..height)
            .flat_map(|_| (0..width).map(move |x| (x * 255 / (width - 1)) as u8))
            .collect();
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_validate_defaults() {
        assert!(RasterOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_ranges() {
        let opts = RasterOptions {
            brightness: 200,
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(RasterError::BrightnessOutOfRange(200))
        ));

        let opts = RasterOptions {
            dither: 1.5,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(RasterError::DitherOutOfRange(_))));

        let opts = RasterOptions {
            threshold: ThresholdMode::Constant,
            threshold_arg: Some(300),
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_rasterize_dimensions() {
        // 10x20 pixel cells; a 100x40 image at zoom 1 needs 10x2 characters.
        let geo = TermGeometry::new(24, 80, 800, 480);
        let opts = RasterOptions {
            threshold: ThresholdMode::Constant,
            ..Default::default()
        };
        let lines = rasterize(&gradient(100, 40), &geo, &opts).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 10));
    }

    #[test]
    fn test_rasterize_empty_image() {
        let img = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        let geo = TermGeometry::default();
        assert!(rasterize(&img, &geo, &RasterOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rasterize_huge_zoom_is_error() {
        let geo = TermGeometry::new(24, 80, 800, 480);
        for zoom in [1e8, 1e10] {
            let opts = RasterOptions {
                zoom: Zoom::Factor(zoom),
                ..Default::default()
            };
            assert!(matches!(
                rasterize(&gradient(10, 10), &geo, &opts),
                Err(RasterError::GridTooLarge { .. })
            ));
        }
    }

    #[test]
    fn test_rasterize_config_error_before_output() {
        let geo = TermGeometry::default();
        let opts = RasterOptions {
            threshold: ThresholdMode::Percentile,
            threshold_arg: Some(150),
            ..Default::default()
        };
        assert!(rasterize(&gradient(16, 16), &geo, &opts).is_err());
    }
}

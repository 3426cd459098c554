//! Terminal geometry and output grid layout.
//!
//! The terminal reports its size in characters and in pixels. Dividing the
//! two gives the pixel size of one character cell, which together with the
//! zoom factor decides how many source pixels each sub-cell covers and how
//! many characters the image needs.

use super::error::RasterError;

/// Character-cell width used when the terminal does not report pixels.
pub const FALLBACK_CELL_WIDTH: u32 = 9;

/// Character-cell height used when the terminal does not report pixels.
pub const FALLBACK_CELL_HEIGHT: u32 = 19;

/// Upper bound on sub-cells in one rendering (16M, about 130 MB of samples).
pub const MAX_SUBCELLS: u64 = 1 << 24;

/// Terminal size in characters and pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermGeometry {
    pub rows: u32,
    pub cols: u32,
    pub width_px: u32,
    pub height_px: u32,
}

impl TermGeometry {
    pub fn new(rows: u32, cols: u32, width_px: u32, height_px: u32) -> Self {
        Self {
            rows,
            cols,
            width_px,
            height_px,
        }
    }

    /// Geometry with a pixel size synthesised from the character grid.
    pub fn from_chars(rows: u32, cols: u32) -> Self {
        Self::new(
            rows,
            cols,
            cols * FALLBACK_CELL_WIDTH,
            rows * FALLBACK_CELL_HEIGHT,
        )
    }

    pub fn validate(&self) -> Result<(), RasterError> {
        if self.rows == 0 || self.cols == 0 || self.width_px == 0 || self.height_px == 0 {
            return Err(RasterError::InvalidGeometry {
                rows: self.rows,
                cols: self.cols,
                width: self.width_px,
                height: self.height_px,
            });
        }
        Ok(())
    }

    /// Pixel size of one character cell as `(width, height)`.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.width_px as f64 / self.cols as f64,
            self.height_px as f64 / self.rows as f64,
        )
    }
}

impl Default for TermGeometry {
    fn default() -> Self {
        Self::from_chars(24, 80)
    }
}

/// Image scale relative to terminal pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zoom {
    /// Absolute scale factor, must be positive.
    Factor(f64),
    /// Scale so the image spans the terminal's pixel width.
    FitWidth,
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom::Factor(1.0)
    }
}

impl Zoom {
    pub fn validate(&self) -> Result<(), RasterError> {
        match *self {
            Zoom::Factor(f) if !(f.is_finite() && f > 0.0) => Err(RasterError::InvalidZoom(f)),
            _ => Ok(()),
        }
    }

    /// Concrete scale factor for an image `image_width` pixels wide.
    pub fn resolve(&self, image_width: u32, geometry: &TermGeometry) -> f64 {
        match *self {
            Zoom::Factor(f) => f,
            Zoom::FitWidth => geometry.width_px as f64 / image_width.max(1) as f64,
        }
    }
}

/// Output grid derived from geometry, image size and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Output characters per row.
    pub cols: u32,
    /// Output rows.
    pub rows: u32,
    /// Source pixels per sub-cell, horizontally.
    pub sx: f64,
    /// Source pixels per sub-cell, vertically.
    pub sy: f64,
}

impl Layout {
    /// Compute the output grid for an image on a terminal.
    ///
    /// Columns never exceed the terminal width; rows only respect the
    /// terminal height when `crop_y` is set. Huge zoom factors saturate
    /// the row count, which [`subcell_extent`](Self::subcell_extent) then
    /// rejects.
    ///
    /// # Arguments
    /// * `geometry` - Terminal size in characters and pixels
    /// * `image_width` - Source image width in pixels
    /// * `image_height` - Source image height in pixels
    /// * `zoom` - Resolved scale factor (image pixels to terminal pixels)
    /// * `block_size` - Sub-cells per character as `(columns, rows)`
    /// * `crop_y` - Clamp rows to the terminal height
    ///
    /// # Returns
    /// Output characters per row and rows, plus the source pixels covered
    /// by one sub-cell in each direction.
    pub fn new(
        geometry: &TermGeometry,
        image_width: u32,
        image_height: u32,
        zoom: f64,
        block_size: (u32, u32),
        crop_y: bool,
    ) -> Self {
        let (cw, ch) = geometry.cell_size();
        let (kx, ky) = block_size;
        let sx = cw / zoom / kx as f64;
        let sy = ch / zoom / ky as f64;

        let cols = ((image_width as f64 * zoom / cw).round() as u32).min(geometry.cols);
        let rows = (image_height as f64 * zoom / ch).round() as u32;
        let rows = if crop_y { rows.min(geometry.rows) } else { rows };

        log::debug!(
            "terminal dimensions: {}x{} pixels, {}x{} characters",
            geometry.width_px,
            geometry.height_px,
            geometry.cols,
            geometry.rows
        );
        log::debug!("character size in pixels: {:.2}x{:.2}", cw, ch);
        log::debug!("sample rate in pixels: {:.2} horizontal, {:.2} vertical", sx, sy);
        log::debug!("using {} columns x {} rows", cols, rows);

        Self { cols, rows, sx, sy }
    }

    /// Size of the sub-cell grid as `(width, height)`.
    ///
    /// Fails with [`RasterError::GridTooLarge`] if either side overflows
    /// `u32` or the grid holds more than [`MAX_SUBCELLS`] cells.
    pub fn subcell_extent(&self, block_size: (u32, u32)) -> Result<(u32, u32), RasterError> {
        let too_large = || RasterError::GridTooLarge {
            cols: self.cols,
            rows: self.rows,
        };
        let width = self.cols.checked_mul(block_size.0).ok_or_else(too_large)?;
        let height = self.rows.checked_mul(block_size.1).ok_or_else(too_large)?;
        match (width as u64).checked_mul(height as u64) {
            Some(cells) if cells <= MAX_SUBCELLS => Ok((width, height)),
            _ => Err(too_large()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        let geo = TermGeometry::new(50, 100, 900, 1000);
        assert_eq!(geo.cell_size(), (9.0, 20.0));
    }

    #[test]
    fn test_from_chars_synthesises_pixels() {
        let geo = TermGeometry::from_chars(53, 53);
        assert_eq!(geo.width_px, 477);
        assert_eq!(geo.height_px, 1007);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(TermGeometry::new(0, 80, 720, 480).validate().is_err());
        assert!(TermGeometry::new(24, 80, 0, 0).validate().is_err());
        assert!(TermGeometry::default().validate().is_ok());
    }

    #[test]
    fn test_zoom_validation() {
        assert!(Zoom::Factor(0.0).validate().is_err());
        assert!(Zoom::Factor(-1.0).validate().is_err());
        assert!(Zoom::Factor(f64::NAN).validate().is_err());
        assert!(Zoom::Factor(0.5).validate().is_ok());
        assert!(Zoom::FitWidth.validate().is_ok());
    }

    #[test]
    fn test_fit_width() {
        let geo = TermGeometry::new(24, 80, 800, 480);
        assert_eq!(Zoom::FitWidth.resolve(400, &geo), 2.0);
        assert_eq!(Zoom::Factor(1.5).resolve(400, &geo), 1.5);
    }

    #[test]
    fn test_layout_braille() {
        // 10x20 pixel cells, braille 2x4 sub-cells.
        let geo = TermGeometry::new(24, 80, 800, 480);
        let layout = Layout::new(&geo, 200, 100, 1.0, (2, 4), false);
        assert_eq!(layout.cols, 20);
        assert_eq!(layout.rows, 5);
        assert_eq!(layout.sx, 5.0);
        assert_eq!(layout.sy, 5.0);
    }

    #[test]
    fn test_layout_zoom_doubles_columns() {
        let geo = TermGeometry::new(24, 80, 800, 480);
        let one = Layout::new(&geo, 200, 100, 1.0, (2, 4), false);
        let two = Layout::new(&geo, 200, 100, 2.0, (2, 4), false);
        assert_eq!(two.cols, one.cols * 2);
        assert_eq!(two.sx, one.sx / 2.0);
    }

    #[test]
    fn test_subcell_extent() {
        let geo = TermGeometry::new(24, 80, 800, 480);
        let layout = Layout::new(&geo, 200, 100, 1.0, (2, 4), false);
        assert_eq!(layout.subcell_extent((2, 4)).unwrap(), (40, 20));
    }

    #[test]
    fn test_huge_zoom_is_rejected() {
        let geo = TermGeometry::new(24, 80, 800, 480);
        for zoom in [1e8, 1e10, 1e300] {
            let layout = Layout::new(&geo, 10, 10, zoom, (2, 4), false);
            assert!(matches!(
                layout.subcell_extent((2, 4)),
                Err(RasterError::GridTooLarge { .. })
            ));
        }
        // Cropping to the terminal keeps even a huge zoom renderable.
        let cropped = Layout::new(&geo, 10, 10, 1e10, (2, 4), true);
        assert_eq!(cropped.subcell_extent((2, 4)).unwrap(), (160, 96));
    }

    #[test]
    fn test_layout_clamps_columns_and_crops_rows() {
        let geo = TermGeometry::new(10, 40, 400, 200);
        let layout = Layout::new(&geo, 1000, 1000, 1.0, (2, 4), false);
        assert_eq!(layout.cols, 40);
        assert_eq!(layout.rows, 50);

        let cropped = Layout::new(&geo, 1000, 1000, 1.0, (2, 4), true);
        assert_eq!(cropped.rows, 10);
    }
}

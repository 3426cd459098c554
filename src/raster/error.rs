//! Error types for the rasterization pipeline.

/// Errors raised while configuring or running a rasterization.
///
/// Every variant except `BufferSizeMismatch` is a configuration error and is
/// reported before any sampling starts.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("unknown threshold mode '{0}' (expected one of: const, extrema, median, percentile, local)")]
    UnknownThresholdMode(String),

    #[error("unknown charset '{0}' (expected one of: braille, blocks, ascii)")]
    UnknownCharset(String),

    #[error("unknown dither kernel '{0}' (expected one of: atkinson, floyd-steinberg)")]
    UnknownKernel(String),

    #[error("threshold mode '{mode}' allows values between {min} and {max}, got {value}")]
    ThresholdArgOutOfRange {
        mode: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("brightness must be between 0 and 199 percent, got {0}")]
    BrightnessOutOfRange(u32),

    #[error("dither factor must be between 0.0 and 1.0, got {0}")]
    DitherOutOfRange(f64),

    #[error("zoom factor must be a positive number, got {0}")]
    InvalidZoom(f64),

    #[error("invalid terminal geometry: {rows}x{cols} characters, {width}x{height} pixels")]
    InvalidGeometry {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },

    #[error("output grid of {cols}x{rows} characters is too large to render (lower the zoom or use --crop-y)")]
    GridTooLarge { cols: u32, rows: u32 },

    #[error("pixel buffer of {width}x{height} needs {expected} samples, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_arg_message() {
        let err = RasterError::ThresholdArgOutOfRange {
            mode: "percentile",
            value: 120,
            min: 0,
            max: 99,
        };
        let msg = err.to_string();
        assert!(msg.contains("percentile"));
        assert!(msg.contains("between 0 and 99"));
        assert!(msg.contains("120"));
    }

    #[test]
    fn test_grid_too_large_message() {
        let msg = RasterError::GridTooLarge {
            cols: 80,
            rows: u32::MAX,
        }
        .to_string();
        assert!(msg.contains("80x4294967295"));
    }

    #[test]
    fn test_unknown_charset_message() {
        let msg = RasterError::UnknownCharset("emoji".to_string()).to_string();
        assert!(msg.contains("'emoji'"));
        assert!(msg.contains("braille"));
    }
}

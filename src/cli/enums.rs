//! CLI enum types for threshold mode, dither kernel and character set options.

use clap::ValueEnum;

use crate::raster;

/// Threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThresholdChoice {
    /// Fixed threshold (-t 0..255, default 127)
    Const,
    /// Midpoint between darkest and brightest pixel
    Extrema,
    /// Median brightness
    Median,
    /// Nth percentile brightness (-t 0..99, default 50)
    Percentile,
    /// Blurred neighbourhood average (-t blur radius)
    #[default]
    Local,
}

impl From<ThresholdChoice> for raster::ThresholdMode {
    fn from(t: ThresholdChoice) -> Self {
        match t {
            ThresholdChoice::Const => raster::ThresholdMode::Constant,
            ThresholdChoice::Extrema => raster::ThresholdMode::Extrema,
            ThresholdChoice::Median => raster::ThresholdMode::Median,
            ThresholdChoice::Percentile => raster::ThresholdMode::Percentile,
            ThresholdChoice::Local => raster::ThresholdMode::Local,
        }
    }
}

/// Error-diffusion kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Kernel {
    #[default]
    Atkinson,
    FloydSteinberg,
}

impl From<Kernel> for raster::DitherKernel {
    fn from(k: Kernel) -> Self {
        match k {
            Kernel::Atkinson => raster::DitherKernel::Atkinson,
            Kernel::FloydSteinberg => raster::DitherKernel::FloydSteinberg,
        }
    }
}

/// Output character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Braille,
    Blocks,
    Ascii,
}

impl From<CharacterSet> for raster::Charset {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Braille => raster::Charset::Braille,
            CharacterSet::Blocks => raster::Charset::Blocks,
            CharacterSet::Ascii => raster::Charset::Ascii,
        }
    }
}

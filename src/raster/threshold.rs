//! Brightness threshold strategies.
//!
//! A [`ThresholdMode`] names a strategy and validates its argument; building
//! it against an image yields a [`Threshold`], which answers "how bright must
//! a sub-cell at this source coordinate be to count as lit".

use std::fmt;
use std::str::FromStr;

use super::error::RasterError;
use super::filter::gaussian_blur;
use super::pixels::PixelBuffer;
use super::stats::{extrema, min_med_max, percentile};

/// Default constant threshold.
pub const DEFAULT_CONSTANT: u32 = 127;

/// Default percentile for [`ThresholdMode::Percentile`].
pub const DEFAULT_PERCENTILE: u32 = 50;

/// Lower bound of the derived blur radius for [`ThresholdMode::Local`].
pub const MIN_LOCAL_BLUR_RADIUS: u32 = 12;

/// Named threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Fixed threshold, argument 0..=255 (default 127)
    Constant,
    /// Midpoint between the darkest and brightest pixel
    Extrema,
    /// 50th percentile of the histogram
    Median,
    /// Nth percentile of the histogram, argument 0..=99 (default 50)
    Percentile,
    /// Per-pixel threshold from a heavily blurred copy, argument is the blur radius
    #[default]
    Local,
}

impl ThresholdMode {
    pub const ALL: [ThresholdMode; 5] = [
        ThresholdMode::Constant,
        ThresholdMode::Extrema,
        ThresholdMode::Median,
        ThresholdMode::Percentile,
        ThresholdMode::Local,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ThresholdMode::Constant => "const",
            ThresholdMode::Extrema => "extrema",
            ThresholdMode::Median => "median",
            ThresholdMode::Percentile => "percentile",
            ThresholdMode::Local => "local",
        }
    }

    /// Inclusive argument range, or `None` if the mode takes no argument.
    pub fn arg_range(&self) -> Option<(u32, u32)> {
        match self {
            ThresholdMode::Constant => Some((0, 255)),
            ThresholdMode::Percentile => Some((0, 99)),
            ThresholdMode::Local => Some((0, 9999)),
            ThresholdMode::Extrema | ThresholdMode::Median => None,
        }
    }

    /// Check `arg` against [`arg_range`](Self::arg_range).
    pub fn validate_arg(&self, arg: Option<u32>) -> Result<(), RasterError> {
        match (arg, self.arg_range()) {
            (Some(value), Some((min, max))) if !(min..=max).contains(&value) => {
                Err(RasterError::ThresholdArgOutOfRange {
                    mode: self.name(),
                    value,
                    min,
                    max,
                })
            }
            (Some(value), None) => {
                log::warn!(
                    "threshold mode '{}' takes no argument, ignoring {}",
                    self.name(),
                    value
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Validate `arg` and precompute the strategy for `image`.
    pub fn build(&self, image: &PixelBuffer, arg: Option<u32>) -> Result<Threshold, RasterError> {
        self.validate_arg(arg)?;

        let histogram = image.histogram();
        let [lo, med, hi] = min_med_max(&histogram);
        log::debug!("brightness min/median/max: {}/{}/{}", lo, med, hi);

        let threshold = match self {
            ThresholdMode::Constant => {
                Threshold::Constant(arg.unwrap_or(DEFAULT_CONSTANT) as f64)
            }
            ThresholdMode::Extrema => {
                let (lo, hi) = extrema(&histogram).unwrap_or((0, 0));
                let value = (lo as f64 + hi as f64) / 2.0;
                log::debug!("min/max brightness ({}, {}) -> threshold={}", lo, hi, value);
                Threshold::Constant(value)
            }
            ThresholdMode::Median => Threshold::Constant(percentile(&histogram, 50) as f64),
            ThresholdMode::Percentile => {
                let percent = arg.unwrap_or(DEFAULT_PERCENTILE);
                Threshold::Constant(percentile(&histogram, percent) as f64)
            }
            ThresholdMode::Local => {
                let radius = match arg {
                    Some(r) if r > 0 => r,
                    _ => default_blur_radius(image),
                };
                log::debug!("gaussian blur radius for `local` mode: {}", radius);
                Threshold::Local(gaussian_blur(image, radius as f32))
            }
        };
        Ok(threshold)
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThresholdMode {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "const" | "constant" => Ok(ThresholdMode::Constant),
            "extrema" => Ok(ThresholdMode::Extrema),
            "median" => Ok(ThresholdMode::Median),
            "percentile" => Ok(ThresholdMode::Percentile),
            "local" => Ok(ThresholdMode::Local),
            other => Err(RasterError::UnknownThresholdMode(other.to_string())),
        }
    }
}

/// `max(12, min(width, height) / 16)`.
pub fn default_blur_radius(image: &PixelBuffer) -> u32 {
    (image.width().min(image.height()) / 16).max(MIN_LOCAL_BLUR_RADIUS)
}

/// A built threshold strategy. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// Same threshold everywhere.
    Constant(f64),
    /// Threshold read from a blurred luminance map in source coordinates.
    Local(PixelBuffer),
}

impl Threshold {
    /// Threshold at source coordinate `(px, py)`.
    ///
    /// The local map reads 0 outside the image, like the sampler does.
    #[inline]
    pub fn evaluate(&self, px: f64, py: f64) -> f64 {
        match self {
            Threshold::Constant(value) => *value,
            Threshold::Local(map) => {
                if !(px >= 0.0 && py >= 0.0)
                    || px >= map.width() as f64
                    || py >= map.height() as f64
                {
                    return 0.0;
                }
                map.get(px as u32, py as u32) as f64
            }
        }
    }
}

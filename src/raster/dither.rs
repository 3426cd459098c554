//! Thresholding with error-diffusion dithering.
//!
//! The scan visits every sub-cell once in row-major order. Each cell is lit
//! when its accumulated luminance, scaled by the brightness adjustment,
//! reaches the threshold; the quantization error is then pushed to the
//! kernel's recipients. Recipients always lie later in scan order, so a
//! cell's value is final by the time it is read.

use std::fmt;
use std::str::FromStr;

use super::error::RasterError;
use super::sampler::Sampler;
use super::threshold::Threshold;

/// Denominator applied to every kernel weight.
pub const KERNEL_NORMALIZER: f64 = 16.0;

/// Error-diffusion kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherKernel {
    /// Six recipients of 2/16 each; a quarter of the error is dropped.
    #[default]
    Atkinson,
    /// Four recipients with weights 7, 3, 5, 1 (of 16).
    FloydSteinberg,
}

impl DitherKernel {
    /// `(dx, dy, weight)` error recipients relative to the current cell.
    pub fn recipients(&self) -> &'static [(i32, u32, f64)] {
        match self {
            DitherKernel::Atkinson => &[
                (1, 0, 2.0),
                (2, 0, 2.0),
                (-1, 1, 2.0),
                (0, 1, 2.0),
                (1, 1, 2.0),
                (0, 2, 2.0),
            ],
            //       [*] 7
            //  3     5  1
            DitherKernel::FloydSteinberg => &[(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)],
        }
    }

    /// Luminance a lit cell is assumed to contribute when computing error.
    pub fn full_scale(&self) -> f64 {
        match self {
            DitherKernel::Atkinson | DitherKernel::FloydSteinberg => 247.0,
        }
    }

    /// Furthest row below the current one that receives error.
    pub fn vertical_reach(&self) -> u32 {
        self.recipients().iter().map(|&(_, dy, _)| dy).max().unwrap_or(0)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DitherKernel::Atkinson => "atkinson",
            DitherKernel::FloydSteinberg => "floyd-steinberg",
        }
    }
}

impl fmt::Display for DitherKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherKernel {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atkinson" => Ok(DitherKernel::Atkinson),
            "floyd-steinberg" | "floyd" => Ok(DitherKernel::FloydSteinberg),
            other => Err(RasterError::UnknownKernel(other.to_string())),
        }
    }
}

/// Row-major working buffer of sampled luminance, mutated by the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl SampleGrid {
    /// Sample every sub-cell of a `width` x `height` grid.
    pub fn sample(sampler: &Sampler<'_>, width: u32, height: u32) -> Self {
        let mut values = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                values.push(sampler.sample(x, y) as f64);
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    /// Build a grid from precomputed values (row-major).
    pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[self.index(x, y)]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Add `amount` to `(x + dx, y + dy)` if that cell exists.
    #[inline]
    fn spread(&mut self, x: u32, y: u32, dx: i32, dy: u32, amount: f64) {
        let rx = x as i64 + dx as i64;
        let ry = y as u64 + dy as u64;
        if rx < 0 || rx >= self.width as i64 || ry >= self.height as u64 {
            return;
        }
        let idx = self.index(rx as u32, ry as u32);
        self.values[idx] += amount;
    }
}

/// Binary lit/unlit decision per sub-cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryBitmap {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BinaryBitmap {
    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if bits.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: bits.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is lit. Out-of-range cells read as unlit.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn count_lit(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Scan parameters that stay fixed for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherParams {
    pub kernel: DitherKernel,
    /// Share of the quantization error that is kept, 0.0 disables dithering.
    pub factor: f64,
    /// Multiplier applied to luminance before comparing with the threshold.
    pub brightness: f64,
    /// Source pixels per sub-cell, used to place threshold lookups.
    pub sx: f64,
    pub sy: f64,
}

/// Threshold and dither `grid` in place, returning the lit bitmap.
///
/// Cells are visited in row-major order. A cell is lit when
/// `value * brightness >= threshold(sx * x, sy * y)`. Its quantization
/// error `(value - full_scale * lit) * factor / 16` is then added to the
/// kernel's in-bounds recipients, and error past the edges is dropped.
/// A factor of 0 skips diffusion entirely.
///
/// # Arguments
/// * `grid` - Sampled luminance, used as scratch space. After the call it
///   holds each cell's value as it was when the scan read it.
/// * `threshold` - Built threshold strategy, evaluated in source coordinates
/// * `params` - Kernel, error factor, brightness and sample rates
///
/// # Returns
/// A bitmap of the same size as `grid` with lit sub-cells set
pub fn scan(grid: &mut SampleGrid, threshold: &Threshold, params: &DitherParams) -> BinaryBitmap {
    let (width, height) = (grid.width, grid.height);
    let recipients = params.kernel.recipients();
    let full_scale = params.kernel.full_scale();
    let diffuse = params.factor != 0.0;

    let mut bits = Vec::with_capacity(grid.values.len());
    for y in 0..height {
        for x in 0..width {
            let value = grid.get(x, y);
            let cutoff = threshold.evaluate(params.sx * x as f64, params.sy * y as f64);
            let lit = value * params.brightness >= cutoff;
            bits.push(lit);

            if !diffuse {
                continue;
            }
            let quantized = if lit { full_scale } else { 0.0 };
            let error = (value - quantized) * params.factor / KERNEL_NORMALIZER;
            for &(dx, dy, weight) in recipients {
                grid.spread(x, y, dx, dy, error * weight);
            }
        }
    }

    BinaryBitmap {
        width,
        height,
        bits,
    }
}

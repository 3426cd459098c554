//! Order statistics over luminance histograms.

/// Bin index of the `percent`th percentile of `histogram`.
///
/// Bin counts are accumulated until the running sum reaches
/// `percent / 100 * total`; the first populated bin that gets there wins.
/// An all-zero histogram yields 0.
pub fn percentile(histogram: &[u64], percent: u32) -> u8 {
    let total: u64 = histogram.iter().sum();
    let target = total as f64 * percent as f64 / 100.0;

    let mut acc = 0u64;
    for (i, &count) in histogram.iter().enumerate() {
        acc += count;
        if count > 0 && acc as f64 >= target {
            log::debug!("{}th percentile at brightness level {}", percent, i);
            return i.min(255) as u8;
        }
    }
    0
}

/// Lowest and highest populated bins, or `None` for an empty histogram.
pub fn extrema(histogram: &[u64]) -> Option<(u8, u8)> {
    let lo = histogram.iter().position(|&c| c > 0)?;
    let hi = histogram.iter().rposition(|&c| c > 0)?;
    Some((lo.min(255) as u8, hi.min(255) as u8))
}

/// Minimum, median and maximum, sorted ascending.
pub fn min_med_max(histogram: &[u64]) -> [u8; 3] {
    let (lo, hi) = extrema(histogram).unwrap_or((0, 0));
    let mut out = [lo, percentile(histogram, 50), hi];
    out.sort_unstable();
    out
}

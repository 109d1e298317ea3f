//! Folding time windows into output pixel columns.
//!
//! The number of computed spectra is generally much larger than the image
//! width, so consecutive spectra landing on the same destination column are
//! combined by elementwise maximum ("max-hold") rather than averaged; this
//! keeps transient peaks visible after the fold.

use crate::config::WidthBucket;

/// Pixel density for a sound of the given duration.
///
/// The first bucket whose `(min_seconds, max_seconds]` range contains the
/// duration wins; durations beyond every bucket fall back to the last
/// entry's density.
pub fn pixels_per_second(duration_seconds: f64, table: &[WidthBucket]) -> u32 {
    for bucket in table {
        if duration_seconds > bucket.min_seconds && duration_seconds <= bucket.max_seconds {
            return bucket.pixels_per_second;
        }
    }
    table.last().map(|b| b.pixels_per_second).unwrap_or(0)
}

/// Target image width in pixels for a sound of the given duration.
pub fn target_width(duration_seconds: f64, table: &[WidthBucket]) -> usize {
    (f64::from(pixels_per_second(duration_seconds, table)) * duration_seconds) as usize
}

/// Fold `spectra` into at most `width` output columns by max-hold.
///
/// Source index `i` of `n` spectra maps to destination column
/// `(i * width) / n`; while the destination stays the same, spectra are
/// combined elementwise by maximum. The final partial column is always
/// sealed. The realized column count (`<= width` and `<= n`) is the
/// authoritative image width from here on.
///
/// `progress` receives the fraction of spectra processed, in `[0, 1)`.
pub fn accumulate_columns(
    spectra: &[Vec<f64>],
    width: usize,
    mut progress: impl FnMut(f64),
) -> Vec<Vec<f64>> {
    let n = spectra.len();
    if n == 0 {
        return Vec::new();
    }
    let height = spectra[0].len();
    let mut columns = Vec::new();
    let mut column = vec![0.0; height];
    let mut x = 0;
    for (idx, spectrum) in spectra.iter().enumerate() {
        let new_x = (idx * width) / n;
        if new_x != x {
            columns.push(std::mem::replace(&mut column, vec![0.0; height]));
            x = new_x;
        }
        for (acc, &value) in column.iter_mut().zip(spectrum) {
            if value > *acc {
                *acc = value;
            }
        }
        progress(idx as f64 / n as f64);
    }
    columns.push(column);
    columns
}

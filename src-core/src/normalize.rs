//! Peak-relative log-scale normalization of amplitude spectra.

/// Guards `log10` against exact zero amplitudes.
const LOG_EPSILON: f64 = 1e-60;

/// Rescale one spectrum in place to `[0, 1]` relative to the global peak.
///
/// Each amplitude `a` becomes
/// `(clip(20 * log10(a / peak + eps), -range, 0) + range) / range`:
/// the peak itself maps to 1.0, anything `range_db` decibels or more below
/// the peak maps to 0.0.
///
/// A non-positive peak means the whole signal is silence; every value maps
/// to 0.0 rather than propagating a division by zero.
pub fn normalize_in_place(values: &mut [f64], peak: f64, range_db: f64) {
    if peak <= 0.0 {
        values.fill(0.0);
        return;
    }
    for value in values.iter_mut() {
        let db = 20.0 * (*value / peak + LOG_EPSILON).log10();
        *value = (db.clamp(-range_db, 0.0) + range_db) / range_db;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_maps_to_one() {
        let mut values = vec![4.0];
        normalize_in_place(&mut values, 4.0, 110.0);
        assert!((values[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_amplitude_maps_to_zero() {
        let mut values = vec![0.0];
        normalize_in_place(&mut values, 4.0, 110.0);
        assert_eq!(values[0], 0.0);
    }

    #[test]
    fn values_below_dynamic_range_clip_to_zero() {
        // 120 dB below peak with a 110 dB range.
        let peak = 1.0;
        let mut values = vec![peak * 10f64.powf(-120.0 / 20.0)];
        normalize_in_place(&mut values, peak, 110.0);
        assert_eq!(values[0], 0.0);
    }

    #[test]
    fn half_range_lands_midway() {
        // 55 dB below peak with a 110 dB range -> 0.5.
        let peak = 2.0;
        let mut values = vec![peak * 10f64.powf(-55.0 / 20.0)];
        normalize_in_place(&mut values, peak, 110.0);
        assert!((values[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn silent_signal_normalizes_to_zero() {
        let mut values = vec![0.0; 16];
        normalize_in_place(&mut values, 0.0, 110.0);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn output_stays_in_unit_interval() {
        let mut values: Vec<f64> = (0..100).map(|i| i as f64 * 0.07).collect();
        let peak = values.iter().copied().fold(0.0, f64::max);
        normalize_in_place(&mut values, peak, 110.0);
        assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}

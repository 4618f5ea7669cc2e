//! Min–max normalization of a feature column.

use crate::constants::DEGENERATE_NORMALIZED_VALUE;

/// Scale `values` to `[0, 1]` by `(x - min) / (max - min)`.
///
/// A constant column has no spread to scale; every value maps to 0.5 so the
/// feature neither helps nor hurts any day.
///
/// # Examples
/// ```
/// use bigring::scoring::normalize::min_max;
/// assert_eq!(min_max(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
/// assert_eq!(min_max(&[7.0, 7.0]), vec![0.5, 0.5]);
/// ```
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if !span.is_finite() || span <= 0.0 {
        return vec![DEGENERATE_NORMALIZED_VALUE; values.len()];
    }

    values.iter().map(|v| (v - min) / span).collect()
}

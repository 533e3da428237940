//! Linear-interpolation quantiles

/// Computes a single quantile from sorted data using linear interpolation.
///
/// For `n` values the quantile `q` sits at fractional position `q * (n - 1)`;
/// the result interpolates between the two neighbouring order statistics.
/// `q` is clamped to `0.0..=1.0`. Returns `f64::NAN` for an empty input.
///
/// # Examples
///
/// ```
/// use cubestats_stats::quantile::quantile_sorted;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&values, 0.0), 1.0);
/// assert_eq!(quantile_sorted(&values, 0.5), 2.5);
/// assert_eq!(quantile_sorted(&values, 1.0), 4.0);
/// assert!(quantile_sorted(&[], 0.5).is_nan());
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted_values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
}

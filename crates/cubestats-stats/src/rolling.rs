//! Trailing rolling-window statistics
//!
//! Each output position `i` summarises the window `i + 1 - window ..= i`.
//! Positions before the window is filled yield `None` rather than a
//! partial-window estimate, and so does every position when `window == 0`.

/// Trailing rolling mean.
///
/// # Examples
///
/// ```
/// use cubestats_stats::rolling::rolling_mean;
///
/// let ma = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
/// assert_eq!(ma, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    // Each window is summed afresh; no running total.
    (0..values.len())
        .map(|i| {
            (i + 1 >= window).then(|| {
                let slice = &values[i + 1 - window..=i];
                slice.iter().sum::<f64>() / window as f64
            })
        })
        .collect()
}

/// Trailing rolling fraction of `true` flags.
///
/// Every defined value lies in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use cubestats_stats::rolling::rolling_fraction;
///
/// let hits = [true, false, true, true];
/// assert_eq!(
///     rolling_fraction(&hits, 2),
///     vec![None, Some(0.5), Some(0.5), Some(1.0)]
/// );
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rolling_fraction(flags: &[bool], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; flags.len()];
    }
    let mut hits = 0_usize;
    flags
        .iter()
        .enumerate()
        .map(|(i, &flag)| {
            hits += usize::from(flag);
            if i >= window {
                hits -= usize::from(flags[i - window]);
            }
            (i + 1 >= window).then(|| hits as f64 / window as f64)
        })
        .collect()
}

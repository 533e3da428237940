use std::ops::Range;

use crate::quantile;

/// A histogram of a dataset's distribution.
///
/// The main range spans P5–P95 so a handful of very slow (or unparsed, zero)
/// values do not squash the interesting part of the distribution; values
/// outside it are counted in dedicated underflow/overflow bins.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bins in ascending order, including tail bins when present.
    pub bins: Vec<HistogramBin>,
}

/// A single histogram bin (inclusive start, exclusive end).
#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub range: Range<f64>,
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cubestats_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 5);
    /// let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
    /// assert_eq!(total, 10);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&hard_min), Some(&hard_max)) = (sorted_values.first(), sorted_values.last())
        else {
            return Self { bins: vec![] };
        };
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let soft_min = quantile::quantile_sorted(sorted_values, 0.05);
        let soft_max = quantile::quantile_sorted(sorted_values, 0.95);
        let mut width = (soft_max - soft_min) / num_bins as f64;
        if width < f64::EPSILON {
            // Everything sits on (almost) one value
            width = 1.0;
        }
        let main_start = soft_min;
        let main_end = main_start + width * num_bins as f64;

        let has_underflow = hard_min < main_start;
        let has_overflow = hard_max >= main_end;
        let offset = usize::from(has_underflow);

        let mut bins = Vec::with_capacity(num_bins + 2);
        if has_underflow {
            bins.push(HistogramBin {
                range: hard_min..main_start,
                count: 0,
            });
        }
        // Edges are recomputed from the index to avoid accumulating error
        bins.extend((0..num_bins).map(|i| HistogramBin {
            range: main_start + width * i as f64..main_start + width * (i + 1) as f64,
            count: 0,
        }));
        if has_overflow {
            bins.push(HistogramBin {
                range: main_end..hard_max.next_up(),
                count: 0,
            });
        }

        for &val in sorted_values {
            let position = (val - main_start) / width;
            let idx = if position < 0.0 {
                0
            } else if position >= num_bins as f64 {
                if has_overflow {
                    num_bins + offset
                } else {
                    num_bins - 1 + offset
                }
            } else {
                (position.floor() as usize).min(num_bins - 1) + offset
            };
            bins[idx].count += 1;
        }

        Self { bins }
    }
}

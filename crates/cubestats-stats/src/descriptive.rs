/// Descriptive statistics summarizing a dataset.
///
/// Holds the measures of central tendency and dispersion used throughout the
/// solve-log summaries. All values are `f64` seconds in practice, but nothing
/// here assumes a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median of the dataset (mean of the two middle values for even counts).
    pub median: f64,
    /// The sample standard deviation (`n - 1` denominator).
    ///
    /// `None` when the dataset has fewer than two values.
    pub std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cubestats_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mean = mean(sorted_values.iter().copied())?;
        let median = median_of_sorted(sorted_values)?;
        let std_dev = (count > 1).then(|| {
            let sum_sq = sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (count - 1) as f64).sqrt()
        });

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }
}

/// Arithmetic mean, or `None` for an empty input.
///
/// ```
/// # use cubestats_stats::descriptive::mean;
/// assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(std::iter::empty()), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Median of unsorted values, or `None` for an empty input.
///
/// ```
/// # use cubestats_stats::descriptive::median;
/// assert_eq!(median([10.0, 12.0, 9.0, 11.0, 8.0]), Some(10.0));
/// assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
#[must_use]
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter().collect::<Vec<_>>();
    values.sort_by(f64::total_cmp);
    median_of_sorted(&values)
}

fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        Some(f64::midpoint(sorted_values[mid - 1], sorted_values[mid]))
    }
}

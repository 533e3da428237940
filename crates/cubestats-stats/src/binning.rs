//! Equal-frequency (quantile) binning
//!
//! This module partitions a dataset into bins whose boundaries are quantiles
//! of the data itself, so that each bin holds roughly the same number of
//! samples regardless of how the values are distributed.
//!
//! # Algorithm
//!
//! 1. Sort the values
//! 2. Compute the `q + 1` edges at quantiles `0, 1/q, 2/q, ..., 1`
//!    (linear interpolation, see [`quantile_sorted`])
//! 3. Drop duplicate edges; each collapsed edge removes one bin, so the
//!    effective number of bins may be lower than requested
//! 4. Bins are right-closed intervals `(lo, hi]`, except the first one which
//!    also includes its lower edge
//!
//! # Examples
//!
//! ```
//! use cubestats_stats::binning::QuantileBins;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let bins = QuantileBins::new(&values, 4).unwrap();
//! assert_eq!(bins.len(), 4);
//! assert_eq!(bins.bin_of(1.0), Some(0));
//! assert_eq!(bins.bin_of(8.0), Some(3));
//!
//! // Many identical values collapse edges and therefore bins
//! let values = [1.0, 1.0, 1.0, 1.0, 1.0, 2.0];
//! let bins = QuantileBins::new(&values, 3).unwrap();
//! assert_eq!(bins.len(), 1);
//! ```

use crate::quantile::quantile_sorted;

/// Information about a single quantile bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinInfo {
    /// Position of the bin, starting at 0 for the lowest values
    pub ordinal: usize,
    /// Lower edge (exclusive, except for the first bin)
    pub start: f64,
    /// Upper edge (inclusive)
    pub end: f64,
}

/// Quantile bin edges computed from a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBins {
    edges: Vec<f64>,
}

impl QuantileBins {
    /// Computes up to `q` equal-frequency bins for `values`.
    ///
    /// Returns `None` if `values` is empty or `q` is zero. When every value is
    /// identical, a single zero-width bin containing that value is produced.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64], q: usize) -> Option<Self> {
        if values.is_empty() || q == 0 {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut edges = (0..=q)
            .map(|i| quantile_sorted(&sorted, i as f64 / q as f64))
            .collect::<Vec<_>>();
        edges.dedup();
        if edges.len() == 1 {
            edges.push(edges[0]);
        }
        Some(Self { edges })
    }

    /// Number of bins after duplicate edges were dropped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    /// Always `false`; a constructed binning has at least one bin.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The deduplicated bin edges in ascending order.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Returns the ordinal of the bin containing `value`.
    ///
    /// Values outside `[first edge, last edge]` (and NaN) belong to no bin.
    #[must_use]
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if !(first..=last).contains(&value) {
            return None;
        }
        if value <= first {
            return Some(0);
        }
        self.edges[1..].iter().position(|&upper| value <= upper)
    }

    /// Iterates over the bins in ascending order.
    pub fn bins(&self) -> impl Iterator<Item = BinInfo> + '_ {
        self.edges
            .windows(2)
            .enumerate()
            .map(|(ordinal, w)| BinInfo {
                ordinal,
                start: w[0],
                end: w[1],
            })
    }
}

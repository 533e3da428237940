//! Degree-1 least-squares fitting
//!
//! [`LinearFit::weighted`] follows the usual polynomial-fit convention where a
//! weight scales the *unsquared* residual: the fit minimises
//! `Σ (wᵢ · (yᵢ - (a·xᵢ + b)))²`. [`LinearFit::ordinary`] is the same fit with
//! every weight equal to one.

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a weighted least-squares line.
    ///
    /// Returns `None` when the inputs are misaligned, hold fewer than two
    /// points, carry no effective weight, or have no spread in `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_stats::regression::LinearFit;
    ///
    /// let xs = [0.0, 1.0, 2.0, 3.0];
    /// let ys = [1.0, 3.0, 5.0, 7.0];
    /// let fit = LinearFit::weighted(&xs, &ys, &[0.1, 0.5, 1.0, 2.0]).unwrap();
    /// assert!((fit.slope - 2.0).abs() < 1e-9);
    /// assert!((fit.intercept - 1.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn weighted(xs: &[f64], ys: &[f64], weights: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() != weights.len() || xs.len() < 2 {
            return None;
        }

        let squared = weights.iter().map(|w| w * w).collect::<Vec<_>>();
        let total = squared.iter().sum::<f64>();
        if !total.is_normal() {
            return None;
        }
        let weighted_mean = |values: &[f64]| {
            values
                .iter()
                .zip(&squared)
                .map(|(v, w)| v * w)
                .sum::<f64>()
                / total
        };
        let x_mean = weighted_mean(xs);
        let y_mean = weighted_mean(ys);

        let (sxy, sxx) = xs.iter().zip(ys).zip(&squared).fold(
            (0.0, 0.0),
            |(sxy, sxx), ((x, y), w)| {
                let dx = x - x_mean;
                (sxy + w * dx * (y - y_mean), sxx + w * dx * dx)
            },
        );
        // Identical x values leave only rounding noise in sxx
        let scale = xs.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        if sxx <= total * (scale * 1e-12).powi(2) {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    /// Fits an unweighted least-squares line.
    ///
    /// ```
    /// use cubestats_stats::regression::LinearFit;
    ///
    /// let fit = LinearFit::ordinary(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).unwrap();
    /// assert_eq!(fit.slope, 0.0);
    /// assert_eq!(fit.intercept, 2.0);
    ///
    /// assert!(LinearFit::ordinary(&[1.0], &[2.0]).is_none());
    /// ```
    #[must_use]
    pub fn ordinary(xs: &[f64], ys: &[f64]) -> Option<Self> {
        Self::weighted(xs, ys, &vec![1.0; xs.len()])
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `n` evenly spaced samples from `start` to `end`, both inclusive.
///
/// ```
/// use cubestats_stats::regression::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misaligned_inputs() {
        assert!(LinearFit::weighted(&[1.0, 2.0], &[1.0], &[1.0, 1.0]).is_none());
        assert!(LinearFit::weighted(&[1.0, 2.0], &[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_zero_x_spread() {
        assert!(LinearFit::ordinary(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_vanishing_weights() {
        assert!(LinearFit::weighted(&[1.0, 2.0], &[1.0, 2.0], &[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_ordinary_matches_closed_form() {
        // Roughly y = 0.5x + 1
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.1, 1.4, 2.1, 2.4, 3.0];
        let fit = LinearFit::ordinary(&xs, &ys).unwrap();
        assert!((fit.slope - 0.48).abs() < 1e-9);
        assert!((fit.intercept - 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_weights_pull_towards_heavy_points() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 2.0, 10.0];
        let light = LinearFit::weighted(&xs, &ys, &[1.0, 1.0, 1.0, 0.01]).unwrap();
        let heavy = LinearFit::weighted(&xs, &ys, &[1.0, 1.0, 1.0, 10.0]).unwrap();
        assert!(light.slope < heavy.slope);
        assert!((light.slope - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_linspace_endpoints_exact() {
        let xs = linspace(0.1, 0.7, 7);
        assert_eq!(xs.first(), Some(&0.1));
        assert_eq!(xs.last(), Some(&0.7));
        assert_eq!(xs.len(), 7);
    }
}

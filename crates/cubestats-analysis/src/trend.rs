//! Trend lines for plotting
//!
//! A trend line is a degree-1 least-squares fit sampled at evenly spaced x
//! positions across the observed x domain. The weighted variant multiplies
//! each point's residual by `exp(-decay_factor * recency)`. Recency is
//! measured in days throughout this module.
//!
//! Samples never extrapolate beyond `[min x, max x]`.

use chrono::NaiveDate;
use cubestats_stats::regression::{self, LinearFit};
use serde::Serialize;

use crate::{session::SessionStats, weekly::ValidWeek};

/// Input point of a weighted trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
    /// Age of the point; larger values weigh less
    pub recency: f64,
}

/// One sample along a fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSample {
    pub x: f64,
    pub y: f64,
}

/// A fitted line and its plotting samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub samples: Vec<TrendSample>,
}

impl TrendLine {
    /// Fits a recency-weighted line through `points` and samples it at
    /// `n_points` positions.
    ///
    /// Returns `None` for fewer than two points or when every point has the
    /// same x.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::trend::{TrendLine, TrendPoint};
    ///
    /// let points = [
    ///     TrendPoint { x: 1.0, y: 3.0, recency: 2.0 },
    ///     TrendPoint { x: 2.0, y: 5.0, recency: 1.0 },
    ///     TrendPoint { x: 3.0, y: 7.0, recency: 0.0 },
    /// ];
    /// let line = TrendLine::weighted(&points, 0.5, 5).unwrap();
    /// assert!((line.slope - 2.0).abs() < 1e-9);
    /// assert_eq!(line.samples.len(), 5);
    /// assert_eq!(line.samples[0].x, 1.0);
    /// assert_eq!(line.samples[4].x, 3.0);
    ///
    /// assert!(TrendLine::weighted(&points[..1], 0.5, 5).is_none());
    /// ```
    #[must_use]
    pub fn weighted(points: &[TrendPoint], decay_factor: f64, n_points: usize) -> Option<Self> {
        let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
        let ys = points.iter().map(|p| p.y).collect::<Vec<_>>();
        let weights = points
            .iter()
            .map(|p| (-decay_factor * p.recency).exp())
            .collect::<Vec<_>>();
        let fit = LinearFit::weighted(&xs, &ys, &weights)?;
        Some(Self::sample(fit, &xs, n_points))
    }

    /// Fits an ordinary least-squares line through `(xs[i], ys[i])`.
    #[must_use]
    pub fn unweighted(xs: &[f64], ys: &[f64], n_points: usize) -> Option<Self> {
        let fit = LinearFit::ordinary(xs, ys)?;
        Some(Self::sample(fit, xs, n_points))
    }

    fn sample(fit: LinearFit, xs: &[f64], n_points: usize) -> Self {
        let (min, max) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                (min.min(x), max.max(x))
            });
        let samples = regression::linspace(min, max, n_points)
            .into_iter()
            .map(|x| TrendSample {
                x,
                y: fit.predict(x),
            })
            .collect();
        Self {
            slope: fit.slope,
            intercept: fit.intercept,
            samples,
        }
    }
}

/// Days from each date to the latest date of `dates`.
///
/// ```
/// use chrono::NaiveDate;
/// use cubestats_analysis::trend::recency_days;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// assert_eq!(recency_days(&[d(1), d(8), d(4)]), vec![7.0, 0.0, 4.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn recency_days(dates: &[NaiveDate]) -> Vec<f64> {
    let Some(&latest) = dates.iter().max() else {
        return vec![];
    };
    dates
        .iter()
        .map(|&date| (latest - date).num_days() as f64)
        .collect()
}

/// Unweighted trend of mean solve time against session size.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn size_vs_mean_trend(sessions: &[SessionStats], n_points: usize) -> Option<TrendLine> {
    let sizes = sessions.iter().map(|s| s.size as f64).collect::<Vec<_>>();
    let means = sessions.iter().map(|s| s.mean_time_sec).collect::<Vec<_>>();
    TrendLine::unweighted(&sizes, &means, n_points)
}

/// Recency-weighted trend of sub-X probability against session size.
///
/// Sessions without a probability are skipped. Recency is counted in days
/// from each session's start to the start of the latest session.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn size_vs_sub_x_trend(
    sessions: &[SessionStats],
    decay_factor: f64,
    n_points: usize,
) -> Option<TrendLine> {
    let sessions = sessions
        .iter()
        .filter_map(|s| Some((s, s.subx_probability?)))
        .collect::<Vec<_>>();
    let dates = sessions
        .iter()
        .map(|(s, _)| s.start.date())
        .collect::<Vec<_>>();
    let points = sessions
        .iter()
        .zip(recency_days(&dates))
        .map(|(&(s, probability), recency)| TrendPoint {
            x: s.size as f64,
            y: probability,
            recency,
        })
        .collect::<Vec<_>>();
    TrendLine::weighted(&points, decay_factor, n_points)
}

/// Recency-weighted trend of week-over-week improvement against weekly
/// volume.
///
/// Weeks without a `delta_pct` are skipped.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn weekly_delta_trend(
    weeks: &[ValidWeek],
    decay_factor: f64,
    n_points: usize,
) -> Option<TrendLine> {
    let weeks = weeks
        .iter()
        .filter_map(|w| Some((w, w.delta_pct?)))
        .collect::<Vec<_>>();
    let dates = weeks.iter().map(|(w, _)| w.week_start).collect::<Vec<_>>();
    let points = weeks
        .iter()
        .zip(recency_days(&dates))
        .map(|(&(w, delta), recency)| TrendPoint {
            x: w.volume as f64,
            y: delta,
            recency,
        })
        .collect::<Vec<_>>();
    TrendLine::weighted(&points, decay_factor, n_points)
}

#[cfg(test)]
mod tests {
    use chrono::{Days, Duration};

    use super::*;

    fn session(id: usize, day: u32, size: usize, mean: f64, subx: Option<f64>) -> SessionStats {
        let start = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        SessionStats {
            session_id: id,
            size,
            mean_time_sec: mean,
            start,
            end: start + Duration::minutes(20),
            subx_probability: subx,
        }
    }

    #[test]
    fn test_perfect_line_is_reproduced() {
        let xs = [2.0, 4.0, 6.0, 8.0];
        let ys = xs.map(|x| -0.5 * x + 12.0);
        let line = TrendLine::unweighted(&xs, &ys, 100).unwrap();
        assert_eq!(line.samples.len(), 100);
        for sample in &line.samples {
            assert!((sample.y - (-0.5 * sample.x + 12.0)).abs() < 1e-9);
        }
        assert_eq!(line.samples.first().unwrap().x, 2.0);
        assert_eq!(line.samples.last().unwrap().x, 8.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(TrendLine::unweighted(&[], &[], 10).is_none());
        assert!(TrendLine::unweighted(&[3.0], &[1.0], 10).is_none());
        assert!(TrendLine::unweighted(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0], 10).is_none());
    }

    #[test]
    fn test_decay_favors_recent_points() {
        // Old points follow y = x, recent points follow y = 2x
        let points = [
            (1.0, 1.0, 400.0),
            (2.0, 2.0, 400.0),
            (3.0, 3.0, 400.0),
            (1.0, 2.0, 0.0),
            (2.0, 4.0, 0.0),
            (3.0, 6.0, 0.0),
        ]
        .map(|(x, y, recency)| TrendPoint { x, y, recency });
        let flat = TrendLine::weighted(&points, 0.0, 2).unwrap();
        let decayed = TrendLine::weighted(&points, 0.05, 2).unwrap();
        assert!((flat.slope - 1.5).abs() < 1e-9);
        assert!((decayed.slope - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_recency_days_empty() {
        assert!(recency_days(&[]).is_empty());
    }

    #[test]
    fn test_size_vs_mean_trend() {
        let sessions = [
            session(0, 1, 5, 14.0, None),
            session(1, 2, 10, 13.0, None),
            session(2, 3, 15, 12.0, None),
        ];
        let line = size_vs_mean_trend(&sessions, 3).unwrap();
        assert!((line.slope + 0.2).abs() < 1e-9);
        assert!(size_vs_mean_trend(&sessions[..1], 3).is_none());
    }

    #[test]
    fn test_sub_x_trend_skips_missing_probabilities() {
        let sessions = [
            session(0, 1, 5, 14.0, Some(0.2)),
            session(1, 2, 10, 13.0, None),
            session(2, 3, 15, 12.0, Some(0.6)),
        ];
        let line = size_vs_sub_x_trend(&sessions, 0.01, 2).unwrap();
        assert!((line.slope - 0.04).abs() < 1e-9);
        assert!(size_vs_sub_x_trend(&sessions[1..2], 0.01, 2).is_none());
    }

    #[test]
    fn test_weekly_delta_trend() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let weeks = (0..4_u64)
            .map(|i| ValidWeek {
                week_start: monday + Days::new(7 * i),
                volume: 20 * (i as usize + 1),
                median_time_sec: 12.0,
                n_sessions: 2,
                prev_week_median: 12.0,
                delta_pct: (i != 2).then_some(i as f64),
            })
            .collect::<Vec<_>>();
        let line = weekly_delta_trend(&weeks, 0.01, 10).unwrap();
        assert!((line.slope - 0.05).abs() < 1e-9);
        assert_eq!(line.samples[0].x, 20.0);
        assert_eq!(line.samples[9].x, 80.0);
    }
}

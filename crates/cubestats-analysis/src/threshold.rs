//! Sub-X counts and probabilities
//!
//! A solve is "sub-X" when its time is strictly below X seconds.

use cubestats_stats::rolling;
use serde::Serialize;

use crate::view::LogView;

/// Number and share of sub-X solves for one threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubXCount {
    /// Threshold in seconds
    pub threshold: f64,
    pub count: usize,
    /// `count / total`; `None` for an empty view
    pub proportion: Option<f64>,
}

impl SubXCount {
    /// Display label such as `Sub 10s`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Sub {}s", self.threshold)
    }
}

/// Counts sub-X solves over the whole view for each threshold.
///
/// For thresholds given in ascending order the counts never decrease.
///
/// # Examples
///
/// ```
/// use cubestats_analysis::{
///     config::SessionConfig, load::RawLog, prepare::PreparedLog, threshold::sub_x_counts,
/// };
///
/// let raw = RawLog::parse(
///     "date;time\n\
///      01/03/2024 10:00;0:10.00\n\
///      01/03/2024 10:01;0:12.00\n\
///      01/03/2024 10:02;0:09.00\n\
///      01/03/2024 10:03;0:11.00\n\
///      01/03/2024 10:04;0:08.00\n",
/// )?;
/// let log = PreparedLog::prepare(&raw, &SessionConfig::default());
/// let counts = sub_x_counts(&log.all(), &[10.0, 12.0]);
///
/// assert_eq!(counts[0].count, 2);
/// assert_eq!(counts[0].proportion, Some(0.4));
/// assert_eq!(counts[0].label(), "Sub 10s");
/// assert_eq!(counts[1].count, 4);
/// # Ok::<(), cubestats_analysis::load::LoadError>(())
/// ```
#[must_use]
pub fn sub_x_counts(view: &LogView<'_>, thresholds: &[f64]) -> Vec<SubXCount> {
    let times = view.times();
    thresholds
        .iter()
        .map(|&threshold| SubXCount {
            threshold,
            count: count_below(&times, threshold),
            proportion: fraction_below(&times, threshold),
        })
        .collect()
}

/// Trailing rolling sub-X probability, aligned with the events of `view`.
///
/// Each value is the share of sub-X solves among the last `window` solves
/// (including the current one). Positions before the window is full are
/// `None`.
#[must_use]
pub fn rolling_sub_x(view: &LogView<'_>, threshold: f64, window: usize) -> Vec<Option<f64>> {
    let hits = view
        .iter()
        .map(|e| e.time_sec() < threshold)
        .collect::<Vec<_>>();
    rolling::rolling_fraction(&hits, window)
}

fn count_below(times: &[f64], threshold: f64) -> usize {
    times.iter().filter(|&&t| t < threshold).count()
}

/// Share of `times` strictly below `threshold`; `None` for no times.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn fraction_below(times: &[f64], threshold: f64) -> Option<f64> {
    (!times.is_empty()).then(|| count_below(times, threshold) as f64 / times.len() as f64)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::{config::SessionConfig, event::Event, prepare::PreparedLog};

    fn log_of(times: &[f64]) -> PreparedLog {
        let base = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let events = (0_i64..)
            .zip(times)
            .map(|(i, &t)| Event::new(base + Duration::seconds(30 * i), Some(t), BTreeMap::new()))
            .collect();
        PreparedLog::from_events(events, &SessionConfig::default())
    }

    #[test]
    fn test_counts_are_monotonic_in_threshold() {
        let log = log_of(&[7.2, 9.9, 10.0, 13.4, 6.1, 8.8, 15.0, 11.1]);
        let thresholds = (6..=15).map(f64::from).collect::<Vec<_>>();
        let counts = sub_x_counts(&log.all(), &thresholds);
        for pair in counts.windows(2) {
            assert!(pair[0].count <= pair[1].count);
        }
        // strictly below: 10.0 is not sub-10
        assert_eq!(counts[4].count, 4);
    }

    #[test]
    fn test_empty_view_has_no_proportion() {
        let log = log_of(&[]);
        let counts = sub_x_counts(&log.all(), &[10.0]);
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[0].proportion, None);
    }

    #[test]
    fn test_rolling_sub_x() {
        let log = log_of(&[9.0, 11.0, 9.5, 8.0, 12.0]);
        let rolling = rolling_sub_x(&log.all(), 10.0, 3);
        assert_eq!(rolling.len(), 5);
        assert_eq!(rolling[..2], [None, None]);
        assert!((rolling[2].unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((rolling[3].unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((rolling[4].unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }
}

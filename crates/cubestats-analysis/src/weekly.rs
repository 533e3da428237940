//! Weekly aggregation
//!
//! Events are bucketed by the Monday of their ISO week. Weeks without any
//! event are not synthesized, so the "previous week" of a week is the previous
//! *non-empty* week, which may lie more than seven days back.
//!
//! ```text
//! week_start   volume  median  n_sessions  prev_week_median  delta_pct
//! 2024-01-01       40    12.1           3                 -          -   (not valid)
//! 2024-01-08       55    11.5           4              12.1       4.96
//! 2024-01-22       12    11.9           1              11.5      -3.48
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use cubestats_stats::descriptive;
use serde::Serialize;

use crate::{event::SessionId, view::LogView};

/// Aggregates of one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    /// Monday of the week
    pub week_start: NaiveDate,
    /// Number of solves
    pub volume: usize,
    pub median_time_sec: f64,
    /// Distinct sessions with at least one solve in the week
    pub n_sessions: usize,
    /// Median of the previous non-empty week
    pub prev_week_median: Option<f64>,
}

/// A week that has a previous-week reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidWeek {
    pub week_start: NaiveDate,
    pub volume: usize,
    pub median_time_sec: f64,
    pub n_sessions: usize,
    pub prev_week_median: f64,
    /// Improvement over the previous week in percent (positive = faster).
    /// `None` when the previous median is zero.
    pub delta_pct: Option<f64>,
}

/// Weekly aggregates in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyTable {
    pub weeks: Vec<WeekStats>,
}

impl WeeklyTable {
    /// Aggregates the events of `view` by week.
    ///
    /// A session spanning a week boundary counts towards every week it
    /// touches.
    #[must_use]
    pub fn collect(view: &LogView<'_>) -> Self {
        let mut buckets = BTreeMap::<NaiveDate, (Vec<f64>, BTreeSet<SessionId>)>::new();
        for event in view.iter() {
            let (times, sessions) = buckets.entry(event.week_start()).or_default();
            times.push(event.time_sec());
            sessions.insert(event.session_id());
        }

        let mut prev_median = None;
        let weeks = buckets
            .into_iter()
            .filter_map(|(week_start, (times, sessions))| {
                let volume = times.len();
                let median_time_sec = descriptive::median(times)?;
                let week = WeekStats {
                    week_start,
                    volume,
                    median_time_sec,
                    n_sessions: sessions.len(),
                    prev_week_median: prev_median,
                };
                prev_median = Some(median_time_sec);
                Some(week)
            })
            .collect::<Vec<_>>();
        log::debug!("collected {} weeks", weeks.len());
        Self { weeks }
    }

    /// Weeks with a previous-week reference, with their percent change.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::{
    ///     config::SessionConfig, load::RawLog, prepare::PreparedLog, weekly::WeeklyTable,
    /// };
    ///
    /// let raw = RawLog::parse(
    ///     "date;time\n\
    ///      01/01/2024 10:00;0:20.00\n\
    ///      08/01/2024 10:00;0:15.00\n",
    /// )?;
    /// let log = PreparedLog::prepare(&raw, &SessionConfig::default());
    /// let weekly = WeeklyTable::collect(&log.all());
    /// let valid = weekly.valid();
    ///
    /// assert_eq!(weekly.weeks.len(), 2);
    /// assert_eq!(valid.len(), 1);
    /// assert_eq!(valid[0].delta_pct, Some(25.0));
    /// # Ok::<(), cubestats_analysis::load::LoadError>(())
    /// ```
    #[must_use]
    pub fn valid(&self) -> Vec<ValidWeek> {
        self.weeks
            .iter()
            .filter_map(|week| {
                let prev_week_median = week.prev_week_median?;
                Some(ValidWeek {
                    week_start: week.week_start,
                    volume: week.volume,
                    median_time_sec: week.median_time_sec,
                    n_sessions: week.n_sessions,
                    prev_week_median,
                    delta_pct: delta_pct(prev_week_median, week.median_time_sec),
                })
            })
            .collect()
    }

    /// Sum of weekly volumes, equal to the number of events aggregated.
    #[must_use]
    pub fn total_volume(&self) -> usize {
        self.weeks.iter().map(|w| w.volume).sum()
    }
}

/// `(prev - current) / prev * 100`, or `None` if `prev` is zero or the
/// result is not finite.
#[must_use]
pub fn delta_pct(prev: f64, current: f64) -> Option<f64> {
    if prev.abs() < f64::MIN_POSITIVE {
        return None;
    }
    let delta = (prev - current) / prev * 100.0;
    delta.is_finite().then_some(delta)
}

//! Headline metrics and per-event series
//!
//! Everything here is derived from a [`LogView`] in one pass or a sort:
//! overall descriptive statistics, the trailing moving average of solve
//! times, means by hour of day and weekday, and the solve-time histogram.

use chrono::Weekday;
use cubestats_stats::{descriptive::DescriptiveStats, histogram::Histogram, rolling};
use serde::Serialize;

use crate::{event, view::LogView};

/// Headline statistics of a view.
///
/// Every value is `None` for an empty view; `std_dev` (sample, n−1) is also
/// `None` for a single event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub mean: Option<f64>,
    pub best: Option<f64>,
    pub worst: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

impl Summary {
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::{
    ///     config::SessionConfig, load::RawLog, prepare::PreparedLog, summary::Summary,
    /// };
    ///
    /// let raw = RawLog::parse(
    ///     "date;time\n\
    ///      02/03/2024 10:00;0:10.00\n\
    ///      02/03/2024 10:01;0:12.00\n\
    ///      02/03/2024 10:02;0:08.00\n",
    /// )?;
    /// let log = PreparedLog::prepare(&raw, &SessionConfig::default());
    /// let summary = Summary::collect(&log.all());
    ///
    /// assert_eq!(summary.total, 3);
    /// assert_eq!(summary.mean, Some(10.0));
    /// assert_eq!(summary.best, Some(8.0));
    /// assert_eq!(summary.std_dev, Some(2.0));
    /// # Ok::<(), cubestats_analysis::load::LoadError>(())
    /// ```
    #[must_use]
    pub fn collect(view: &LogView<'_>) -> Self {
        let Some(stats) = DescriptiveStats::new(view.times()) else {
            return Self::default();
        };
        Self {
            total: stats.count,
            mean: Some(stats.mean),
            best: Some(stats.min),
            worst: Some(stats.max),
            median: Some(stats.median),
            std_dev: stats.std_dev,
        }
    }
}

/// Trailing moving average of solve times, aligned with the view's events.
#[must_use]
pub fn moving_average(view: &LogView<'_>, window: usize) -> Vec<Option<f64>> {
    rolling::rolling_mean(&view.times(), window)
}

/// Mean solve time for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourMean {
    pub hour: u32,
    pub count: usize,
    pub mean_time_sec: f64,
}

/// Mean solve time for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayMean {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub count: usize,
    pub mean_time_sec: f64,
}

fn serialize_weekday<S>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(event::weekday_name(*weekday))
}

/// Means for every hour (0–23) that has at least one event.
#[must_use]
pub fn mean_by_hour(view: &LogView<'_>) -> Vec<HourMean> {
    let mut buckets = [(0.0, 0_usize); 24];
    for event in view.iter() {
        let (sum, count) = &mut buckets[event.hour() as usize];
        *sum += event.time_sec();
        *count += 1;
    }
    (0..)
        .zip(buckets)
        .filter_map(|(hour, (sum, count))| {
            Some(HourMean {
                hour,
                count,
                mean_time_sec: bucket_mean(sum, count)?,
            })
        })
        .collect()
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Means for every weekday that has at least one event, Monday first.
#[must_use]
pub fn mean_by_weekday(view: &LogView<'_>) -> Vec<WeekdayMean> {
    let mut buckets = [(0.0, 0_usize); 7];
    for event in view.iter() {
        let (sum, count) = &mut buckets[event.weekday().num_days_from_monday() as usize];
        *sum += event.time_sec();
        *count += 1;
    }
    WEEK.into_iter()
        .zip(buckets)
        .filter_map(|(weekday, (sum, count))| {
            Some(WeekdayMean {
                weekday,
                count,
                mean_time_sec: bucket_mean(sum, count)?,
            })
        })
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn bucket_mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// One bin of the solve-time histogram (`start` inclusive, `end` exclusive).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Histogram of solve times with `bins` main bins over P5–P95 plus tail bins
/// for the values outside it.
#[must_use]
pub fn time_histogram(view: &LogView<'_>, bins: usize) -> Vec<HistogramBucket> {
    Histogram::new(view.times(), bins)
        .bins
        .into_iter()
        .map(|bin| HistogramBucket {
            start: bin.range.start,
            end: bin.range.end,
            count: bin.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::{config::SessionConfig, event::Event, prepare::PreparedLog};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        // 2024-01-01 is a Monday
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn log_of(solves: &[(NaiveDateTime, f64)]) -> PreparedLog {
        let events = solves
            .iter()
            .map(|&(ts, t)| Event::new(ts, Some(t), BTreeMap::new()))
            .collect();
        PreparedLog::from_events(events, &SessionConfig::default())
    }

    #[test]
    fn test_empty_summary() {
        let log = log_of(&[]);
        assert_eq!(Summary::collect(&log.all()), Summary::default());
        assert!(moving_average(&log.all(), 3).is_empty());
        assert!(time_histogram(&log.all(), 10).is_empty());
    }

    #[test]
    fn test_single_event_has_no_std_dev() {
        let log = log_of(&[(at(1, 9), 11.5)]);
        let summary = Summary::collect(&log.all());
        assert_eq!(summary.total, 1);
        assert_eq!(summary.median, Some(11.5));
        assert_eq!(summary.std_dev, None);
    }

    #[test]
    fn test_moving_average() {
        let log = log_of(&[(at(1, 9), 9.0), (at(1, 10), 12.0), (at(1, 11), 15.0)]);
        assert_eq!(
            moving_average(&log.all(), 2),
            vec![None, Some(10.5), Some(13.5)]
        );
    }

    #[test]
    fn test_mean_by_hour() {
        let log = log_of(&[(at(1, 9), 9.0), (at(2, 9), 11.0), (at(2, 21), 14.0)]);
        let hours = mean_by_hour(&log.all());
        assert_eq!(hours.len(), 2);
        assert_eq!((hours[0].hour, hours[0].count, hours[0].mean_time_sec), (9, 2, 10.0));
        assert_eq!((hours[1].hour, hours[1].count, hours[1].mean_time_sec), (21, 1, 14.0));
    }

    #[test]
    fn test_mean_by_weekday_starts_on_monday() {
        let log = log_of(&[(at(7, 9), 13.0), (at(1, 9), 9.0), (at(8, 9), 11.0)]);
        let days = mean_by_weekday(&log.all());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].weekday, Weekday::Mon);
        assert_eq!(days[0].mean_time_sec, 10.0);
        assert_eq!(days[1].weekday, Weekday::Sun);
        let json = serde_json::to_value(&days[1]).unwrap();
        assert_eq!(json["weekday"], "Sunday");
    }

    #[test]
    fn test_histogram_counts_every_event() {
        let solves = (0..40)
            .map(|i| (at(1 + i / 10, i % 10), 8.0 + f64::from(i) * 0.25))
            .collect::<Vec<_>>();
        let log = log_of(&solves);
        let buckets = time_histogram(&log.all(), 8);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 40);
        assert!(buckets.windows(2).all(|w| w[0].end <= w[1].start + 1e-9));
    }
}

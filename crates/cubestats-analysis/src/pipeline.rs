//! One-shot derivation of every output
//!
//! [`run`] is the entry point for presentation layers: it validates the
//! configuration, creates the filtered view, and computes each derived table
//! and series from that single view.

use serde::Serialize;

use crate::{
    config::{ConfigError, PipelineConfig},
    event::Event,
    prepare::PreparedLog,
    session::{self, SessionStats},
    structure::{CrossTabCell, StructureTable},
    summary::{self, HistogramBucket, HourMean, Summary, WeekdayMean},
    threshold::{self, SubXCount},
    trend::{self, TrendLine},
    view::ViewFilter,
    weekly::{ValidWeek, WeeklyTable},
};

/// Every derived output for one filtered view of a log.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub events: Vec<&'a Event>,
    pub summary: Summary,
    /// Aligned with `events`
    pub moving_average: Vec<Option<f64>>,
    /// Aligned with `events`
    pub rolling_sub_x: Vec<Option<f64>>,
    pub sub_x_counts: Vec<SubXCount>,
    pub sessions: Vec<SessionStats>,
    /// Sessions with at least `min_session_size` events
    pub sized_sessions: Vec<SessionStats>,
    pub size_vs_mean_trend: Option<TrendLine>,
    pub size_vs_sub_x_trend: Option<TrendLine>,
    pub weekly: WeeklyTable,
    pub weekly_valid: Vec<ValidWeek>,
    pub structure: StructureTable,
    pub cross_tab: Vec<CrossTabCell>,
    pub weekly_delta_trend: Option<TrendLine>,
    pub hourly: Vec<HourMean>,
    pub weekdays: Vec<WeekdayMean>,
    pub histogram: Vec<HistogramBucket>,
}

/// Derives every output of `log` restricted to `filter`.
///
/// Session ids always come from `log`; if `config.session` differs from the
/// settings `log` was prepared with, the log's settings win and a warning is
/// emitted.
///
/// # Errors
///
/// Returns an error if `config` fails [`PipelineConfig::validate`].
///
/// # Examples
///
/// ```
/// use cubestats_analysis::{
///     config::PipelineConfig, load::RawLog, pipeline, prepare::PreparedLog, view::ViewFilter,
/// };
///
/// let raw = RawLog::parse("date;time\n01/03/2024 10:00;0:10.00\n")?;
/// let config = PipelineConfig::default();
/// let log = PreparedLog::prepare(&raw, &config.session);
///
/// let report = pipeline::run(&log, &config, &ViewFilter::default())?;
/// assert_eq!(report.summary.total, 1);
/// assert!(report.weekly_valid.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<'a>(
    log: &'a PreparedLog,
    config: &PipelineConfig,
    filter: &ViewFilter,
) -> Result<Report<'a>, ConfigError> {
    config.validate()?;
    if log.session_config() != &config.session {
        log::warn!(
            "log was prepared with a session gap of {}s, ignoring configured {}s",
            log.session_config().session_max_gap_sec,
            config.session.session_max_gap_sec
        );
    }

    let view = log.view(filter);
    log::debug!("view holds {} of {} events", view.len(), log.len());

    let sessions = SessionStats::collect(&view, Some(config.sub_x_threshold));
    let sized_sessions = session::filter_min_size(&sessions, config.min_session_size);
    let weekly = WeeklyTable::collect(&view);
    let weekly_valid = weekly.valid();
    let structure = StructureTable::build(&weekly_valid, config.volume_q, config.session_q)?;

    Ok(Report {
        summary: Summary::collect(&view),
        moving_average: summary::moving_average(&view, config.moving_average_window),
        rolling_sub_x: threshold::rolling_sub_x(
            &view,
            config.sub_x_threshold,
            config.rolling_window,
        ),
        sub_x_counts: threshold::sub_x_counts(&view, &config.sub_x_thresholds),
        size_vs_mean_trend: trend::size_vs_mean_trend(&sized_sessions, config.trend_points),
        size_vs_sub_x_trend: trend::size_vs_sub_x_trend(
            &sized_sessions,
            config.decay_factor,
            config.trend_points,
        ),
        weekly_delta_trend: trend::weekly_delta_trend(
            &weekly_valid,
            config.decay_factor,
            config.trend_points,
        ),
        cross_tab: structure.cross_tab(),
        hourly: summary::mean_by_hour(&view),
        weekdays: summary::mean_by_weekday(&view),
        histogram: summary::time_histogram(&view, config.histogram_bins),
        events: view.events().to_vec(),
        sessions,
        sized_sessions,
        weekly,
        weekly_valid,
        structure,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{load::RawLog, view::UnparsedPolicy};

    fn prepare(text: &str, config: &PipelineConfig) -> PreparedLog {
        PreparedLog::prepare(&RawLog::parse(text).unwrap(), &config.session)
    }

    #[test]
    fn test_five_solves_one_session() {
        let config = PipelineConfig::default();
        let log = prepare(
            "Date;Time\n\
             02/04/2024 20:00;0:10.00\n\
             02/04/2024 20:01;0:12.00\n\
             02/04/2024 20:02;0:09.00\n\
             02/04/2024 20:03;0:11.00\n\
             02/04/2024 20:04;0:08.00\n",
            &config,
        );
        let report = run(&log, &config, &ViewFilter::default()).unwrap();

        assert_eq!(report.events.len(), 5);
        assert_eq!(report.sessions.len(), 1);
        assert_eq!(report.sessions[0].size, 5);
        assert_eq!(report.sized_sessions.len(), 1);
        assert_eq!(report.weekly.weeks.len(), 1);
        assert_eq!(report.weekly.weeks[0].median_time_sec, 10.0);
        assert_eq!(report.weekly.weeks[0].week_start.to_string(), "2024-04-01");

        let sub_10 = report
            .sub_x_counts
            .iter()
            .find(|c| c.threshold == 10.0)
            .unwrap();
        assert_eq!(sub_10.count, 2);
        assert_eq!(report.sessions[0].subx_probability, Some(0.4));

        // Too little data for windows, trends and structure
        assert!(report.moving_average.iter().all(Option::is_none));
        assert!(report.size_vs_mean_trend.is_none());
        assert!(report.weekly_valid.is_empty());
        assert!(report.structure.weeks.is_empty());
        assert!(report.weekly_delta_trend.is_none());
    }

    #[test]
    fn test_unparsed_times_are_kept_or_excluded() {
        let config = PipelineConfig::default();
        let log = prepare(
            "date;time\n\
             01/05/2024 10:00;0:10.00\n\
             01/05/2024 10:01;DNF\n\
             01/05/2024 10:02;0:12.00\n",
            &config,
        );

        let kept = run(&log, &config, &ViewFilter::default()).unwrap();
        assert_eq!(kept.summary.total, 3);
        assert_eq!(kept.summary.best, Some(0.0));

        let filter = ViewFilter {
            unparsed: UnparsedPolicy::Exclude,
            ..ViewFilter::default()
        };
        let excluded = run(&log, &config, &filter).unwrap();
        assert_eq!(excluded.summary.total, 2);
        assert_eq!(excluded.summary.best, Some(10.0));
        // Excluding an event never splits its session
        assert_eq!(excluded.sessions.len(), 1);
    }

    #[test]
    fn test_date_filter() {
        let config = PipelineConfig::default();
        let log = prepare(
            "date;time\n\
             01/05/2024 10:00;0:10.00\n\
             02/05/2024 10:00;0:11.00\n\
             03/05/2024 10:00;0:12.00\n",
            &config,
        );
        let filter = ViewFilter {
            from: NaiveDate::from_ymd_opt(2024, 5, 2),
            to: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..ViewFilter::default()
        };
        let report = run(&log, &config, &filter).unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.sessions[0].session_id, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PipelineConfig {
            rolling_window: 0,
            ..PipelineConfig::default()
        };
        let log = prepare("date;time\n01/05/2024 10:00;0:10.00\n", &config);
        assert!(matches!(
            run(&log, &config, &ViewFilter::default()),
            Err(ConfigError::ZeroCount {
                field: "rolling_window"
            })
        ));
    }

    #[test]
    fn test_multi_week_report() {
        let config = PipelineConfig {
            min_session_size: 2,
            ..PipelineConfig::default()
        };
        let mut text = String::from("date;time\n");
        for day in 1..=28 {
            for minute in 0..(day % 4 + 2) {
                let seconds = 14 - day / 4 + minute % 3;
                text.push_str(&format!("{day:02}/02/2024 19:{minute:02};0:{seconds:02}.50\n"));
            }
        }
        let log = prepare(&text, &config);
        let report = run(&log, &config, &ViewFilter::default()).unwrap();

        assert_eq!(report.weekly.total_volume(), report.events.len());
        assert_eq!(report.sessions.len(), 28);
        assert!(!report.weekly_valid.is_empty());
        assert_eq!(report.structure.weeks.len(), report.weekly_valid.len());
        assert!(report.size_vs_mean_trend.is_some());
        assert_eq!(
            report.size_vs_mean_trend.as_ref().unwrap().samples.len(),
            config.trend_points
        );
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["events"].as_array().is_some_and(|e| !e.is_empty()));
    }
}

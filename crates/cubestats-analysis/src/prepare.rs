//! Base preparation of solve logs
//!
//! [`PreparedLog::prepare`] turns a [`RawLog`] into typed [`Event`]s:
//!
//! 1. Parse the day-first timestamp and the `MM:SS` solve time
//! 2. Sort ascending by timestamp (stable, so equal timestamps keep file order)
//! 3. Derive calendar fields (done by [`Event::new`])
//! 4. Assign session ids with a single left-to-right gap scan
//!
//! # Sessions
//!
//! A gap is the time between an event and its predecessor in sorted order.
//! Whenever a gap is strictly longer than
//! [`SessionConfig::session_max_gap_sec`] a new session starts; the session id
//! is the number of such boundaries seen so far, so the first event is always
//! in session 0 and ids grow by exactly one per boundary:
//!
//! ```text
//! gaps (s)     -   10  400    5
//! session id   0    0    1    1     (max gap 300 s)
//! ```
//!
//! Sessions are assigned on the complete log only. Date-range filtering
//! happens afterwards through [`PreparedLog::view`], which borrows the events
//! and cannot reassign sessions, so a session cut by a filter boundary keeps
//! its id.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{
    config::SessionConfig,
    duration,
    event::{Event, SessionId},
    load::RawLog,
    view::{LogView, ViewFilter},
};

/// A sorted, session-assigned solve log.
#[derive(Debug, Clone)]
pub struct PreparedLog {
    events: Vec<Event>,
    session: SessionConfig,
}

impl PreparedLog {
    /// Prepares a raw solve log.
    ///
    /// Unparsable solve times become `0.0` seconds with
    /// [`Event::time_parsed`] unset. Unparsable timestamps are treated as zero
    /// (the Unix epoch) and reported with a warning.
    #[must_use]
    pub fn prepare(raw: &RawLog, session: &SessionConfig) -> Self {
        let mut bad_dates = 0_usize;
        let events = raw
            .records
            .iter()
            .map(|record| {
                let timestamp = parse_timestamp(&record.date).unwrap_or_else(|| {
                    bad_dates += 1;
                    log::warn!(
                        "line {}: unparsable date {:?}, treating as epoch",
                        record.line,
                        record.date
                    );
                    DateTime::UNIX_EPOCH.naive_utc()
                });
                let time_sec = record.time.as_deref().and_then(duration::parse_mmss);
                Event::new(timestamp, time_sec, record.extra.clone())
            })
            .collect();
        if bad_dates > 0 {
            log::warn!("{bad_dates} records had unparsable dates");
        }
        Self::from_events(events, session)
    }

    /// Sorts already typed events and (re)assigns their session ids.
    ///
    /// Running this on the events of an existing `PreparedLog` with the same
    /// settings yields the same order and ids.
    #[must_use]
    pub fn from_events(mut events: Vec<Event>, session: &SessionConfig) -> Self {
        events.sort_by_key(Event::timestamp);
        let sessions = assign_sessions(&mut events, session.session_max_gap_sec);
        let unparsed = events.iter().filter(|e| !e.time_parsed()).count();
        log::debug!(
            "prepared {} events in {sessions} sessions ({unparsed} unparsed times)",
            events.len()
        );
        Self {
            events,
            session: session.clone(),
        }
    }

    /// Events in ascending timestamp order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Session settings the ids were assigned with.
    #[must_use]
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First and last calendar date in the log.
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.events.first()?.timestamp().date();
        let last = self.events.last()?.timestamp().date();
        Some((first, last))
    }

    /// A view over every event.
    #[must_use]
    pub fn all(&self) -> LogView<'_> {
        LogView::new(self.events.iter().collect())
    }

    /// A filtered view; session ids are those of the complete log.
    #[must_use]
    pub fn view(&self, filter: &ViewFilter) -> LogView<'_> {
        LogView::new(self.events.iter().filter(|e| filter.accepts(e)).collect())
    }
}

/// Assigns session ids in place and returns the number of sessions.
fn assign_sessions(events: &mut [Event], max_gap_sec: f64) -> usize {
    let mut session_id: SessionId = 0;
    let mut prev: Option<NaiveDateTime> = None;
    for event in events.iter_mut() {
        if let Some(prev) = prev
            && gap_seconds(prev, event.timestamp()) > max_gap_sec
        {
            session_id += 1;
        }
        event.set_session_id(session_id);
        prev = Some(event.timestamp());
    }
    if events.is_empty() { 0 } else { session_id + 1 }
}

#[expect(clippy::cast_precision_loss)]
fn gap_seconds(prev: NaiveDateTime, next: NaiveDateTime) -> f64 {
    (next - prev).num_milliseconds() as f64 / 1000.0
}

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Parses a day-first timestamp, with or without a time of day.
///
/// ISO `yyyy-mm-dd` dates are accepted as well; a date without a time is
/// taken at midnight.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cubestats_analysis::prepare::parse_timestamp;
///
/// let ts = parse_timestamp("03/04/2024 17:05:09").unwrap();
/// assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
///
/// let midnight = parse_timestamp("2024-04-03").unwrap();
/// assert_eq!(midnight, ts.date().and_hms_opt(0, 0, 0).unwrap());
///
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::{load::RawLog, view::UnparsedPolicy};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn events_at(offsets_sec: &[i64]) -> Vec<Event> {
        offsets_sec
            .iter()
            .map(|&s| Event::new(base() + Duration::seconds(s), Some(10.0), BTreeMap::new()))
            .collect()
    }

    fn session_ids(log: &PreparedLog) -> Vec<SessionId> {
        log.events().iter().map(Event::session_id).collect()
    }

    #[test]
    fn test_session_boundaries() {
        // gaps: -, 10, 400, 5
        let log = PreparedLog::from_events(
            events_at(&[0, 10, 410, 415]),
            &SessionConfig {
                session_max_gap_sec: 300.0,
            },
        );
        assert_eq!(session_ids(&log), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_gap_equal_to_threshold_stays_in_session() {
        let log = PreparedLog::from_events(
            events_at(&[0, 300, 601]),
            &SessionConfig {
                session_max_gap_sec: 300.0,
            },
        );
        assert_eq!(session_ids(&log), vec![0, 0, 1]);
    }

    #[test]
    fn test_sorts_before_assigning() {
        let log = PreparedLog::from_events(
            events_at(&[1000, 0, 20]),
            &SessionConfig {
                session_max_gap_sec: 300.0,
            },
        );
        let offsets = log
            .events()
            .iter()
            .map(|e| (e.timestamp() - base()).num_seconds())
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 20, 1000]);
        assert_eq!(session_ids(&log), vec![0, 0, 1]);
    }

    #[test]
    fn test_session_ids_are_monotonic() {
        let offsets = (0..200).map(|i| i * i).collect::<Vec<i64>>();
        let log = PreparedLog::from_events(events_at(&offsets), &SessionConfig::default());
        for pair in log.events().windows(2) {
            let step = pair[1].session_id() - pair[0].session_id();
            let gap = (pair[1].timestamp() - pair[0].timestamp()).num_seconds();
            assert_eq!(step, usize::from(gap > 300));
        }
    }

    #[test]
    fn test_preparation_is_idempotent() {
        let config = SessionConfig {
            session_max_gap_sec: 60.0,
        };
        let once = PreparedLog::from_events(events_at(&[500, 0, 30, 90, 95, 4000]), &config);
        let twice = PreparedLog::from_events(once.clone().into_events(), &config);
        assert_eq!(once.events(), twice.events());
    }

    #[test]
    fn test_prepare_from_raw_log() {
        let raw = RawLog::parse(
            "Date;Time;Comment\n\
             06/05/2024 18:10:00;0:12.00;b\n\
             06/05/2024 18:00:00;0:10.50;a\n\
             not a date;bad;c\n",
        )
        .unwrap();
        let log = PreparedLog::prepare(&raw, &SessionConfig::default());
        let events = log.events();
        assert_eq!(events.len(), 3);
        // epoch sorts first
        assert_eq!(events[0].year(), 1970);
        assert!(!events[0].time_parsed());
        assert_eq!(events[1].time_sec(), 10.5);
        assert_eq!(events[1].extra()["comment"], "a");
        assert_eq!(events[1].session_id(), 1);
        assert_eq!(events[2].session_id(), 2);
    }

    #[test]
    fn test_filter_keeps_original_session_ids() {
        let day = 86_400;
        let log = PreparedLog::from_events(
            events_at(&[0, 60, day, day + 60, 2 * day]),
            &SessionConfig::default(),
        );
        let second_day = base().date() + Duration::days(1);
        let view = log.view(&ViewFilter {
            from: Some(second_day),
            to: Some(second_day),
            unparsed: UnparsedPolicy::Keep,
        });
        let ids = view.iter().map(Event::session_id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 1]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(9, 8, 0)
            .unwrap();
        for s in [
            "01/12/2024 09:08",
            "01/12/2024 09:08:00",
            "01-12-2024 09:08:00.000",
            "01.12.2024 09:08",
            "2024-12-01 09:08:00",
            "2024-12-01T09:08:00",
        ] {
            assert_eq!(parse_timestamp(s), Some(expected), "format {s:?}");
        }
    }
}

//! Typed solve events
//!
//! An [`Event`] is one solve attempt. Calendar fields are derived from the
//! timestamp when the event is created and can never drift from it; the only
//! field assigned later is the session id, and only by
//! [`PreparedLog`](crate::prepare::PreparedLog).

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

/// Identifier of a session; the first session of a log is 0.
pub type SessionId = usize;

/// One solve attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    timestamp: NaiveDateTime,
    time_sec: f64,
    time_parsed: bool,
    year: i32,
    hour: u32,
    #[serde(serialize_with = "serialize_weekday")]
    weekday: Weekday,
    week_start: NaiveDate,
    session_id: SessionId,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, String>,
}

impl Event {
    /// Creates an event with derived calendar fields and session id 0.
    ///
    /// `time_sec` is the parsed solve time; `None` marks an unparsable time,
    /// which is stored as `0.0` seconds with [`Event::time_parsed`] unset.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        time_sec: Option<f64>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        Self {
            timestamp,
            time_sec: time_sec.unwrap_or(0.0),
            time_parsed: time_sec.is_some(),
            year: timestamp.year(),
            hour: timestamp.hour(),
            weekday: timestamp.weekday(),
            week_start: week_start(timestamp.date()),
            session_id: 0,
            extra,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Solve time in seconds (`0.0` if the time could not be parsed).
    #[must_use]
    pub fn time_sec(&self) -> f64 {
        self.time_sec
    }

    /// Whether the exported time string parsed successfully.
    #[must_use]
    pub fn time_parsed(&self) -> bool {
        self.time_parsed
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Full English weekday name, e.g. `"Monday"`.
    #[must_use]
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Monday of the week containing the event.
    #[must_use]
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub(crate) fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = session_id;
    }

    /// Columns of the source log that the pipeline does not interpret.
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Monday of the ISO week containing `date`.
///
/// ```
/// use chrono::NaiveDate;
/// use cubestats_analysis::event::week_start;
///
/// let sunday = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
/// assert_eq!(week_start(sunday), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
/// ```
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Full English name of a weekday.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn serialize_weekday<S>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(weekday_name(*weekday))
}

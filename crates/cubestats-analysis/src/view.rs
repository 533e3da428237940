//! Filtered views over a prepared log
//!
//! Every aggregation in this crate takes a [`LogView`]. A view can only be
//! obtained from a [`PreparedLog`](crate::prepare::PreparedLog), so session
//! ids are guaranteed to come from the complete, unfiltered log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// How events whose solve time failed to parse are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnparsedPolicy {
    /// Keep them as `0.0`-second solves
    #[default]
    Keep,
    /// Leave them out of every aggregate
    Exclude,
}

/// Selection applied when creating a [`LogView`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// First calendar day to include
    pub from: Option<NaiveDate>,
    /// Last calendar day to include
    pub to: Option<NaiveDate>,
    pub unparsed: UnparsedPolicy,
}

impl ViewFilter {
    /// Whether `event` passes the filter.
    #[must_use]
    pub fn accepts(&self, event: &Event) -> bool {
        let date = event.timestamp().date();
        self.from.is_none_or(|from| from <= date)
            && self.to.is_none_or(|to| date <= to)
            && (self.unparsed == UnparsedPolicy::Keep || event.time_parsed())
    }
}

/// Borrowed, timestamp-ordered subset of a prepared log.
#[derive(Debug, Clone)]
pub struct LogView<'a> {
    events: Vec<&'a Event>,
}

impl<'a> LogView<'a> {
    pub(crate) fn new(events: Vec<&'a Event>) -> Self {
        debug_assert!(
            events.is_sorted_by_key(|e| e.timestamp()),
            "views must preserve timestamp order"
        );
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &[&'a Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().copied()
    }

    /// Solve times in timestamp order.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.iter().map(Event::time_sec).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn event(day: u32, time_sec: Option<f64>) -> Event {
        let ts = NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        Event::new(ts, time_sec, BTreeMap::new())
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = ViewFilter {
            from: NaiveDate::from_ymd_opt(2024, 2, 2),
            to: NaiveDate::from_ymd_opt(2024, 2, 3),
            ..ViewFilter::default()
        };
        assert!(!filter.accepts(&event(1, Some(1.0))));
        assert!(filter.accepts(&event(2, Some(1.0))));
        assert!(filter.accepts(&event(3, Some(1.0))));
        assert!(!filter.accepts(&event(4, Some(1.0))));
    }

    #[test]
    fn test_unparsed_policy() {
        let unparsed = event(1, None);
        assert!(ViewFilter::default().accepts(&unparsed));
        let exclude = ViewFilter {
            unparsed: UnparsedPolicy::Exclude,
            ..ViewFilter::default()
        };
        assert!(!exclude.accepts(&unparsed));
        assert!(exclude.accepts(&event(1, Some(0.0))));
    }
}

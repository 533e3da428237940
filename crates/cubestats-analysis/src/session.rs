//! Per-session statistics
//!
//! Groups the events of a view by session id. Because views are in timestamp
//! order and session ids never decrease along that order, each session is a
//! contiguous run of the view.

use chrono::NaiveDateTime;
use cubestats_stats::descriptive;
use serde::Serialize;

use crate::{
    event::{Event, SessionId},
    threshold,
    view::LogView,
};

/// Statistics of one session (restricted to the events in the view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub session_id: SessionId,
    /// Number of events
    pub size: usize,
    /// Mean solve time in seconds
    pub mean_time_sec: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Fraction of solves strictly below the threshold, if one was given
    pub subx_probability: Option<f64>,
}

impl SessionStats {
    /// Computes statistics for every session present in `view`, in id order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::{
    ///     config::SessionConfig, load::RawLog, prepare::PreparedLog, session::SessionStats,
    /// };
    ///
    /// let raw = RawLog::parse(
    ///     "date;time\n\
    ///      01/03/2024 10:00:00;0:09.00\n\
    ///      01/03/2024 10:01:00;0:11.00\n\
    ///      01/03/2024 15:00:00;0:12.00\n",
    /// )?;
    /// let log = PreparedLog::prepare(&raw, &SessionConfig::default());
    /// let sessions = SessionStats::collect(&log.all(), Some(10.0));
    ///
    /// assert_eq!(sessions.len(), 2);
    /// assert_eq!(sessions[0].size, 2);
    /// assert_eq!(sessions[0].mean_time_sec, 10.0);
    /// assert_eq!(sessions[0].subx_probability, Some(0.5));
    /// assert_eq!(sessions[1].subx_probability, Some(0.0));
    /// # Ok::<(), cubestats_analysis::load::LoadError>(())
    /// ```
    #[must_use]
    pub fn collect(view: &LogView<'_>, threshold: Option<f64>) -> Vec<Self> {
        let sessions = view
            .events()
            .chunk_by(|a, b| a.session_id() == b.session_id())
            .filter_map(|run| Self::from_run(run, threshold))
            .collect::<Vec<_>>();
        log::debug!("collected {} sessions", sessions.len());
        sessions
    }

    fn from_run(run: &[&Event], threshold: Option<f64>) -> Option<Self> {
        let first = run.first()?;
        let last = run.last()?;
        let times = run.iter().map(|e| e.time_sec()).collect::<Vec<_>>();
        Some(Self {
            session_id: first.session_id(),
            size: run.len(),
            mean_time_sec: descriptive::mean(times.iter().copied())?,
            start: first.timestamp(),
            end: last.timestamp(),
            subx_probability: threshold.and_then(|t| threshold::fraction_below(&times, t)),
        })
    }
}

/// Keeps the sessions with at least `min_size` events.
#[must_use]
pub fn filter_min_size(sessions: &[SessionStats], min_size: usize) -> Vec<SessionStats> {
    sessions
        .iter()
        .filter(|s| s.size >= min_size)
        .cloned()
        .collect()
}

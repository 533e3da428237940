//! Pipeline configuration
//!
//! Every tunable of the derivation pipeline lives in [`PipelineConfig`]. The
//! struct deserializes from JSON with all fields optional, so a config file
//! only needs to mention the values it changes:
//!
//! ```json
//! {
//!   "session": { "session_max_gap_sec": 600 },
//!   "sub_x_threshold": 12.0
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Settings that affect session assignment during preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// A gap strictly longer than this many seconds starts a new session
    pub session_max_gap_sec: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_max_gap_sec: 300.0,
        }
    }
}

/// Settings for every derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub session: SessionConfig,
    /// Window of the solve-time moving average
    pub moving_average_window: usize,
    /// Window of the rolling sub-X probability
    pub rolling_window: usize,
    /// Threshold (seconds) for session and rolling sub-X probabilities
    pub sub_x_threshold: f64,
    /// Thresholds (seconds) for the global sub-X counts
    pub sub_x_thresholds: Vec<f64>,
    /// Number of weekly volume tiers
    pub volume_q: usize,
    /// Number of weekly fragmentation tiers (at most 3)
    pub session_q: usize,
    /// Sessions smaller than this are left out of session trends
    pub min_session_size: usize,
    /// Exponential decay per day of recency for weighted trends
    pub decay_factor: f64,
    /// Number of samples along each trend line
    pub trend_points: usize,
    /// Number of main bins of the solve-time histogram
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            moving_average_window: 100,
            rolling_window: 100,
            sub_x_threshold: 10.0,
            sub_x_thresholds: (6..=15).map(f64::from).collect(),
            volume_q: 4,
            session_q: 3,
            min_session_size: 5,
            decay_factor: 0.01,
            trend_points: 100,
            histogram_bins: 50,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("`{field}` must be at least 1")]
    ZeroCount { field: &'static str },
    #[display("`session_q` must be at most {max} (got {value})")]
    TooManyFragmentationTiers { value: usize, max: usize },
    #[display("`{field}` must be a finite non-negative number (got {value})")]
    InvalidNumber { field: &'static str, value: f64 },
}

impl PipelineConfig {
    /// Checks that every value is usable by the pipeline.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubestats_analysis::config::PipelineConfig;
    ///
    /// assert!(PipelineConfig::default().validate().is_ok());
    ///
    /// let config = PipelineConfig { session_q: 4, ..PipelineConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("moving_average_window", self.moving_average_window),
            ("rolling_window", self.rolling_window),
            ("volume_q", self.volume_q),
            ("session_q", self.session_q),
            ("trend_points", self.trend_points),
            ("histogram_bins", self.histogram_bins),
        ];
        if let Some(&(field, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroCount { field });
        }
        check_fragmentation_tiers(self.session_q)?;

        let numbers = [
            ("session_max_gap_sec", self.session.session_max_gap_sec),
            ("sub_x_threshold", self.sub_x_threshold),
            ("decay_factor", self.decay_factor),
        ]
        .into_iter()
        .chain(
            self.sub_x_thresholds
                .iter()
                .map(|&value| ("sub_x_thresholds", value)),
        );
        for (field, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        Ok(())
    }
}

pub(crate) fn check_fragmentation_tiers(session_q: usize) -> Result<(), ConfigError> {
    let max = crate::structure::Fragmentation::ALL.len();
    if session_q > max {
        return Err(ConfigError::TooManyFragmentationTiers {
            value: session_q,
            max,
        });
    }
    Ok(())
}

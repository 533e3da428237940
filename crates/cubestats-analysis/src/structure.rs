//! Weekly training-structure bins
//!
//! Each valid week is classified along two axes using quantile bins computed
//! from the weeks themselves:
//!
//! - **Volume** (`volume`): `Q1`, `Q2`, ... up to `volume_q` tiers
//! - **Fragmentation** (`n_sessions`): [`Fragmentation::Low`], `Mid`, `High`
//!
//! Bin labels embed the whole-number range they cover (lower edge floored,
//! upper edge ceiled), e.g. `Q2 31–58` or `Mid Frag 3–5`. Where quantile
//! edges coincide the duplicate is dropped, so fewer tiers than requested can
//! appear. Ordering of bins is structural: [`VolumeBin`] and [`SessionBin`]
//! order by tier, never by label text.

use std::fmt;

use cubestats_stats::{binning::QuantileBins, descriptive};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    config::{self, ConfigError},
    weekly::ValidWeek,
};

/// Volume tier of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolumeBin {
    /// 0-based tier; displayed as `Q{ordinal + 1}`
    pub ordinal: usize,
    pub low: i64,
    pub high: i64,
}

impl fmt::Display for VolumeBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}–{}", self.ordinal + 1, self.low, self.high)
    }
}

/// Session-fragmentation level of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fragmentation {
    Low,
    Mid,
    High,
}

impl Fragmentation {
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "Low Frag",
            Self::Mid => "Mid Frag",
            Self::High => "High Frag",
        }
    }
}

impl fmt::Display for Fragmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

/// Fragmentation tier of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionBin {
    pub level: Fragmentation,
    pub low: i64,
    pub high: i64,
}

impl fmt::Display for SessionBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}–{}", self.level, self.low, self.high)
    }
}

macro_rules! serialize_with_label {
    ($ty:ty, $name:literal, $tier:ident) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut s = serializer.serialize_struct($name, 4)?;
                s.serialize_field("tier", &self.$tier)?;
                s.serialize_field("low", &self.low)?;
                s.serialize_field("high", &self.high)?;
                s.serialize_field("label", &self.to_string())?;
                s.end()
            }
        }
    };
}

serialize_with_label!(VolumeBin, "VolumeBin", ordinal);
serialize_with_label!(SessionBin, "SessionBin", level);

impl Serialize for Fragmentation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// A valid week together with its two bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStructure {
    #[serde(flatten)]
    pub week: ValidWeek,
    pub volume_bin: VolumeBin,
    pub session_bin: SessionBin,
}

/// One cell of the volume × fragmentation cross tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabCell {
    pub volume_bin: VolumeBin,
    pub session_bin: SessionBin,
    /// Weeks falling in this cell
    pub weeks: usize,
    /// Mean week-over-week improvement of those weeks, in percent
    pub mean_delta_pct: Option<f64>,
}

/// Valid weeks classified into volume and fragmentation tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureTable {
    /// Volume tiers in ascending order
    pub volume_bins: Vec<VolumeBin>,
    /// Fragmentation tiers in ascending order
    pub session_bins: Vec<SessionBin>,
    pub weeks: Vec<WeekStructure>,
}

impl StructureTable {
    /// Bins `valid` weeks into at most `volume_q` volume tiers and
    /// `session_q` fragmentation tiers.
    ///
    /// Every week receives exactly one bin of each kind. An empty input
    /// yields an empty table.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Days, NaiveDate};
    /// use cubestats_analysis::{structure::StructureTable, weekly::ValidWeek};
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let weeks = (0..8_u32)
    ///     .map(|i| ValidWeek {
    ///         week_start: monday + Days::new(7 * u64::from(i)),
    ///         volume: 10 * (i as usize + 1),
    ///         median_time_sec: 12.0,
    ///         n_sessions: i as usize % 3 + 1,
    ///         prev_week_median: 12.5,
    ///         delta_pct: Some(4.0),
    ///     })
    ///     .collect::<Vec<_>>();
    ///
    /// let table = StructureTable::build(&weeks, 4, 3)?;
    /// assert_eq!(table.volume_bins.len(), 4);
    /// assert_eq!(table.volume_bins[0].to_string(), "Q1 10–28");
    /// assert_eq!(table.weeks.len(), 8);
    /// # Ok::<(), cubestats_analysis::config::ConfigError>(())
    /// ```
    pub fn build(
        valid: &[ValidWeek],
        volume_q: usize,
        session_q: usize,
    ) -> Result<Self, ConfigError> {
        if volume_q == 0 {
            return Err(ConfigError::ZeroCount { field: "volume_q" });
        }
        if session_q == 0 {
            return Err(ConfigError::ZeroCount { field: "session_q" });
        }
        config::check_fragmentation_tiers(session_q)?;

        #[expect(clippy::cast_precision_loss)]
        let volumes = valid.iter().map(|w| w.volume as f64).collect::<Vec<_>>();
        #[expect(clippy::cast_precision_loss)]
        let sessions = valid.iter().map(|w| w.n_sessions as f64).collect::<Vec<_>>();
        let (Some(volume_edges), Some(session_edges)) = (
            QuantileBins::new(&volumes, volume_q),
            QuantileBins::new(&sessions, session_q),
        ) else {
            return Ok(Self::default());
        };

        let volume_bins = volume_edges
            .bins()
            .map(|bin| {
                let (low, high) = whole_range(bin.start, bin.end);
                VolumeBin {
                    ordinal: bin.ordinal,
                    low,
                    high,
                }
            })
            .collect::<Vec<_>>();
        let session_bins = session_edges
            .bins()
            .zip(Fragmentation::ALL)
            .map(|(bin, level)| {
                let (low, high) = whole_range(bin.start, bin.end);
                SessionBin { level, low, high }
            })
            .collect::<Vec<_>>();

        let weeks = valid
            .iter()
            .zip(volumes.iter().zip(&sessions))
            .filter_map(|(week, (&volume, &n_sessions))| {
                // Every value lies within the edges computed from the same data
                let volume_bin = volume_bins[volume_edges.bin_of(volume)?];
                let session_bin = session_bins[session_edges.bin_of(n_sessions)?];
                Some(WeekStructure {
                    week: week.clone(),
                    volume_bin,
                    session_bin,
                })
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(weeks.len(), valid.len());

        log::debug!(
            "binned {} weeks into {} volume and {} fragmentation tiers",
            weeks.len(),
            volume_bins.len(),
            session_bins.len()
        );
        Ok(Self {
            volume_bins,
            session_bins,
            weeks,
        })
    }

    /// Cross-tabulates week counts and mean `delta_pct` for every
    /// (volume, fragmentation) pair, in tier order.
    #[must_use]
    pub fn cross_tab(&self) -> Vec<CrossTabCell> {
        self.volume_bins
            .iter()
            .flat_map(|&volume_bin| {
                self.session_bins.iter().map(move |&session_bin| {
                    let cell = self
                        .weeks
                        .iter()
                        .filter(|w| w.volume_bin == volume_bin && w.session_bin == session_bin)
                        .collect::<Vec<_>>();
                    CrossTabCell {
                        volume_bin,
                        session_bin,
                        weeks: cell.len(),
                        mean_delta_pct: descriptive::mean(
                            cell.iter().filter_map(|w| w.week.delta_pct),
                        ),
                    }
                })
            })
            .collect()
    }
}

#[expect(clippy::cast_possible_truncation)]
fn whole_range(start: f64, end: f64) -> (i64, i64) {
    (start.floor() as i64, end.ceil() as i64)
}

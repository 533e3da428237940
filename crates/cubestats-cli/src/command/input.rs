//! Arguments and loading shared by every command

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use cubestats_analysis::{
    cache::LogCache,
    config::PipelineConfig,
    pipeline::{self, Report},
    prepare::{self, PreparedLog},
    view::{UnparsedPolicy, ViewFilter},
};

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to the semicolon-delimited solve log
    pub log: PathBuf,

    /// JSON file overriding pipeline defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First day to include (e.g. 01/02/2024 or 2024-02-01)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day to include
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Leave out solves whose time could not be parsed instead of counting
    /// them as 0 seconds
    #[arg(long)]
    pub exclude_unparsed: bool,

    /// Maximum gap in seconds between solves of one session
    #[arg(long)]
    pub gap: Option<f64>,
}

/// A prepared log with the configuration and filter to derive it with.
#[derive(Debug)]
pub(crate) struct Input {
    pub log: PreparedLog,
    pub config: PipelineConfig,
    pub filter: ViewFilter,
}

impl Input {
    pub fn report(&self) -> anyhow::Result<Report<'_>> {
        let report = pipeline::run(&self.log, &self.config, &self.filter)
            .context("Invalid pipeline configuration")?;
        log::info!(
            "derived {} sessions and {} weeks from {} solves",
            report.sessions.len(),
            report.weekly.weeks.len(),
            report.events.len()
        );
        Ok(report)
    }
}

impl InputArg {
    /// Load the log and resolve the configuration, applying `adjust` to the
    /// configuration after the shared flags
    pub fn load_with<F>(&self, adjust: F) -> anyhow::Result<Input>
    where
        F: FnOnce(&mut PipelineConfig),
    {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(gap) = self.gap {
            config.session.session_max_gap_sec = gap;
        }
        adjust(&mut config);
        config.validate().context("Invalid pipeline configuration")?;

        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            anyhow::bail!("--from ({from}) is after --to ({to})");
        }

        let mut cache = LogCache::new();
        let raw = cache
            .get_or_load(&self.log)
            .with_context(|| format!("Failed to load solve log: {}", self.log.display()))?;
        log::info!(
            "loaded {} records from {}",
            raw.records.len(),
            self.log.display()
        );

        let log = PreparedLog::prepare(&raw, &config.session);
        if let Some((first, last)) = log.date_bounds() {
            log::info!("log spans {first} to {last}");
        }

        let filter = ViewFilter {
            from: self.from,
            to: self.to,
            unparsed: if self.exclude_unparsed {
                UnparsedPolicy::Exclude
            } else {
                UnparsedPolicy::Keep
            },
        };
        Ok(Input {
            log,
            config,
            filter,
        })
    }

    pub fn load(&self) -> anyhow::Result<Input> {
        self.load_with(|_| {})
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    prepare::parse_timestamp(s)
        .map(|ts| ts.date())
        .ok_or_else(|| format!("unrecognized date `{s}`"))
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write as _};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cubestats-cli-{}-{name}", std::process::id()))
    }

    fn arg_for(log: PathBuf) -> InputArg {
        InputArg {
            log,
            config: None,
            from: None,
            to: None,
            exclude_unparsed: false,
            gap: None,
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("15/03/2024").unwrap().to_string(), "2024-03-15");
        assert_eq!(parse_date("2024-03-15").unwrap().to_string(), "2024-03-15");
        assert!(parse_date("next week").is_err());
    }

    #[test]
    fn test_load_applies_overrides() {
        let log_path = temp_path("overrides.csv");
        let config_path = temp_path("overrides.json");
        let mut file = fs::File::create(&log_path).unwrap();
        writeln!(file, "Date;Time").unwrap();
        writeln!(file, "01/03/2024 10:00:00;0:10.00").unwrap();
        writeln!(file, "01/03/2024 10:08:00;0:11.00").unwrap();
        fs::write(&config_path, r#"{"volume_q": 2}"#).unwrap();

        let mut arg = arg_for(log_path.clone());
        arg.config = Some(config_path.clone());
        arg.gap = Some(600.0);
        arg.exclude_unparsed = true;
        let input = arg.load_with(|c| c.min_session_size = 1).unwrap();

        assert_eq!(input.config.volume_q, 2);
        assert_eq!(input.config.min_session_size, 1);
        assert_eq!(input.filter.unparsed, UnparsedPolicy::Exclude);
        // 8 minute gap fits within 600 seconds
        let report = input.report().unwrap();
        assert_eq!(report.sessions.len(), 1);

        fs::remove_file(log_path).unwrap();
        fs::remove_file(config_path).unwrap();
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let mut arg = arg_for(temp_path("never-read.csv"));
        arg.from = parse_date("2024-03-02").ok();
        arg.to = parse_date("2024-03-01").ok();
        assert!(arg.load().is_err());
    }

    #[test]
    fn test_missing_log_is_an_error() {
        assert!(arg_for(temp_path("missing.csv")).load().is_err());
    }
}

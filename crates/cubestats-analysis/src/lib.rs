//! Solve-log analytics for speedcubing practice
//!
//! This crate turns a timer export (one row per solve) into the derived
//! tables a dashboard needs: sessions, weekly aggregates, training-structure
//! bins, sub-X probabilities and trend lines.
//!
//! # Overview
//!
//! Data flows through three stages:
//!
//! 1. **Load** ([`load::RawLog`], [`cache::LogCache`]): read the
//!    semicolon-delimited file once, keeping every row as text
//! 2. **Prepare** ([`prepare::PreparedLog`]): parse timestamps and solve
//!    times, sort by time and assign session ids over the *complete* log
//! 3. **Derive** ([`view::LogView`] and the aggregators): filter by date range
//!    and compute each output from the filtered view
//!
//! Session ids are only ever assigned in stage 2. A date filter therefore
//! cannot split or merge sessions, no matter which range is selected.
//!
//! # Modules
//!
//! - [`duration`]: `MM:SS.fraction` solve-time parsing
//! - [`load`], [`cache`]: reading and caching raw logs
//! - [`event`], [`prepare`], [`view`]: typed events, preparation, filtering
//! - [`session`], [`weekly`], [`structure`]: grouped aggregates
//! - [`threshold`], [`trend`], [`summary`]: probabilities, fits, headline metrics
//! - [`pipeline`]: every output at once, for presentation layers
//! - [`config`]: tunables of the whole pipeline
//!
//! # Example
//!
//! ```
//! use cubestats_analysis::{
//!     config::PipelineConfig, load::RawLog, pipeline, prepare::PreparedLog, view::ViewFilter,
//! };
//!
//! let raw = RawLog::parse(
//!     "date;time\n\
//!      02/04/2024 20:00;0:10.00\n\
//!      02/04/2024 20:01;0:12.00\n\
//!      02/04/2024 20:02;0:09.00\n\
//!      02/04/2024 20:03;0:11.00\n\
//!      02/04/2024 20:04;0:08.00\n",
//! )?;
//! let config = PipelineConfig::default();
//! let log = PreparedLog::prepare(&raw, &config.session);
//! let report = pipeline::run(&log, &config, &ViewFilter::default())?;
//!
//! assert_eq!(report.sessions.len(), 1);
//! assert_eq!(report.weekly.weeks[0].median_time_sec, 10.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod duration;
pub mod event;
pub mod load;
pub mod pipeline;
pub mod prepare;
pub mod session;
pub mod structure;
pub mod summary;
pub mod threshold;
pub mod trend;
pub mod view;
pub mod weekly;

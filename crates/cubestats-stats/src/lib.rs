//! Statistical building blocks for the cubestats workspace.
//!
//! This crate is free of any solve-log vocabulary; it provides:
//!
//! - **Descriptive statistics**: mean, median, sample standard deviation
//! - **Quantiles**: linear-interpolation quantiles of a dataset
//! - **Quantile binning**: equal-frequency bins with duplicate-edge collapse
//! - **Histograms**: P5–P95 histograms with tail bins
//! - **Rolling windows**: trailing means and hit fractions
//! - **Regression**: weighted and ordinary degree-1 least squares
//!
//! # Modules
//!
//! - [`descriptive`]: Summaries of a dataset
//! - [`quantile`]: Quantile computation and storage
//! - [`binning`]: Equal-frequency bins computed from data
//! - [`histogram`]: Frequency distributions
//! - [`rolling`]: Trailing window statistics
//! - [`regression`]: Line fitting and sampling
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cubestats_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([10.0, 12.0, 9.0, 11.0, 8.0]).unwrap();
//! assert_eq!(stats.median, 10.0);
//! assert_eq!(stats.min, 8.0);
//! ```
//!
//! ## Fitting a trend
//!
//! ```
//! use cubestats_stats::regression::{LinearFit, linspace};
//!
//! let fit = LinearFit::ordinary(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
//! let line = linspace(1.0, 3.0, 3)
//!     .into_iter()
//!     .map(|x| (x, fit.predict(x)))
//!     .collect::<Vec<_>>();
//! assert_eq!(line.len(), 3);
//! ```

pub mod binning;
pub mod descriptive;
pub mod histogram;
pub mod quantile;
pub mod regression;
pub mod rolling;

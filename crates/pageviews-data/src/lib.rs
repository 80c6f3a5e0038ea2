//! Data layer for the page-view visualizer.
//!
//! Reads the daily CSV, removes quantile outliers and derives the monthly
//! means and box-plot groupings the renderers consume.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod reader;

pub use pageviews_core as core;

//! Core types for the page-view visualizer.
//!
//! Domain models, the shared error type, statistics primitives, calendar
//! helpers and command-line settings used by the data, render and binary
//! crates.

pub mod dates;
pub mod error;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{ChartKind, ErrorKind, PageviewError, Result};
pub use models::{Bounds, CleanedTable, QuantileRange, Record};

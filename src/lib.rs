//! `crashviz` - Aviation accident dataset analysis
//!
//! Loads the historical airplane crash dataset, derives per-crash severity
//! measures (fatality ratio, fatal flag, operator category, decade and
//! five-year period), runs a fixed set of aggregations and renders them as a
//! battery of ten static charts followed by a short summary.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod battery;
pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod stats;

pub use charts::{Chart, ChartKind, ChartRenderer, StaticChartRenderer};
pub use config::Config;
pub use data::{load_and_prepare, Dataset, OperatorCategory, PreparedTable};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use stats::Summary;

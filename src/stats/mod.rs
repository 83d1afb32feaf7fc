//! Stats module - Aggregation queries and descriptive statistics

pub mod aggregate;
mod calculator;
mod summary;

pub use calculator::{BoxStats, DensityEstimate, StatsCalculator, DENSITY_POINTS};
pub use summary::{thousands, Summary};

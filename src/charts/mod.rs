//! Charts module - Chart models and static rendering

mod distribution;
mod model;
mod palette;
mod plotter;
mod renderer;
mod trend;

pub use model::{
    Chart, ChartKind, Distribution, Donut, DualAxisLine, FilledArea, Heatmap, HorizontalBar,
    LineSeriesData, PiePair, Scatter, Slice, StackedBar,
};
pub use renderer::{ChartRenderer, StaticChartRenderer};

/// Outcome of a plotters drawing routine.
pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

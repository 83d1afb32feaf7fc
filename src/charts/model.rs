//! Chart models: the small aggregate tables handed to a renderer.

/// The ten chart kinds of the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Pie,
    HorizontalBar,
    Scatter,
    DualAxisLine,
    Heatmap,
    Violin,
    StackedBar,
    Donut,
    FilledArea,
    BoxPlot,
}

/// A labelled value (pie slice, bar).
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Two pies side by side sharing one colour per slice position.
#[derive(Debug, Clone, PartialEq)]
pub struct PiePair {
    pub left_title: String,
    pub left: Vec<Slice>,
    pub right_title: String,
    pub right: Vec<Slice>,
}

/// Horizontal bars, first bar drawn on top.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalBar {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<Slice>,
}

/// Points coloured by a third value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color_label: String,
    /// Upper bound of the x axis; points beyond it are not drawn.
    pub x_max: f64,
    /// `(x, y, colour value)`.
    pub points: Vec<(f64, f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesData {
    pub label: String,
    pub values: Vec<f64>,
}

/// Two series over the same x values, each against its own y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DualAxisLine {
    pub title: String,
    pub x_label: String,
    pub x: Vec<f64>,
    pub left: LineSeriesData,
    pub right: LineSeriesData,
}

/// Annotated grid; `None` cells are left blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub value_label: String,
    pub columns: Vec<String>,
    /// Rows top to bottom.
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

/// Labelled samples for distribution charts (violin, box plot).
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<(String, Vec<f64>)>,
}

/// Bars built from stacked layers, first layer at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBar {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub layers: Vec<LineSeriesData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Donut {
    pub title: String,
    pub slices: Vec<Slice>,
}

/// A filled curve with a labelled final value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledArea {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series_label: String,
    pub points: Vec<(f64, f64)>,
    /// Spacing of the x axis ticks.
    pub x_tick_step: f64,
}

/// One chart ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Pie(PiePair),
    HorizontalBar(HorizontalBar),
    Scatter(Scatter),
    DualAxisLine(DualAxisLine),
    Heatmap(Heatmap),
    Violin(Distribution),
    StackedBar(StackedBar),
    Donut(Donut),
    FilledArea(FilledArea),
    BoxPlot(Distribution),
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Pie(_) => ChartKind::Pie,
            Self::HorizontalBar(_) => ChartKind::HorizontalBar,
            Self::Scatter(_) => ChartKind::Scatter,
            Self::DualAxisLine(_) => ChartKind::DualAxisLine,
            Self::Heatmap(_) => ChartKind::Heatmap,
            Self::Violin(_) => ChartKind::Violin,
            Self::StackedBar(_) => ChartKind::StackedBar,
            Self::Donut(_) => ChartKind::Donut,
            Self::FilledArea(_) => ChartKind::FilledArea,
            Self::BoxPlot(_) => ChartKind::BoxPlot,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Pie(c) => &c.left_title,
            Self::HorizontalBar(c) => &c.title,
            Self::Scatter(c) => &c.title,
            Self::DualAxisLine(c) => &c.title,
            Self::Heatmap(c) => &c.title,
            Self::Violin(c) | Self::BoxPlot(c) => &c.title,
            Self::StackedBar(c) => &c.title,
            Self::Donut(c) => &c.title,
            Self::FilledArea(c) => &c.title,
        }
    }
}

impl ChartKind {
    /// Figure size in inches.
    pub fn figure_size(&self) -> (f64, f64) {
        match self {
            Self::Pie => (14.0, 6.0),
            Self::HorizontalBar => (12.0, 8.0),
            Self::Scatter => (12.0, 7.0),
            Self::DualAxisLine => (14.0, 7.0),
            Self::Heatmap => (16.0, 5.0),
            Self::Violin => (10.0, 7.0),
            Self::StackedBar => (14.0, 7.0),
            Self::Donut => (10.0, 10.0),
            Self::FilledArea => (14.0, 7.0),
            Self::BoxPlot => (14.0, 7.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_title() {
        let chart = Chart::Donut(Donut {
            title: "Deadliest types".to_string(),
            slices: vec![Slice::new("DC-3", 10.0)],
        });
        assert_eq!(chart.kind(), ChartKind::Donut);
        assert_eq!(chart.title(), "Deadliest types");
    }

    #[test]
    fn test_violin_and_box_share_model() {
        let dist = Distribution {
            title: "t".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            groups: Vec::new(),
        };
        assert_eq!(Chart::Violin(dist.clone()).kind(), ChartKind::Violin);
        assert_eq!(Chart::BoxPlot(dist).kind(), ChartKind::BoxPlot);
    }

    #[test]
    fn test_figure_sizes() {
        assert_eq!(ChartKind::Heatmap.figure_size(), (16.0, 5.0));
        assert_eq!(ChartKind::Donut.figure_size(), (10.0, 10.0));
    }
}

//! Static Chart Renderer
//! Turns chart models into PNG files with plotters' bitmap backend.
//!
//! Figure sizes are given in inches and font sizes in points, so the pixel
//! dimensions of every chart scale with the configured DPI.

use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontDesc;
use tracing::debug;

use super::model::Chart;
use super::{distribution, plotter, trend};
use crate::config::RenderConfig;
use crate::error::{Error, Result};

/// Writes a chart to an image file.
pub trait ChartRenderer {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()>;
}

/// Renders charts to PNG at a fixed DPI.
#[derive(Debug, Clone)]
pub struct StaticChartRenderer {
    dpi: u32,
    font_family: String,
}

impl StaticChartRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            dpi: config.dpi,
            font_family: config.font_family.clone(),
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

impl Default for StaticChartRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl ChartRenderer for StaticChartRenderer {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        let canvas = Canvas::new(chart.kind().figure_size(), self.dpi, &self.font_family);
        debug!(
            kind = ?chart.kind(),
            width = canvas.width,
            height = canvas.height,
            path = %path.display(),
            "rendering chart"
        );

        let drawn = match chart {
            Chart::Pie(c) => plotter::draw_pie_pair(path, &canvas, c),
            Chart::HorizontalBar(c) => plotter::draw_horizontal_bar(path, &canvas, c),
            Chart::Scatter(c) => distribution::draw_scatter(path, &canvas, c),
            Chart::DualAxisLine(c) => trend::draw_dual_axis_line(path, &canvas, c),
            Chart::Heatmap(c) => plotter::draw_heatmap(path, &canvas, c),
            Chart::Violin(c) => distribution::draw_violin(path, &canvas, c),
            Chart::StackedBar(c) => plotter::draw_stacked_bar(path, &canvas, c),
            Chart::Donut(c) => plotter::draw_donut(path, &canvas, c),
            Chart::FilledArea(c) => trend::draw_filled_area(path, &canvas, c),
            Chart::BoxPlot(c) => distribution::draw_box_plot(path, &canvas, c),
        };
        drawn.map_err(|e| Error::render(path, e.to_string()))
    }
}

/// Pixel geometry and fonts of one figure.
pub(crate) struct Canvas<'a> {
    pub width: u32,
    pub height: u32,
    dpi: u32,
    family: &'a str,
}

impl<'a> Canvas<'a> {
    pub fn new((width_in, height_in): (f64, f64), dpi: u32, family: &'a str) -> Self {
        let dots = f64::from(dpi);
        Self {
            width: (width_in * dots).round() as u32,
            height: (height_in * dots).round() as u32,
            dpi,
            family,
        }
    }

    /// Points to pixels, never below one pixel.
    pub fn px(&self, points: f64) -> u32 {
        self.scaled(points).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> FontDesc<'a> {
        FontDesc::new(
            FontFamily::from(self.family),
            self.scaled(points),
            FontStyle::Normal,
        )
    }

    pub fn bold(&self, points: f64) -> FontDesc<'a> {
        FontDesc::new(
            FontFamily::from(self.family),
            self.scaled(points),
            FontStyle::Bold,
        )
    }

    pub fn root<'p>(&self, path: &'p Path) -> DrawingArea<BitMapBackend<'p>, Shift> {
        BitMapBackend::new(path, (self.width, self.height)).into_drawing_area()
    }

    fn scaled(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }
}

/// Axis range holding `n` categories centred on `0..n`.
pub(crate) fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Tick label for a category axis: the name at integer positions, blank
/// elsewhere.
pub(crate) fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Upper axis bound leaving headroom above `max`.
pub(crate) fn padded_max(max: f64, factor: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::model::{Donut, Slice};

    #[test]
    fn test_canvas_scales_with_dpi() {
        let canvas = Canvas::new((14.0, 6.0), 300, "sans-serif");
        assert_eq!((canvas.width, canvas.height), (4200, 1800));
        assert_eq!(canvas.px(72.0), 300);
        assert_eq!(canvas.px(0.0), 1);

        let small = Canvas::new((10.0, 10.0), 72, "sans-serif");
        assert_eq!((small.width, small.height), (720, 720));
        assert_eq!(small.px(12.0), 12);
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["Military".to_string(), "Civilian".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Military");
        assert_eq!(category_label(&labels, 1.0000000001), "Civilian");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_category_range_and_padding() {
        assert_eq!(category_range(3), -0.5..2.5);
        assert_eq!(category_range(0), -0.5..0.5);
        assert!((padded_max(100.0, 1.1) - 110.0).abs() < 1e-9);
        assert_eq!(padded_max(0.0, 1.1), 1.0);
        assert_eq!(padded_max(f64::NAN, 1.1), 1.0);
    }

    #[test]
    fn test_render_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("viz.png");
        let renderer = StaticChartRenderer::new(&RenderConfig {
            dpi: 36,
            ..RenderConfig::default()
        });
        let chart = Chart::Donut(Donut {
            title: "Types".to_string(),
            slices: vec![Slice::new("DC-3", 3.0)],
        });
        let err = renderer.render(&chart, &path).unwrap_err();
        assert!(err.to_string().contains("viz.png"));
    }
}

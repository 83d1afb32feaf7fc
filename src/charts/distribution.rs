//! Charts of value distributions: capacity scatter, violins and box plots.

use std::path::Path;

use plotters::prelude::*;

use super::model::{Distribution, Scatter};
use super::palette;
use super::plotter::draw_colorbar;
use super::renderer::{category_label, category_range, padded_max, Canvas};
use super::DrawResult;
use crate::stats::StatsCalculator;

const VIOLIN_HALF_WIDTH: f64 = 0.35;
const BOX_HALF_WIDTH: f64 = 0.3;

pub(crate) fn draw_scatter(path: &Path, canvas: &Canvas, chart: &Scatter) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;
    let titled = root.titled(&chart.title, canvas.bold(14.0))?;
    let (plot_area, bar_area) = titled.split_horizontally(canvas.width * 88 / 100);

    let visible: Vec<(f64, f64, f64)> = chart
        .points
        .iter()
        .copied()
        .filter(|&(x, _, _)| x <= chart.x_max)
        .collect();
    let (min, max) = visible.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.2), hi.max(p.2))
    });
    let (min, max) = if min <= max { (min, max) } else { (0.0, 1.0) };

    let mut plot = ChartBuilder::on(&plot_area)
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(35.0))
        .y_label_area_size(canvas.px(45.0))
        .build_cartesian_2d(0f64..chart.x_max, -0.05f64..1.05f64)?;

    plot.configure_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let radius = canvas.px(2.5);
    plot.draw_series(visible.iter().map(|&(x, y, c)| {
        let color = palette::sample(&palette::VIRIDIS, palette::normalize(c, min, max));
        Circle::new((x, y), radius, color.mix(0.6).filled())
    }))?;

    draw_colorbar(&bar_area, canvas, &palette::VIRIDIS, (min, max), &chart.color_label)?;

    root.present()?;
    Ok(())
}

pub(crate) fn draw_violin(path: &Path, canvas: &Canvas, chart: &Distribution) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let labels: Vec<String> = chart.groups.iter().map(|(l, _)| l.clone()).collect();
    let n = labels.len();

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(35.0))
        .y_label_area_size(canvas.px(50.0))
        .build_cartesian_2d(category_range(n), -0.05f64..1.05f64)?;

    plot.configure_mesh()
        .disable_x_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_labels(n + 1)
        .x_label_formatter(&|v| category_label(&labels, *v))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(10.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let stroke = canvas.px(1.0);
    for (i, (_, values)) in chart.groups.iter().enumerate() {
        let Some(estimate) = StatsCalculator::density(values) else {
            continue;
        };
        let x = i as f64;
        let color = palette::category_color(i);
        let peak = estimate.max_density();

        if estimate.points.len() > 1 && peak > 0.0 {
            let half = |d: f64| VIOLIN_HALF_WIDTH * d / peak;
            let outline: Vec<(f64, f64)> = estimate
                .points
                .iter()
                .map(|&(y, d)| (x - half(d), y))
                .chain(estimate.points.iter().rev().map(|&(y, d)| (x + half(d), y)))
                .collect();
            plot.draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                color.mix(0.7).filled(),
            )))?;
            plot.draw_series(std::iter::once(PathElement::new(
                outline,
                color.stroke_width(stroke),
            )))?;
        }

        let (low, high) = match (estimate.points.first(), estimate.points.last()) {
            (Some(&(lo, _)), Some(&(hi, _))) => (lo, hi),
            _ => continue,
        };
        let cap = VIOLIN_HALF_WIDTH / 3.0;
        let lines = [
            vec![(x, low), (x, high)],
            vec![(x - cap, low), (x + cap, low)],
            vec![(x - cap, high), (x + cap, high)],
        ];
        plot.draw_series(
            lines
                .into_iter()
                .map(|line| PathElement::new(line, palette::BLACK.stroke_width(stroke))),
        )?;
        plot.draw_series(std::iter::once(PathElement::new(
            vec![(x - cap * 1.5, estimate.median), (x + cap * 1.5, estimate.median)],
            palette::MEDIAN.stroke_width(stroke * 2),
        )))?;
        plot.draw_series(std::iter::once(PathElement::new(
            vec![(x - cap * 1.5, estimate.mean), (x + cap * 1.5, estimate.mean)],
            palette::MEAN.stroke_width(stroke * 2),
        )))?;
    }

    root.present()?;
    Ok(())
}

pub(crate) fn draw_box_plot(path: &Path, canvas: &Canvas, chart: &Distribution) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let labels: Vec<String> = chart.groups.iter().map(|(l, _)| l.clone()).collect();
    let n = labels.len();
    let stats: Vec<_> = chart
        .groups
        .iter()
        .map(|(_, values)| StatsCalculator::box_stats(values))
        .collect();
    let max = stats
        .iter()
        .flat_map(|s| s.outliers.iter().copied().chain([s.whisker_high]))
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(40.0))
        .y_label_area_size(canvas.px(50.0))
        .build_cartesian_2d(category_range(n), 0f64..padded_max(max, 1.05))?;

    plot.configure_mesh()
        .disable_x_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_labels(n + 1)
        .x_label_formatter(&|v| category_label(&labels, *v))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let colors = palette::spread(&palette::COOLWARM, n, 0.0, 1.0);
    let stroke = canvas.px(1.0);
    let flier = canvas.px(2.0);
    for (i, s) in stats.iter().enumerate() {
        if s.count == 0 {
            continue;
        }
        let x = i as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;

        plot.draw_series([
            Rectangle::new([(left, s.q1), (right, s.q3)], colors[i].mix(0.7).filled()),
            Rectangle::new([(left, s.q1), (right, s.q3)], palette::BLACK.stroke_width(stroke)),
        ])?;

        let whiskers = [
            vec![(x, s.q3), (x, s.whisker_high)],
            vec![(x, s.q1), (x, s.whisker_low)],
            vec![(x - cap, s.whisker_high), (x + cap, s.whisker_high)],
            vec![(x - cap, s.whisker_low), (x + cap, s.whisker_low)],
        ];
        plot.draw_series(
            whiskers
                .into_iter()
                .map(|line| PathElement::new(line, palette::BLACK.stroke_width(stroke))),
        )?;

        plot.draw_series(std::iter::once(PathElement::new(
            vec![(left, s.median), (right, s.median)],
            palette::BLACK.stroke_width(stroke * 2),
        )))?;
        plot.draw_series(dashes(left, right, s.mean).map(|segment| {
            PathElement::new(segment, palette::MEAN.stroke_width(stroke * 2))
        }))?;

        plot.draw_series(
            s.outliers
                .iter()
                .map(|&v| Circle::new((x, v), flier, palette::BLACK.stroke_width(stroke))),
        )?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal dash segments covering `[x0, x1]` at height `y`.
pub(crate) fn dashes(x0: f64, x1: f64, y: f64) -> impl Iterator<Item = Vec<(f64, f64)>> {
    const SEGMENTS: usize = 5;
    let step = (x1 - x0) / (2 * SEGMENTS - 1) as f64;
    (0..SEGMENTS).map(move |i| {
        let start = x0 + step * (2 * i) as f64;
        vec![(start, y), (start + step, y)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashes_span_the_interval() {
        let segments: Vec<_> = dashes(0.0, 9.0, 2.0).collect();
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], vec![(0.0, 2.0), (1.0, 2.0)]);
        assert_eq!(segments[4], vec![(8.0, 2.0), (9.0, 2.0)]);
    }
}

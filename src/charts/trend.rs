//! Charts over time: decade trends and the cumulative death toll.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::distribution::dashes;
use super::model::{DualAxisLine, FilledArea};
use super::palette;
use super::renderer::{padded_max, Canvas};
use super::DrawResult;
use crate::stats::thousands;

/// x range covering `values`, widened by `pad` on both sides.
fn span(values: impl Iterator<Item = f64>, pad: f64) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo < hi {
        (lo - pad)..(hi + pad)
    } else if lo == hi {
        let pad = pad.max(1.0);
        (lo - pad)..(hi + pad)
    } else {
        0.0..1.0
    }
}

pub(crate) fn draw_dual_axis_line(
    path: &Path,
    canvas: &Canvas,
    chart: &DualAxisLine,
) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let x_range = span(chart.x.iter().copied(), 5.0);
    let left_max = padded_max(chart.left.values.iter().copied().fold(0.0, f64::max), 1.1);
    let right_max = padded_max(chart.right.values.iter().copied().fold(0.0, f64::max), 1.1);

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(35.0))
        .y_label_area_size(canvas.px(55.0))
        .right_y_label_area_size(canvas.px(60.0))
        .build_cartesian_2d(x_range.clone(), 0f64..left_max)?
        .set_secondary_coord(x_range, 0f64..right_max);

    plot.configure_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_labels(chart.x.len() + 1)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .x_desc(&chart.x_label)
        .y_desc(&chart.left.label)
        .y_label_style(canvas.font(9.0).color(&palette::CRASHES))
        .x_label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    plot.configure_secondary_axes()
        .y_desc(&chart.right.label)
        .label_style(canvas.font(9.0).color(&palette::DEATHS))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let stroke = canvas.px(2.0);
    let marker = canvas.px(3.5);
    let swatch = canvas.px(10.0) as i32;
    let left: Vec<(f64, f64)> = chart
        .x
        .iter()
        .copied()
        .zip(chart.left.values.iter().copied())
        .collect();
    let right: Vec<(f64, f64)> = chart
        .x
        .iter()
        .copied()
        .zip(chart.right.values.iter().copied())
        .collect();

    plot.draw_series(LineSeries::new(left.iter().copied(), palette::CRASHES.stroke_width(stroke)))?
        .label(chart.left.label.as_str())
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 2 * swatch, y)], palette::CRASHES.stroke_width(3))
        });
    plot.draw_series(left.iter().map(|&p| Circle::new(p, marker, palette::CRASHES.filled())))?;

    plot.draw_secondary_series(LineSeries::new(
        right.iter().copied(),
        palette::DEATHS.stroke_width(stroke),
    ))?
    .label(chart.right.label.as_str())
    .legend(move |(x, y)| {
        PathElement::new(vec![(x, y), (x + 2 * swatch, y)], palette::DEATHS.stroke_width(3))
    });
    plot.draw_secondary_series(
        right
            .iter()
            .map(|&p| TriangleMarker::new(p, marker, palette::DEATHS.filled())),
    )?;

    plot.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&palette::WHITE.mix(0.8))
        .border_style(&palette::BLACK)
        .label_font(canvas.font(10.0))
        .draw()?;

    root.present()?;
    Ok(())
}

pub(crate) fn draw_filled_area(path: &Path, canvas: &Canvas, chart: &FilledArea) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let x_range = span(chart.points.iter().map(|&(x, _)| x), 0.0);
    let total = chart.points.last().map(|&(_, y)| y).unwrap_or(0.0);
    let y_max = padded_max(
        chart.points.iter().map(|&(_, y)| y).fold(0.0, f64::max),
        1.1,
    );
    let ticks = ((x_range.end - x_range.start) / chart.x_tick_step.max(1.0)).ceil() as usize + 1;

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(35.0))
        .y_label_area_size(canvas.px(65.0))
        .build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

    plot.configure_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_labels(ticks)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| thousands(y.max(0.0).round() as u64))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let swatch = canvas.px(5.0) as i32;
    plot.draw_series(
        AreaSeries::new(chart.points.iter().copied(), 0.0, palette::FATAL.mix(0.7))
            .border_style(palette::AREA_EDGE.stroke_width(canvas.px(2.0))),
    )?
    .label(chart.series_label.as_str())
    .legend(move |(x, y)| {
        Rectangle::new([(x, y - swatch), (x + 2 * swatch, y + swatch)], palette::FATAL.filled())
    });

    if !chart.points.is_empty() {
        let stroke = palette::TOTAL_LINE.mix(0.5).stroke_width(canvas.px(1.5));
        plot.draw_series(
            dashes(x_range.start, x_range.end, total)
                .map(|segment| PathElement::new(segment, stroke)),
        )?;

        let note = canvas
            .bold(11.0)
            .color(&palette::TOTAL_LINE)
            .pos(Pos::new(HPos::Right, VPos::Bottom));
        plot.draw_series(std::iter::once(Text::new(
            format!("Total: {}", thousands(total.round() as u64)),
            (x_range.end, total + y_max * 0.01),
            note,
        )))?;
    }

    plot.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&palette::WHITE.mix(0.8))
        .border_style(&palette::BLACK)
        .label_font(canvas.font(10.0))
        .draw()?;

    root.present()?;
    Ok(())
}

//! Categorical charts: pies, bars and the period heatmap.

use std::path::Path;

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::model::{Donut, Heatmap, HorizontalBar, PiePair, Slice, StackedBar};
use super::palette;
use super::renderer::{category_label, category_range, padded_max, Canvas};
use super::DrawResult;

type Area<'p> = DrawingArea<BitMapBackend<'p>, Shift>;

const DONUT_HOLE: f64 = 0.7;
const BAR_WIDTH: f64 = 0.8;

pub(crate) fn draw_pie_pair(path: &Path, canvas: &Canvas, chart: &PiePair) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let panels = root.split_evenly((1, 2));
    let sides = [
        (&chart.left_title, &chart.left),
        (&chart.right_title, &chart.right),
    ];
    for (panel, (title, slices)) in panels.iter().zip(sides) {
        let panel = panel.titled(title, canvas.bold(14.0))?;
        let colors: Vec<RGBColor> = (0..slices.len()).map(palette::category_color).collect();
        draw_pie(&panel, canvas, slices, &colors, None)?;
    }

    root.present()?;
    Ok(())
}

pub(crate) fn draw_donut(path: &Path, canvas: &Canvas, chart: &Donut) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;
    let area = root.titled(&chart.title, canvas.bold(14.0))?;

    let colors = palette::spread(&palette::SPECTRAL, chart.slices.len(), 0.2, 0.8);
    draw_pie(&area, canvas, &chart.slices, &colors, Some(DONUT_HOLE))?;

    root.present()?;
    Ok(())
}

fn draw_pie(
    area: &Area<'_>,
    canvas: &Canvas,
    slices: &[Slice],
    colors: &[RGBColor],
    hole: Option<f64>,
) -> DrawResult {
    let sizes: Vec<f64> = slices.iter().map(|s| s.value.max(0.0)).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return Ok(());
    }
    let labels: Vec<String> = slices.iter().map(|s| s.label.clone()).collect();

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.36;

    let mut pie = Pie::new(&center, &radius, &sizes, colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(canvas.font(11.0).color(&palette::BLACK));
    pie.percentages(canvas.bold(10.0).color(&palette::BLACK));
    if let Some(fraction) = hole {
        pie.donut_hole(radius * fraction);
    }
    area.draw(&pie)?;
    Ok(())
}

pub(crate) fn draw_horizontal_bar(
    path: &Path,
    canvas: &Canvas,
    chart: &HorizontalBar,
) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let n = chart.bars.len();
    let max = padded_max(chart.bars.iter().map(|b| b.value).fold(0.0, f64::max), 1.12);
    // Rank 0 sits on the top row.
    let row_of = |rank: usize| (n - 1 - rank) as f64;
    let row_labels: Vec<String> = chart.bars.iter().rev().map(|b| b.label.clone()).collect();

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(30.0))
        .y_label_area_size(canvas.px(170.0))
        .build_cartesian_2d(0f64..max, category_range(n))?;

    plot.configure_mesh()
        .disable_y_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .y_labels(n + 1)
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .x_desc(&chart.x_label)
        .label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let colors = palette::spread(&palette::REDS, n, 0.4, 0.9);
    plot.draw_series(chart.bars.iter().enumerate().map(|(rank, bar)| {
        let y = row_of(rank);
        Rectangle::new(
            [(0.0, y - BAR_WIDTH / 2.0), (bar.value, y + BAR_WIDTH / 2.0)],
            colors[rank].filled(),
        )
    }))?;

    let value_style = canvas
        .font(8.0)
        .color(&palette::BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    plot.draw_series(chart.bars.iter().enumerate().map(|(rank, bar)| {
        Text::new(
            format!("{}", bar.value.round() as i64),
            (bar.value + max * 0.01, row_of(rank)),
            value_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

pub(crate) fn draw_stacked_bar(path: &Path, canvas: &Canvas, chart: &StackedBar) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;

    let n = chart.categories.len();
    let totals: Vec<f64> = (0..n)
        .map(|i| chart.layers.iter().filter_map(|l| l.values.get(i)).sum())
        .collect();
    let max = padded_max(totals.iter().copied().fold(0.0, f64::max), 1.1);

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, canvas.bold(14.0))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(40.0))
        .y_label_area_size(canvas.px(50.0))
        .build_cartesian_2d(category_range(n), 0f64..max)?;

    plot.configure_mesh()
        .disable_x_mesh()
        .light_line_style(palette::GRID.mix(0.3))
        .x_labels(n + 1)
        .x_label_formatter(&|v| category_label(&chart.categories, *v))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(9.0))
        .axis_desc_style(canvas.bold(11.0))
        .draw()?;

    let colors = [palette::NON_FATAL, palette::FATAL];
    let swatch = canvas.px(5.0) as i32;
    let mut base = vec![0.0; n];
    for (layer_index, layer) in chart.layers.iter().enumerate() {
        let color = colors[layer_index % colors.len()];
        let bars: Vec<Rectangle<(f64, f64)>> = layer
            .values
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, &value)| {
                let x = i as f64;
                let bottom = base[i];
                base[i] += value;
                Rectangle::new(
                    [(x - BAR_WIDTH / 2.0, bottom), (x + BAR_WIDTH / 2.0, bottom + value)],
                    color.mix(0.8).filled(),
                )
            })
            .collect();
        plot.draw_series(bars)?
            .label(layer.label.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - swatch), (x + 2 * swatch, y + swatch)], color.filled())
            });
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

pub(crate) fn draw_heatmap(path: &Path, canvas: &Canvas, chart: &Heatmap) -> DrawResult {
    let root = canvas.root(path);
    root.fill(&palette::WHITE)?;
    let titled = root.titled(&chart.title, canvas.bold(14.0))?;
    let (plot_area, bar_area) = titled.split_horizontally(canvas.width * 90 / 100);

    let cols = chart.columns.len();
    let rows = chart.rows.len();
    let cells = chart.rows.iter().flat_map(|(_, v)| v.iter().flatten().copied());
    let (min, max) = cells.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (min, max) = if min <= max { (min, max) } else { (0.0, 1.0) };

    // First row on top.
    let row_labels: Vec<String> = chart.rows.iter().rev().map(|(l, _)| l.clone()).collect();

    let mut plot = ChartBuilder::on(&plot_area)
        .margin(canvas.px(8.0))
        .x_label_area_size(canvas.px(45.0))
        .y_label_area_size(canvas.px(70.0))
        .build_cartesian_2d(category_range(cols), category_range(rows))?;

    plot.configure_mesh()
        .disable_mesh()
        .x_labels(cols + 1)
        .y_labels(rows + 1)
        .x_label_formatter(&|v| category_label(&chart.columns, *v))
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .label_style(canvas.font(7.0))
        .axis_desc_style(canvas.bold(10.0))
        .draw()?;

    let mut rects = Vec::with_capacity(rows * cols);
    let mut notes = Vec::new();
    let note_style = canvas
        .font(6.0)
        .color(&palette::BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (r, (_, values)) in chart.rows.iter().enumerate() {
        let y = (rows - 1 - r) as f64;
        for (c, value) in values.iter().take(cols).enumerate() {
            let x = c as f64;
            let fill = match value {
                Some(v) => palette::sample(&palette::YL_OR_RD, palette::normalize(*v, min, max)),
                None => palette::EMPTY_CELL,
            };
            rects.push(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                fill.filled(),
            ));
            if let Some(v) = value {
                notes.push(Text::new(format!("{v:.1}"), (x, y), note_style.clone()));
            }
        }
    }
    plot.draw_series(rects)?;
    plot.draw_series(notes)?;

    draw_colorbar(&bar_area, canvas, &palette::YL_OR_RD, (min, max), &chart.value_label)?;

    root.present()?;
    Ok(())
}

/// Vertical colour scale for `range` drawn into `area`.
pub(crate) fn draw_colorbar(
    area: &Area<'_>,
    canvas: &Canvas,
    map: &[RGBColor],
    range: (f64, f64),
    label: &str,
) -> DrawResult {
    const STEPS: usize = 64;
    let (lo, hi) = if range.1 > range.0 {
        range
    } else {
        (range.0 - 0.5, range.0 + 0.5)
    };

    let mut bar = ChartBuilder::on(area)
        .margin_top(canvas.px(20.0))
        .margin_bottom(canvas.px(45.0))
        .margin_right(canvas.px(12.0))
        .y_label_area_size(canvas.px(55.0))
        .build_cartesian_2d(0f64..1f64, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_desc(label)
        .label_style(canvas.font(7.0))
        .axis_desc_style(canvas.font(8.0))
        .draw()?;

    let step = (hi - lo) / STEPS as f64;
    bar.draw_series((0..STEPS).map(|i| {
        let y0 = lo + step * i as f64;
        let t = (i as f64 + 0.5) / STEPS as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], palette::sample(map, t).filled())
    }))?;
    Ok(())
}

//! The fixed ten-chart battery.
//!
//! Each step runs one aggregation query, wraps the result in a chart model
//! and hands it to a [`ChartRenderer`]. Steps run strictly in order and the
//! first failure aborts the run; files written by earlier steps stay.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::charts::{
    Chart, ChartRenderer, Distribution, Donut, DualAxisLine, FilledArea, Heatmap, HorizontalBar,
    LineSeriesData, PiePair, Scatter, Slice, StackedBar,
};
use crate::config::Config;
use crate::data::{Dataset, OperatorCategory, PreparedTable};
use crate::error::{Error, Result};
use crate::stats::{aggregate, Summary};

/// Upper bound of the capacity axis of the scatter chart.
pub const CAPACITY_AXIS_MAX: f64 = 600.0;

const RULE_WIDTH: usize = 60;

/// One entry of the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStep {
    pub index: usize,
    pub description: &'static str,
    pub file_name: &'static str,
}

pub const STEPS: [ChartStep; 10] = [
    ChartStep {
        index: 1,
        description: "Pie chart: military vs civilian crash share",
        file_name: "viz_1_pie_military_vs_civil.png",
    },
    ChartStep {
        index: 2,
        description: "Horizontal bar chart: operators with the most crashes",
        file_name: "viz_2_bar_top_operators.png",
    },
    ChartStep {
        index: 3,
        description: "Scatter plot: aircraft capacity vs fatality ratio",
        file_name: "viz_3_scatter_capacity_vs_fatality.png",
    },
    ChartStep {
        index: 4,
        description: "Line chart: crashes and deaths by decade",
        file_name: "viz_4_line_decade_trends.png",
    },
    ChartStep {
        index: 5,
        description: "Heatmap: mean deaths by period and operator category",
        file_name: "viz_5_heatmap_period_operator.png",
    },
    ChartStep {
        index: 6,
        description: "Violin plot: fatality ratio distribution",
        file_name: "viz_6_violin_fatality_distribution.png",
    },
    ChartStep {
        index: 7,
        description: "Stacked bar chart: crash severity by decade",
        file_name: "viz_7_stacked_bar_severity_by_decade.png",
    },
    ChartStep {
        index: 8,
        description: "Donut chart: deadliest aircraft types",
        file_name: "viz_8_donut_aircraft_types.png",
    },
    ChartStep {
        index: 9,
        description: "Area chart: cumulative deaths",
        file_name: "viz_9_area_cumulative_deaths.png",
    },
    ChartStep {
        index: 10,
        description: "Box plot: deaths per crash by decade",
        file_name: "viz_10_box_fatalities_by_decade.png",
    },
];

/// What a completed battery produced.
#[derive(Debug, Clone)]
pub struct BatteryReport {
    pub saved: Vec<PathBuf>,
    pub summary: Summary,
}

/// Print the opening banner.
pub fn write_banner<W: Write>(out: &mut W) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "   AVIATION SAFETY - ADVANCED VISUALIZATION ANALYSIS")?;
    writeln!(out, "{rule}")?;
    Ok(())
}

/// Render all ten charts for `dataset` and print progress and the summary
/// block to `out`.
pub fn run<R, W>(
    dataset: &Dataset,
    config: &Config,
    renderer: &R,
    out: &mut W,
) -> Result<BatteryReport>
where
    R: ChartRenderer + ?Sized,
    W: Write,
{
    let table = &dataset.table;
    let span = YearSpan::of(table)?;

    writeln!(out)?;
    writeln!(out, "✓ {} accidents will be analysed", table.len())?;
    writeln!(out, "✓ Date range: {span}")?;
    writeln!(out)?;

    let mut saved = Vec::with_capacity(STEPS.len());
    for step in &STEPS {
        writeln!(out, "[{}/{}] {}", step.index, STEPS.len(), step.description)?;
        let chart = build_chart(step.index, table, config, &span)?;
        let path = config.output_path(step.file_name);
        renderer.render(&chart, &path)?;
        info!(step = step.index, path = %path.display(), "saved chart");
        writeln!(out, "  ✓ Saved: {}", step.file_name)?;
        saved.push(path);
    }

    let summary = Summary::compute(table)?;
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "   ANALYSIS COMPLETE - SUMMARY STATISTICS")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;
    writeln!(out, "{summary}")?;
    writeln!(out)?;
    writeln!(out, "✅ {} visualizations created successfully!", saved.len())?;
    writeln!(out, "{rule}")?;

    Ok(BatteryReport { saved, summary })
}

/// First and last year of the table, as shown in titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan(pub Option<(i32, i32)>);

impl YearSpan {
    pub fn of(table: &PreparedTable) -> Result<Self> {
        Ok(Self(table.year_range()?))
    }

    fn last(&self) -> String {
        self.0
            .map(|(_, last)| last.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    }
}

impl std::fmt::Display for YearSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some((first, last)) => write!(f, "{first} - {last}"),
            None => write!(f, "n/a"),
        }
    }
}

fn compact(span: &YearSpan) -> String {
    match span.0 {
        Some((first, last)) => format!("{first}-{last}"),
        None => "n/a".to_string(),
    }
}

/// Build the chart model of step `index` (1-based).
pub fn build_chart(
    index: usize,
    table: &PreparedTable,
    config: &Config,
    span: &YearSpan,
) -> Result<Chart> {
    let analysis = &config.analysis;
    let chart = match index {
        1 => {
            let totals = aggregate::category_totals(table)?;
            Chart::Pie(PiePair {
                left_title: "Crash Count Share (Military vs Civilian)".to_string(),
                left: totals
                    .iter()
                    .map(|t| Slice::new(t.category.as_str(), t.crashes as f64))
                    .collect(),
                right_title: "Total Deaths Share (Military vs Civilian)".to_string(),
                right: totals
                    .iter()
                    .map(|t| Slice::new(t.category.as_str(), t.fatalities))
                    .collect(),
            })
        }
        2 => {
            let ranked = aggregate::top_operators(table, analysis.top_operators)?;
            Chart::HorizontalBar(HorizontalBar {
                title: format!(
                    "Top {} Operators by Crash Count ({})",
                    analysis.top_operators,
                    compact(span)
                ),
                x_label: "Crash Count".to_string(),
                bars: ranked.into_iter().map(|r| Slice::new(r.label, r.value)).collect(),
            })
        }
        3 => {
            let points = aggregate::capacity_points(table)?;
            Chart::Scatter(Scatter {
                title: "Aircraft Capacity vs Fatality Ratio".to_string(),
                x_label: "People Aboard".to_string(),
                y_label: "Fatality Ratio".to_string(),
                color_label: "Year".to_string(),
                x_max: CAPACITY_AXIS_MAX,
                points: points
                    .into_iter()
                    .map(|p| (p.aboard, p.fatality_ratio, f64::from(p.year)))
                    .collect(),
            })
        }
        4 => {
            let trend = aggregate::decade_trend(table)?;
            Chart::DualAxisLine(DualAxisLine {
                title: format!("Aviation Crashes and Deaths by Decade ({})", compact(span)),
                x_label: "Decade".to_string(),
                x: trend.iter().map(|t| f64::from(t.decade)).collect(),
                left: LineSeriesData {
                    label: "Total Crashes".to_string(),
                    values: trend.iter().map(|t| t.crashes as f64).collect(),
                },
                right: LineSeriesData {
                    label: "Total Deaths".to_string(),
                    values: trend.iter().map(|t| t.fatalities).collect(),
                },
            })
        }
        5 => {
            let heatmap = aggregate::period_heatmap(table, analysis.heatmap_periods)?;
            Chart::Heatmap(Heatmap {
                title: "Mean Deaths per Crash in 5-Year Periods (Military vs Civilian)".to_string(),
                x_label: "Period (5 years)".to_string(),
                y_label: "Operator Category".to_string(),
                value_label: "Mean Deaths".to_string(),
                columns: heatmap.periods.iter().map(|p| p.to_string()).collect(),
                rows: heatmap
                    .rows
                    .into_iter()
                    .map(|(category, row)| (category.as_str().to_string(), row))
                    .collect(),
            })
        }
        6 => {
            let ratios = aggregate::ratio_by_category(table)?;
            Chart::Violin(Distribution {
                title: "Fatality Ratio Distribution: Military vs Civilian Crashes".to_string(),
                x_label: String::new(),
                y_label: "Fatality Ratio".to_string(),
                groups: vec![
                    (OperatorCategory::Military.as_str().to_string(), ratios.military),
                    (OperatorCategory::Civilian.as_str().to_string(), ratios.civilian),
                ],
            })
        }
        7 => {
            let severity = aggregate::severity_by_decade(table)?;
            Chart::StackedBar(StackedBar {
                title: "Fatal and Non-fatal Crashes by Decade".to_string(),
                x_label: "Decade".to_string(),
                y_label: "Crash Count".to_string(),
                categories: severity.iter().map(|s| s.decade.to_string()).collect(),
                layers: vec![
                    LineSeriesData {
                        label: "Non-fatal (<50% deaths)".to_string(),
                        values: severity.iter().map(|s| s.non_fatal as f64).collect(),
                    },
                    LineSeriesData {
                        label: "Fatal (≥50% deaths)".to_string(),
                        values: severity.iter().map(|s| s.fatal as f64).collect(),
                    },
                ],
            })
        }
        8 => {
            let ranked = aggregate::top_types_by_fatalities(table, analysis.top_aircraft_types)?;
            Chart::Donut(Donut {
                title: format!(
                    "Top {} Aircraft Types by Total Deaths",
                    analysis.top_aircraft_types
                ),
                slices: ranked.into_iter().map(|r| Slice::new(r.label, r.value)).collect(),
            })
        }
        9 => {
            let cumulative = aggregate::cumulative_fatalities(table)?;
            Chart::FilledArea(FilledArea {
                title: format!("Cumulative Deaths in Aviation History ({})", compact(span)),
                x_label: "Year".to_string(),
                y_label: "Cumulative Deaths".to_string(),
                series_label: "Cumulative Deaths".to_string(),
                points: cumulative
                    .iter()
                    .map(|p| (f64::from(p.year), p.cumulative))
                    .collect(),
                x_tick_step: 10.0,
            })
        }
        10 => {
            let samples = aggregate::fatalities_by_decade(table, analysis.box_plot_min_year)?;
            Chart::BoxPlot(Distribution {
                title: format!(
                    "Deaths per Crash by Decade ({}-{})",
                    analysis.box_plot_min_year,
                    span.last()
                ),
                x_label: "Decade".to_string(),
                y_label: "Deaths per Crash".to_string(),
                groups: samples
                    .into_iter()
                    .map(|s| (s.decade.to_string(), s.fatalities))
                    .collect(),
            })
        }
        index => return Err(Error::UnknownStep { index }),
    };
    Ok(chart)
}

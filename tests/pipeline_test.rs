//! End-to-end tests: CSV on disk through preparation, aggregation and the
//! chart battery, with a renderer that records instead of rasterising.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crashviz::charts::{Chart, ChartKind, ChartRenderer};
use crashviz::data::columns::{f64_values, string_values, FATALITY_RATIO, OPERATOR};
use crashviz::stats::aggregate;
use crashviz::{battery, load_and_prepare, Config, OperatorCategory, Result};
use tempfile::TempDir;

const HEADER: &str = "Date,Time,Location,Operator,Flight #,Route,Type,Registration,\
                      cn/In,Aboard,Fatalities,Ground,Summary\n";

#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<(ChartKind, PathBuf)>>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        self.calls.borrow_mut().push((chart.kind(), path.to_path_buf()));
        Ok(())
    }
}

fn row(date: &str, operator: &str, aircraft: &str, aboard: &str, fatalities: &str) -> String {
    format!(
        "{date},10:00,\"Somewhere, Earth\",{operator},,,{aircraft},,,\
         {aboard},{fatalities},0,Crashed.\n"
    )
}

fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("crashes.csv");
    fs::write(&path, format!("{HEADER}{body}")).unwrap();
    path
}

fn scenario_csv(dir: &TempDir) -> PathBuf {
    let body = [
        row("07/12/1950", "US Navy", "Douglas R4D", "10", "10"),
        "01/01/1951,too,few\n".to_string(),
        row("08/01/1950", "Delta", "DC-3", "50", "0"),
        row("05/05/1955", "Aeroflot", "Li-2", "", "12"),
        row("someday", "Aeroflot", "Li-2", "20", "20"),
        row("03/03/1960", "US Army", "C-47", "0", "30"),
    ]
    .concat();
    write_csv(dir, &body)
}

#[test]
fn test_three_record_scenario() {
    let dir = TempDir::new().unwrap();
    let dataset = load_and_prepare(&scenario_csv(&dir)).unwrap();

    assert_eq!(dataset.load.malformed_rows, 1);
    assert_eq!(dataset.prepare.missing_counts, 1);
    assert_eq!(dataset.prepare.unparseable_dates, 1);
    assert_eq!(dataset.table.len(), 3);

    let df = dataset.table.dataframe();
    assert_eq!(f64_values(df, FATALITY_RATIO).unwrap(), vec![1.0, 0.0, 0.0]);

    let totals = aggregate::category_totals(&dataset.table).unwrap();
    let counts: Vec<(OperatorCategory, u64)> =
        totals.iter().map(|t| (t.category, t.crashes)).collect();
    assert_eq!(
        counts,
        vec![(OperatorCategory::Military, 2), (OperatorCategory::Civilian, 1)]
    );

    let decades: Vec<(i32, f64)> = aggregate::decade_trend(&dataset.table)
        .unwrap()
        .iter()
        .map(|t| (t.decade, t.fatalities))
        .collect();
    assert_eq!(decades, vec![(1950, 10.0), (1960, 30.0)]);
}

#[test]
fn test_missing_file_produces_nothing() {
    let dir = TempDir::new().unwrap();
    let err = load_and_prepare(&dir.path().join("absent.csv")).unwrap_err();

    assert!(err.is_source_not_found());
    assert!(err.to_string().contains("absent.csv"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_preparation_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let path = scenario_csv(&dir);

    let first = load_and_prepare(&path).unwrap();
    let second = load_and_prepare(&path).unwrap();
    assert!(first
        .table
        .dataframe()
        .equals_missing(second.table.dataframe()));
}

#[test]
fn test_latin1_operator_names_survive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.csv");
    let mut bytes = HEADER.as_bytes().to_vec();
    bytes.extend_from_slice(b"06/30/1956,,Arizona,A\xe9ropostale,,,Lat\xe9co\xe8re 28,,,2,2,0,\n");
    fs::write(&path, bytes).unwrap();

    let dataset = load_and_prepare(&path).unwrap();
    let operators = string_values(dataset.table.dataframe(), OPERATOR).unwrap();
    assert_eq!(operators, vec!["Aéropostale".to_string()]);
}

#[test]
fn test_cumulative_deaths_end_at_total() {
    let dir = TempDir::new().unwrap();
    let body = [
        row("01/01/1930", "KLM", "Fokker F.VII", "8", "8"),
        row("06/01/1930", "Army", "Ford Trimotor", "10", "4"),
        row("01/01/1945", "Navy", "PBY", "12", "0"),
        row("01/01/1972", "Aeroflot", "Il-62", "174", "174"),
    ]
    .concat();
    let dataset = load_and_prepare(&write_csv(&dir, &body)).unwrap();

    let points = aggregate::cumulative_fatalities(&dataset.table).unwrap();
    let cumulative: Vec<f64> = points.iter().map(|p| p.cumulative).collect();
    assert_eq!(cumulative, vec![12.0, 12.0, 186.0]);
    assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_battery_renders_ten_charts_into_output_dir() {
    let dir = TempDir::new().unwrap();
    let dataset = load_and_prepare(&scenario_csv(&dir)).unwrap();
    let out_dir = dir.path().join("charts");
    let config = Config {
        output_dir: out_dir.clone(),
        ..Config::default()
    };
    let renderer = RecordingRenderer::default();
    let mut out = Vec::new();

    let report = battery::run(&dataset, &config, &renderer, &mut out).unwrap();

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 10);
    for ((_, path), step) in calls.iter().zip(battery::STEPS.iter()) {
        assert_eq!(path, &out_dir.join(step.file_name));
    }
    assert_eq!(report.saved.len(), 10);
    assert_eq!(report.summary.total_crashes, 3);
    assert_eq!(report.summary.total_fatalities, 40.0);
    assert_eq!(report.summary.worst_year, Some(1960));

    let text = String::from_utf8(out).unwrap();
    let progress: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
    assert_eq!(progress.len(), 10);
    assert!(progress[0].starts_with("[1/10]"));
    assert!(progress[9].starts_with("[10/10]"));
    assert_eq!(text.matches("  ✓ Saved: viz_").count(), 10);
}

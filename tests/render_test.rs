//! The chart battery through the real PNG renderer at a low resolution.

use std::fs;
use std::path::Path;

use crashviz::data::{LoadReport, PrepareReport, PreparedRecord, PreparedTable, RawFields};
use crashviz::{battery, Config, Dataset, StaticChartRenderer};
use tempfile::TempDir;

fn record(
    date: &str,
    operator: &str,
    aircraft: &str,
    aboard: &str,
    fatalities: &str,
) -> PreparedRecord {
    PreparedRecord::from_raw(&RawFields {
        crash_date: Some(date),
        operator: Some(operator),
        aircraft_type: Some(aircraft),
        aboard: Some(aboard),
        fatalities: Some(fatalities),
        ..Default::default()
    })
    .unwrap()
}

fn dataset(records: &[PreparedRecord]) -> Dataset {
    Dataset {
        table: PreparedTable::from_records(records).unwrap(),
        load: LoadReport::default(),
        prepare: PrepareReport::default(),
    }
}

fn render_battery(dataset: &Dataset, out_dir: &Path) -> usize {
    let mut config = Config {
        output_dir: out_dir.to_path_buf(),
        ..Config::default()
    };
    config.render.dpi = 36;
    let renderer = StaticChartRenderer::new(&config.render);
    let mut out = Vec::new();

    let report = battery::run(dataset, &config, &renderer, &mut out).unwrap();
    report.saved.len()
}

fn assert_all_charts_written(out_dir: &Path) {
    for step in battery::STEPS.iter() {
        let path = out_dir.join(step.file_name);
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        assert!(size > 0, "{} was not written", path.display());
    }
}

#[test]
fn test_battery_writes_ten_pngs() {
    let dir = TempDir::new().unwrap();
    let data = dataset(&[
        record("09/17/1908", "Military - U.S. Army", "Wright Flyer III", "2", "1"),
        record("07/12/1950", "US Navy", "Douglas R4D", "10", "10"),
        record("08/01/1950", "Delta Air Lines", "DC-3", "50", "0"),
        record("03/03/1961", "Aeroflot", "Il-18", "0", "30"),
        record("11/23/1996", "Ethiopian Airlines", "B-767", "175", "125"),
    ]);

    assert_eq!(render_battery(&data, dir.path()), 10);
    assert_all_charts_written(dir.path());
}

#[test]
fn test_battery_renders_single_record() {
    let dir = TempDir::new().unwrap();
    let data = dataset(&[record("07/12/1950", "US Navy", "Douglas R4D", "10", "10")]);

    assert_eq!(render_battery(&data, dir.path()), 10);
    assert_all_charts_written(dir.path());
}

#[test]
fn test_battery_renders_empty_table() {
    let dir = TempDir::new().unwrap();
    let data = dataset(&[]);

    assert_eq!(render_battery(&data, dir.path()), 10);
    assert_all_charts_written(dir.path());
}

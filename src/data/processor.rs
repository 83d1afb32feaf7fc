//! Data Processor Module
//! Turns the raw accident table into the prepared, fully derived table.

use crate::data::columns::{self, RAW_FIELDS};
use crate::data::record::{DropReason, PreparedRecord, RawFields};
use crate::error::{Error, Result};
use chrono::Datelike;
use polars::prelude::*;
use tracing::{debug, info};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Counters collected while preparing the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Rows entering the filters.
    pub input_rows: usize,
    /// Rows dropped for a missing or unparseable Fatalities/Aboard.
    pub missing_counts: usize,
    /// Rows dropped for an unparseable CrashDate.
    pub unparseable_dates: usize,
    /// Rows kept.
    pub kept: usize,
}

/// The prepared record set.
///
/// Built once and only ever handed out by shared reference, so every chart
/// step reads the same rows.
#[derive(Debug, Clone)]
pub struct PreparedTable {
    df: DataFrame,
}

impl PreparedTable {
    /// Assemble the table from already derived records.
    pub fn from_records(records: &[PreparedRecord]) -> Result<Self> {
        let days: Vec<i32> = records
            .iter()
            .map(|r| r.crash_date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let crash_date = Column::new(columns::CRASH_DATE.into(), days).cast(&DataType::Date)?;

        let text = |f: &dyn Fn(&PreparedRecord) -> Option<&str>| -> Vec<Option<String>> {
            records.iter().map(|r| f(r).map(str::to_owned)).collect()
        };

        let df = DataFrame::new(vec![
            crash_date,
            Column::new(columns::TIME.into(), text(&|r| r.time.as_deref())),
            Column::new(columns::LOCATION.into(), text(&|r| r.location.as_deref())),
            Column::new(columns::OPERATOR.into(), text(&|r| r.operator.as_deref())),
            Column::new(columns::TYPE.into(), text(&|r| r.aircraft_type.as_deref())),
            Column::new(
                columns::FATALITIES.into(),
                records.iter().map(|r| r.fatalities).collect::<Vec<f64>>(),
            ),
            Column::new(
                columns::ABOARD.into(),
                records.iter().map(|r| r.aboard).collect::<Vec<f64>>(),
            ),
            Column::new(columns::SUMMARY.into(), text(&|r| r.summary.as_deref())),
            Column::new(
                columns::YEAR.into(),
                records.iter().map(|r| r.year).collect::<Vec<i32>>(),
            ),
            Column::new(
                columns::DECADE.into(),
                records.iter().map(|r| r.decade).collect::<Vec<i32>>(),
            ),
            Column::new(
                columns::PERIOD.into(),
                records.iter().map(|r| r.period).collect::<Vec<i32>>(),
            ),
            Column::new(
                columns::FATALITY_RATIO.into(),
                records.iter().map(|r| r.fatality_ratio).collect::<Vec<f64>>(),
            ),
            Column::new(
                columns::IS_FATAL.into(),
                records.iter().map(|r| r.is_fatal).collect::<Vec<bool>>(),
            ),
            Column::new(
                columns::OPERATOR_CATEGORY.into(),
                records
                    .iter()
                    .map(|r| r.operator_category.as_str())
                    .collect::<Vec<&str>>(),
            ),
        ])?;

        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Earliest and latest Year, `None` for an empty table.
    pub fn year_range(&self) -> Result<Option<(i32, i32)>> {
        let years = columns::i32_values(&self.df, columns::YEAR)?;
        let min = years.iter().copied().min();
        let max = years.iter().copied().max();
        Ok(min.zip(max))
    }
}

/// Handles data cleaning and derivation.
#[derive(Debug)]
pub struct DataProcessor;

impl DataProcessor {
    /// Strip every character outside `[A-Za-z0-9_]` from a header and map
    /// the primary date column to `CrashDate`.
    pub fn normalize_column_name(name: &str) -> String {
        let stripped: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if stripped == "Date" {
            columns::CRASH_DATE.to_string()
        } else {
            stripped
        }
    }

    /// Rename every column of `df` in place.
    pub fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| Self::normalize_column_name(name.as_str()))
            .collect();
        df.set_column_names(names.iter().map(String::as_str))?;
        Ok(())
    }

    /// Keep only the eight fields the analysis uses.
    pub fn project(df: &DataFrame) -> Result<DataFrame> {
        let present: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        if let Some(missing) = RAW_FIELDS.iter().find(|f| !present.contains(*f)) {
            return Err(Error::MissingColumn {
                name: (*missing).to_string(),
            });
        }
        Ok(df.select(RAW_FIELDS)?)
    }

    /// Run normalization, projection, filtering and derivation.
    ///
    /// Rows lacking a usable Fatalities or Aboard value are dropped first,
    /// then rows whose date does not parse; survivors get every derived
    /// column.
    pub fn prepare(mut raw: DataFrame) -> Result<(PreparedTable, PrepareReport)> {
        Self::normalize_column_names(&mut raw)?;
        let projected = Self::project(&raw)?;

        let crash_date = text_column(&projected, columns::CRASH_DATE)?;
        let time = text_column(&projected, columns::TIME)?;
        let location = text_column(&projected, columns::LOCATION)?;
        let operator = text_column(&projected, columns::OPERATOR)?;
        let aircraft_type = text_column(&projected, columns::TYPE)?;
        let fatalities = text_column(&projected, columns::FATALITIES)?;
        let aboard = text_column(&projected, columns::ABOARD)?;
        let summary = text_column(&projected, columns::SUMMARY)?;

        let mut report = PrepareReport {
            input_rows: projected.height(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(projected.height());

        for i in 0..projected.height() {
            let raw = RawFields {
                crash_date: crash_date.get(i),
                time: time.get(i),
                location: location.get(i),
                operator: operator.get(i),
                aircraft_type: aircraft_type.get(i),
                fatalities: fatalities.get(i),
                aboard: aboard.get(i),
                summary: summary.get(i),
            };
            match PreparedRecord::from_raw(&raw) {
                Ok(record) => records.push(record),
                Err(DropReason::MissingCount) => report.missing_counts += 1,
                Err(DropReason::UnparseableDate) => report.unparseable_dates += 1,
            }
        }
        report.kept = records.len();

        debug!(
            missing_counts = report.missing_counts,
            unparseable_dates = report.unparseable_dates,
            "dropped incomplete records"
        );
        info!(kept = report.kept, "prepared accident table");

        Ok((PreparedTable::from_records(&records)?, report))
    }
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

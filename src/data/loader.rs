//! CSV Data Loader Module
//! Reads the accident dataset into a string-typed Polars DataFrame.

use crate::error::{Error, Result};
use polars::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Counters collected while reading the raw table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows kept.
    pub rows: usize,
    /// Rows skipped for a wrong field count or a CSV syntax error.
    pub malformed_rows: usize,
}

/// The raw dataset: one nullable string column per header, as written.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub df: DataFrame,
    pub report: LoadReport,
}

/// Handles CSV loading. The dataset is Latin-1 encoded and contains the odd
/// ragged row; those rows are skipped rather than failing the load.
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load the CSV file at `path`.
    ///
    /// Fails with [`Error::SourceNotFound`] before touching anything else when
    /// the path does not exist.
    pub fn load_csv(path: &Path) -> Result<RawTable> {
        if !path.exists() {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path)?;
        let table = Self::read_csv(decode_latin1(&bytes).as_bytes())?;
        info!(
            path = %path.display(),
            rows = table.report.rows,
            malformed = table.report.malformed_rows,
            "loaded raw dataset"
        );
        Ok(table)
    }

    /// Parse already-decoded CSV text with a header row.
    pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut report = LoadReport::default();

        for (line, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) if record.len() == headers.len() => record,
                Ok(record) => {
                    debug!(line = line + 2, fields = record.len(), "skipping ragged row");
                    report.malformed_rows += 1;
                    continue;
                }
                Err(err) => {
                    debug!(line = line + 2, error = %err, "skipping unreadable row");
                    report.malformed_rows += 1;
                    continue;
                }
            };

            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push((!field.is_empty()).then(|| field.to_owned()));
            }
            report.rows += 1;
        }

        let df = DataFrame::new(
            headers
                .iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name.as_str().into(), values))
                .collect(),
        )?;

        Ok(RawTable { df, report })
    }
}

/// Decode Latin-1 text: every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Bogot\xe1"), "Bogotá");
        assert_eq!(decode_latin1(b"plain"), "plain");
    }

    #[test]
    fn test_read_csv_skips_ragged_rows() {
        let text = "Date,Operator,Aboard\n\
                    09/17/1908,Military - U.S. Army,2\n\
                    07/12/1912,too,many,fields\n\
                    08/06/1913,Private\n\
                    09/09/1913,Military - German Navy,20\n";
        let table = DataLoader::read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.report.rows, 2);
        assert_eq!(table.report.malformed_rows, 2);
        assert_eq!(table.df.height(), 2);
        assert_eq!(table.df.width(), 3);
    }

    #[test]
    fn test_read_csv_empty_fields_are_null() {
        let text = "Date,Fatalities\n01/01/1950,\n01/02/1950,  \n01/03/1950,4\n";
        let table = DataLoader::read_csv(text.as_bytes()).unwrap();
        let fatalities = table.df.column("Fatalities").unwrap();
        assert_eq!(fatalities.null_count(), 1);
    }

    #[test]
    fn test_read_csv_keeps_blank_operator() {
        let text = "Date,Operator\n01/01/1950,   \n01/02/1950,\n";
        let table = DataLoader::read_csv(text.as_bytes()).unwrap();
        let operator = table.df.column("Operator").unwrap().as_materialized_series().str().unwrap();
        assert_eq!(operator.get(0), Some("   "));
        assert_eq!(operator.get(1), None);
    }

    #[test]
    fn test_read_csv_quoted_commas() {
        let text = "Date,Summary\n01/01/1950,\"Engine fire, then ditching.\"\n";
        let table = DataLoader::read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.report.malformed_rows, 0);
        let summary = table.df.column("Summary").unwrap().as_materialized_series().str().unwrap();
        assert_eq!(summary.get(0), Some("Engine fire, then ditching."));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = DataLoader::load_csv(Path::new("/nonexistent/crashes.csv")).unwrap_err();
        assert!(err.is_source_not_found());
    }

    #[test]
    fn test_load_csv_decodes_latin1_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashes.csv");
        fs::write(&path, b"Date,Location\n01/01/1950,S\xe3o Paulo\n").unwrap();

        let table = DataLoader::load_csv(&path).unwrap();
        let location = table.df.column("Location").unwrap().as_materialized_series().str().unwrap();
        assert_eq!(location.get(0), Some("São Paulo"));
    }
}

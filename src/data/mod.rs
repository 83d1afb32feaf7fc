//! Data module - CSV loading and preparation

pub mod columns;
mod loader;
mod processor;
mod record;

pub use loader::{decode_latin1, DataLoader, LoadReport, RawTable};
pub use processor::{DataProcessor, PrepareReport, PreparedTable};
pub use record::{
    decade_of, fatality_ratio, parse_count, parse_crash_date, period_of, DropReason,
    OperatorCategory, PreparedRecord, RawFields, FATAL_RATIO_THRESHOLD, MILITARY_KEYWORDS,
};

use crate::error::Result;
use std::path::Path;

/// A prepared table together with the counters gathered on the way.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: PreparedTable,
    pub load: LoadReport,
    pub prepare: PrepareReport,
}

/// Load the CSV at `path` and run the whole preparation pipeline.
pub fn load_and_prepare(path: &Path) -> Result<Dataset> {
    let raw = DataLoader::load_csv(path)?;
    let (table, prepare) = DataProcessor::prepare(raw.df)?;
    Ok(Dataset {
        table,
        load: raw.report,
        prepare,
    })
}

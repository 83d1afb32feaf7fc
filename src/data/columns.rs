//! Column names of the prepared table and typed extraction helpers.

use polars::prelude::*;

pub const CRASH_DATE: &str = "CrashDate";
pub const TIME: &str = "Time";
pub const LOCATION: &str = "Location";
pub const OPERATOR: &str = "Operator";
pub const TYPE: &str = "Type";
pub const FATALITIES: &str = "Fatalities";
pub const ABOARD: &str = "Aboard";
pub const SUMMARY: &str = "Summary";
pub const YEAR: &str = "Year";
pub const DECADE: &str = "Decade";
pub const PERIOD: &str = "Period";
pub const FATALITY_RATIO: &str = "FatalityRatio";
pub const IS_FATAL: &str = "IsFatal";
pub const OPERATOR_CATEGORY: &str = "OperatorCategory";

/// Aggregation output column holding a row count.
pub const COUNT: &str = "Count";

/// Fields retained by the projection step, in order.
pub const RAW_FIELDS: [&str; 8] = [
    CRASH_DATE, TIME, LOCATION, OPERATOR, TYPE, FATALITIES, ABOARD, SUMMARY,
];

/// Column values as `f64`, nulls as NaN.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Column values as `i32`, nulls dropped.
pub fn i32_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<i32>> {
    let column = df.column(name)?.cast(&DataType::Int32)?;
    Ok(column
        .as_materialized_series()
        .i32()?
        .into_iter()
        .flatten()
        .collect())
}

/// Column values as `u64` counts, nulls as 0.
pub fn count_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<u64>> {
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(column
        .as_materialized_series()
        .u64()?
        .into_iter()
        .map(|v| v.unwrap_or_default())
        .collect())
}

/// Column values as owned strings, nulls as empty strings.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let column = df.column(name)?;
    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Column values as booleans, nulls as false.
pub fn bool_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<bool>> {
    let column = df.column(name)?;
    Ok(column
        .as_materialized_series()
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect())
}

//! Aggregation queries over the prepared table.
//!
//! Every query is a pure read: it clones the (cheap, Arc-backed) frame into a
//! lazy query, collects a small result and converts it to plain Rust types
//! for the chart models. Nothing is cached between chart steps.

use crate::data::columns::{
    bool_values, count_values, f64_values, i32_values, string_values, ABOARD, COUNT, DECADE,
    FATALITIES, FATALITY_RATIO, IS_FATAL, OPERATOR, OPERATOR_CATEGORY, PERIOD, TYPE, YEAR,
};
use crate::data::{OperatorCategory, PreparedTable};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const CUMULATIVE: &str = "Cumulative";

/// Crash count and fatality sum of one operator category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: OperatorCategory,
    pub crashes: u64,
    pub fatalities: f64,
}

/// A label ranked by a numeric value (operator by crashes, type by deaths).
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityPoint {
    pub aboard: f64,
    pub fatality_ratio: f64,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecadeTrend {
    pub decade: i32,
    pub crashes: u64,
    pub fatalities: f64,
}

/// Mean fatalities per (category, period); `None` where a category has no
/// crash in a period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodHeatmap {
    pub periods: Vec<i32>,
    pub rows: Vec<(OperatorCategory, Vec<Option<f64>>)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRatios {
    pub military: Vec<f64>,
    pub civilian: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecadeSeverity {
    pub decade: i32,
    pub non_fatal: u64,
    pub fatal: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativePoint {
    pub year: i32,
    pub fatalities: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecadeSample {
    pub decade: i32,
    pub fatalities: Vec<f64>,
}

fn lazy(table: &PreparedTable) -> LazyFrame {
    table.dataframe().clone().lazy()
}

/// Group `key` (nulls excluded), rank by `value` descending with ties broken
/// by key ascending, keep the first `n`.
pub(crate) fn ranked_by(
    table: &PreparedTable,
    key: &str,
    value: Expr,
    value_name: &str,
    n: usize,
) -> Result<Vec<Ranked>> {
    let df = lazy(table)
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([value.alias(value_name)])
        .sort(
            [value_name, key],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(n as IdxSize)
        .collect()?;

    let labels = string_values(&df, key)?;
    let values = f64_values(&df, value_name)?;
    Ok(labels
        .into_iter()
        .zip(values)
        .map(|(label, value)| Ranked { label, value })
        .collect())
}

/// Crash count and fatality sum per operator category, Military first.
pub fn category_totals(table: &PreparedTable) -> Result<Vec<CategoryTotal>> {
    let df = lazy(table)
        .group_by([col(OPERATOR_CATEGORY)])
        .agg([len().alias(COUNT), col(FATALITIES).sum()])
        .collect()?;

    let names = string_values(&df, OPERATOR_CATEGORY)?;
    let crashes = count_values(&df, COUNT)?;
    let fatalities = f64_values(&df, FATALITIES)?;

    let mut totals: Vec<CategoryTotal> = names
        .iter()
        .zip(crashes)
        .zip(fatalities)
        .filter_map(|((name, crashes), fatalities)| {
            OperatorCategory::from_label(name).map(|category| CategoryTotal {
                category,
                crashes,
                fatalities,
            })
        })
        .collect();
    totals.sort_by_key(|t| t.category);
    Ok(totals)
}

/// The `n` operators with the most crashes.
pub fn top_operators(table: &PreparedTable, n: usize) -> Result<Vec<Ranked>> {
    ranked_by(table, OPERATOR, len(), COUNT, n)
}

/// (Aboard, FatalityRatio, Year) of every record.
pub fn capacity_points(table: &PreparedTable) -> Result<Vec<CapacityPoint>> {
    let df = table.dataframe();
    let aboard = f64_values(df, ABOARD)?;
    let ratio = f64_values(df, FATALITY_RATIO)?;
    let year = i32_values(df, YEAR)?;

    Ok(aboard
        .into_iter()
        .zip(ratio)
        .zip(year)
        .map(|((aboard, fatality_ratio), year)| CapacityPoint {
            aboard,
            fatality_ratio,
            year,
        })
        .collect())
}

/// Crash count and fatality sum per decade, ascending.
///
/// Crashes are counted by recorded operator, so a record without one adds
/// its deaths to the decade but not to the count.
pub fn decade_trend(table: &PreparedTable) -> Result<Vec<DecadeTrend>> {
    let df = lazy(table)
        .group_by([col(DECADE)])
        .agg([col(OPERATOR).count().alias(COUNT), col(FATALITIES).sum()])
        .sort([DECADE], SortMultipleOptions::default())
        .collect()?;

    let decades = i32_values(&df, DECADE)?;
    let crashes = count_values(&df, COUNT)?;
    let fatalities = f64_values(&df, FATALITIES)?;

    Ok(decades
        .into_iter()
        .zip(crashes)
        .zip(fatalities)
        .map(|((decade, crashes), fatalities)| DecadeTrend {
            decade,
            crashes,
            fatalities,
        })
        .collect())
}

/// Mean fatalities per (category, period) over the `last_periods` most
/// recent distinct periods.
pub fn period_heatmap(table: &PreparedTable, last_periods: usize) -> Result<PeriodHeatmap> {
    let all_periods: BTreeSet<i32> = i32_values(table.dataframe(), PERIOD)?.into_iter().collect();
    let skip = all_periods.len().saturating_sub(last_periods);
    let periods: Vec<i32> = all_periods.into_iter().skip(skip).collect();

    let Some(&cutoff) = periods.first() else {
        return Ok(PeriodHeatmap {
            periods,
            rows: Vec::new(),
        });
    };

    let df = lazy(table)
        .filter(col(PERIOD).gt_eq(lit(cutoff)))
        .group_by([col(OPERATOR_CATEGORY), col(PERIOD)])
        .agg([col(FATALITIES).mean()])
        .collect()?;

    let names = string_values(&df, OPERATOR_CATEGORY)?;
    let cell_periods = i32_values(&df, PERIOD)?;
    let means = f64_values(&df, FATALITIES)?;

    let mut cells: BTreeMap<OperatorCategory, BTreeMap<i32, f64>> = BTreeMap::new();
    for ((name, period), mean) in names.iter().zip(cell_periods).zip(means) {
        if let Some(category) = OperatorCategory::from_label(name) {
            cells.entry(category).or_default().insert(period, mean);
        }
    }

    let rows = cells
        .into_iter()
        .map(|(category, by_period)| {
            let row = periods.iter().map(|p| by_period.get(p).copied()).collect();
            (category, row)
        })
        .collect();

    Ok(PeriodHeatmap { periods, rows })
}

/// FatalityRatio values split by operator category.
pub fn ratio_by_category(table: &PreparedTable) -> Result<CategoryRatios> {
    let values_for = |category: OperatorCategory| -> Result<Vec<f64>> {
        let df = lazy(table)
            .filter(col(OPERATOR_CATEGORY).eq(lit(category.as_str())))
            .select([col(FATALITY_RATIO)])
            .collect()?;
        Ok(f64_values(&df, FATALITY_RATIO)?)
    };

    Ok(CategoryRatios {
        military: values_for(OperatorCategory::Military)?,
        civilian: values_for(OperatorCategory::Civilian)?,
    })
}

/// Non-fatal and fatal crash counts per decade. Every decade present in the
/// table gets both counts, zero where no crash of that kind happened.
pub fn severity_by_decade(table: &PreparedTable) -> Result<Vec<DecadeSeverity>> {
    let df = lazy(table)
        .group_by([col(DECADE), col(IS_FATAL)])
        .agg([len().alias(COUNT)])
        .collect()?;

    let decades = i32_values(&df, DECADE)?;
    let fatal_flags = bool_values(&df, IS_FATAL)?;
    let counts = count_values(&df, COUNT)?;

    let mut dense: BTreeMap<i32, DecadeSeverity> = BTreeMap::new();
    for ((decade, is_fatal), count) in decades.into_iter().zip(fatal_flags).zip(counts) {
        let entry = dense.entry(decade).or_insert(DecadeSeverity {
            decade,
            non_fatal: 0,
            fatal: 0,
        });
        if is_fatal {
            entry.fatal += count;
        } else {
            entry.non_fatal += count;
        }
    }

    Ok(dense.into_values().collect())
}

/// The `n` aircraft types with the highest fatality sum.
pub fn top_types_by_fatalities(table: &PreparedTable, n: usize) -> Result<Vec<Ranked>> {
    ranked_by(table, TYPE, col(FATALITIES).sum(), FATALITIES, n)
}

/// Fatalities per year, ascending, with the running total.
pub fn cumulative_fatalities(table: &PreparedTable) -> Result<Vec<CumulativePoint>> {
    let df = lazy(table)
        .group_by([col(YEAR)])
        .agg([col(FATALITIES).sum()])
        .sort([YEAR], SortMultipleOptions::default())
        .with_column(col(FATALITIES).cum_sum(false).alias(CUMULATIVE))
        .collect()?;

    let years = i32_values(&df, YEAR)?;
    let fatalities = f64_values(&df, FATALITIES)?;
    let cumulative = f64_values(&df, CUMULATIVE)?;

    Ok(years
        .into_iter()
        .zip(fatalities)
        .zip(cumulative)
        .map(|((year, fatalities), cumulative)| CumulativePoint {
            year,
            fatalities,
            cumulative,
        })
        .collect())
}

/// Per-crash fatalities grouped by decade, for crashes from `min_year` on.
pub fn fatalities_by_decade(table: &PreparedTable, min_year: i32) -> Result<Vec<DecadeSample>> {
    let recent = lazy(table)
        .filter(col(YEAR).gt_eq(lit(min_year)))
        .select([col(DECADE), col(FATALITIES)])
        .collect()?;

    let decades: BTreeSet<i32> = i32_values(&recent, DECADE)?.into_iter().collect();
    decades
        .into_iter()
        .map(|decade| -> Result<DecadeSample> {
            let df = recent
                .clone()
                .lazy()
                .filter(col(DECADE).eq(lit(decade)))
                .collect()?;
            Ok(DecadeSample {
                decade,
                fatalities: f64_values(&df, FATALITIES)?,
            })
        })
        .collect()
}

//! Closing summary statistics.

use crate::data::columns::{
    bool_values, f64_values, i32_values, FATALITIES, IS_FATAL, OPERATOR, YEAR,
};
use crate::data::PreparedTable;
use crate::error::Result;
use crate::stats::aggregate::ranked_by;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Headline numbers printed after the chart battery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_crashes: usize,
    pub total_fatalities: f64,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// Share of crashes in which at least half of those aboard died.
    pub fatal_share: f64,
    /// Operator with the highest fatality sum (alphabetically first on a tie).
    pub deadliest_operator: Option<String>,
    /// Year with the highest fatality sum (earliest on a tie).
    pub worst_year: Option<i32>,
    pub worst_year_fatalities: f64,
}

impl Summary {
    pub fn compute(table: &PreparedTable) -> Result<Self> {
        let df = table.dataframe();
        let total_fatalities: f64 = f64_values(df, FATALITIES)?.iter().sum();
        let fatal_flags = bool_values(df, IS_FATAL)?;
        let fatal_share = if fatal_flags.is_empty() {
            0.0
        } else {
            fatal_flags.iter().filter(|&&f| f).count() as f64 / fatal_flags.len() as f64
        };
        let years = table.year_range()?;

        let deadliest_operator = ranked_by(table, OPERATOR, col(FATALITIES).sum(), FATALITIES, 1)?
            .into_iter()
            .next()
            .map(|r| r.label);

        let worst = Self::worst_year(table)?;

        Ok(Self {
            total_crashes: table.len(),
            total_fatalities,
            first_year: years.map(|(first, _)| first),
            last_year: years.map(|(_, last)| last),
            fatal_share,
            deadliest_operator,
            worst_year: worst.map(|(year, _)| year),
            worst_year_fatalities: worst.map(|(_, total)| total).unwrap_or(0.0),
        })
    }

    fn worst_year(table: &PreparedTable) -> Result<Option<(i32, f64)>> {
        let df = table
            .dataframe()
            .clone()
            .lazy()
            .group_by([col(YEAR)])
            .agg([col(FATALITIES).sum()])
            .sort(
                [FATALITIES, YEAR],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(1)
            .collect()?;

        let years = i32_values(&df, YEAR)?;
        let sums = f64_values(&df, FATALITIES)?;
        Ok(years.into_iter().zip(sums).next())
    }
}

/// Group digits in thousands: `12345` -> `12,345`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = match (self.first_year, self.last_year) {
            (Some(first), Some(last)) => format!("{first} - {last}"),
            _ => "n/a".to_string(),
        };
        writeln!(f, "📊 Total crashes: {}", thousands(self.total_crashes as u64))?;
        writeln!(
            f,
            "💀 Total fatalities: {}",
            thousands(self.total_fatalities.round() as u64)
        )?;
        writeln!(f, "📅 Date range: {span}")?;
        writeln!(
            f,
            "⚠️  Fatal crash share (≥50%): {:.1}%",
            self.fatal_share * 100.0
        )?;
        writeln!(
            f,
            "✈️  Deadliest operator: {}",
            self.deadliest_operator.as_deref().unwrap_or("n/a")
        )?;
        match self.worst_year {
            Some(year) => write!(
                f,
                "📈 Worst year: {year} ({} deaths)",
                self.worst_year_fatalities.round() as u64
            ),
            None => write!(f, "📈 Worst year: n/a"),
        }
    }
}

//! Date parsing and derived duration feature
//!
//! Dates arrive as month-year text (`Dec-2015`). They are stored as polars
//! `Date` columns, and the signed day count between the issue date and the
//! earliest credit line becomes a new Int64 feature.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::info;

use super::error::PrepError;
use super::stage::Stage;

/// Days between 0001-01-01 (chrono's CE day 1) and the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Month-year date parser driven by a chrono format string
#[derive(Debug, Clone)]
pub struct DateFormat {
    format: String,
    implied_day: bool,
}

impl DateFormat {
    pub fn new(format: impl Into<String>) -> Self {
        let format = format.into();
        let implied_day = !(format.contains("%d") || format.contains("%e") || format.contains("%j"));
        Self {
            format,
            implied_day,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.format
    }

    /// Parse one value. Formats without a day directive resolve to the 1st.
    ///
    /// chrono is lenient about field widths (`%Y` takes `15` or `+2015`), so
    /// a parsed date must render back to the input text, ignoring case.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let date = if self.implied_day {
            let padded = format!("01|{}", value);
            NaiveDate::parse_from_str(&padded, &format!("%d|{}", self.format)).ok()?
        } else {
            NaiveDate::parse_from_str(value, &self.format).ok()?
        };

        let rendered = date.format(&self.format).to_string();
        rendered.eq_ignore_ascii_case(value).then_some(date)
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new("%b-%Y")
    }
}

/// Days since the Unix epoch, the physical representation of polars `Date`
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Parse a text column into dates. Nulls stay null; any other mismatch is fatal.
pub fn parse_date_column(df: &DataFrame, column: &str, format: &DateFormat) -> Result<Vec<Option<NaiveDate>>> {
    let text = df
        .column(column)?
        .cast(&DataType::String)
        .with_context(|| format!("Failed to read '{}' as text", column))?;

    text.str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(v) => format.parse(v).map(Some).ok_or_else(|| {
                PrepError::DateParse {
                    column: column.to_string(),
                    row,
                    value: v.to_string(),
                    format: format.as_str().to_string(),
                }
                .into()
            }),
        })
        .collect()
}

/// Build a polars `Date` series from parsed values
pub fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> Result<Series> {
    let ca: Int32Chunked = dates.iter().map(|d| d.map(to_epoch_days)).collect();
    Ok(ca.with_name(name.into()).into_series().cast(&DataType::Date)?)
}

/// Calendar year of every value in a `Date` column
pub fn date_column_years(df: &DataFrame, column: &str) -> Result<Vec<Option<i32>>> {
    let col = df.column(column)?;
    if col.dtype() != &DataType::Date {
        return Err(PrepError::UnexpectedType {
            column: column.to_string(),
            actual: col.dtype().to_string(),
            expected: "Date",
        }
        .into());
    }

    let days = col.cast(&DataType::Int32)?;
    let years = days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(from_epoch_days).map(|date| date.year()))
        .collect();
    Ok(years)
}

/// Stage that parses the issue and earliest-credit dates and derives their gap in days
#[derive(Debug, Clone)]
pub struct TemporalFeatures {
    pub issue_column: String,
    pub earliest_credit_column: String,
    pub duration_column: String,
    pub format: DateFormat,
}

impl Stage for TemporalFeatures {
    fn name(&self) -> &'static str {
        "derive_dates"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.issue_column.clone(), self.earliest_credit_column.clone()]
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        info!(format = self.format.as_str(), "convert dates to datetime object");
        let issue = parse_date_column(&df, &self.issue_column, &self.format)?;
        let earliest = parse_date_column(&df, &self.earliest_credit_column, &self.format)?;

        info!("number of days between the issue date of a loan and the earliest reported credit");
        let days: Vec<Option<i64>> = issue
            .iter()
            .zip(&earliest)
            .map(|(i, e)| match (i, e) {
                (Some(i), Some(e)) => Some((*i - *e).num_days()),
                _ => None,
            })
            .collect();

        let mut df = df;
        df.with_column(date_series(&self.issue_column, &issue)?)?;
        df.with_column(date_series(&self.earliest_credit_column, &earliest)?)?;
        df.with_column(Column::new(self.duration_column.as_str().into(), days))?;
        Ok(df)
    }
}

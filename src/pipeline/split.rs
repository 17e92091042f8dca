//! Out-of-time train/test split on the issue year

use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use super::temporal::date_column_years;

/// Training and out-of-sample partitions of the prepared frame
#[derive(Debug, Clone)]
pub struct TemporalSplit {
    pub train: DataFrame,
    pub oos: DataFrame,
    /// Rows whose issue year is in neither list, or whose issue date is null
    pub unassigned: usize,
}

/// Partition rows by the calendar year of `issue_column`.
///
/// The column must already be a `Date`. Rows with a year outside both lists
/// are left out of both partitions.
pub fn split_by_issue_year(
    df: &DataFrame,
    issue_column: &str,
    training_years: &[i32],
    oos_years: &[i32],
) -> Result<TemporalSplit> {
    info!(?training_years, ?oos_years, "separate training set from testing by year");

    let years = date_column_years(df, issue_column)?;

    let in_years = |wanted: &[i32]| -> Vec<bool> {
        years
            .iter()
            .map(|y| y.is_some_and(|y| wanted.contains(&y)))
            .collect()
    };

    let train_mask = Series::new("train".into(), in_years(training_years));
    let oos_mask = Series::new("oos".into(), in_years(oos_years));

    let train = df.filter(train_mask.bool()?)?;
    let oos = df.filter(oos_mask.bool()?)?;
    let unassigned = years
        .iter()
        .filter(|y| !y.is_some_and(|y| training_years.contains(&y) || oos_years.contains(&y)))
        .count();

    info!(
        train_rows = train.height(),
        oos_rows = oos.height(),
        unassigned,
        "split complete"
    );

    Ok(TemporalSplit {
        train,
        oos,
        unassigned,
    })
}

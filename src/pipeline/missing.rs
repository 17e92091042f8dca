//! Missing value analysis and reduction

use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use super::stage::Stage;

/// Missing percentage (0-100) of every column, sorted descending.
///
/// A frame without rows reports 0% for every column.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    let rows = df.height();

    let mut missing_pcts: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| {
            let pct = if rows == 0 {
                0.0
            } else {
                // Ratio first, then scaled. 7 of 100 yields 7.000000000000001,
                // so such a column is dropped at a threshold of exactly 7.
                col.null_count() as f64 / rows as f64 * 100.0
            };
            (col.name().to_string(), pct)
        })
        .collect();

    missing_pcts.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_pcts)
}

/// Columns whose missing percentage is strictly above `threshold`
pub fn get_high_missing_cols(missing_pcts: &[(String, f64)], threshold: f64) -> Vec<String> {
    missing_pcts
        .iter()
        .filter(|(_, pct)| *pct > threshold)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Stage that drops columns above the missing threshold
#[derive(Debug, Clone)]
pub struct MissingnessFilter {
    /// Percentage, 0-100
    pub threshold: f64,
}

impl Default for MissingnessFilter {
    fn default() -> Self {
        Self { threshold: 40.0 }
    }
}

impl Stage for MissingnessFilter {
    fn name(&self) -> &'static str {
        "drop_high_missing"
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        let missing_pcts = analyze_missing_values(&df)?;
        let to_drop = get_high_missing_cols(&missing_pcts, self.threshold);

        info!(
            count = to_drop.len(),
            columns = ?to_drop,
            "num cols with more than {}% missing",
            self.threshold
        );

        Ok(df.drop_many(to_drop.iter().map(|c| c.as_str())))
    }
}

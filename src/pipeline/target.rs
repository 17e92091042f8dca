//! Target derivation
//!
//! Loans are only labelled once they reach one of two terminal statuses.
//! Rows with any other status are removed and the status column is replaced
//! by a binary `target` column.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stage::Stage;

/// Mapping from status values to the binary label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (charged off)
    pub event_value: String,
    /// Value that maps to 0 (fully paid)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for values that match neither (unresolved loans)
pub fn create_target_mask(
    df: &DataFrame,
    status: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<i32>>> {
    let status_col = df
        .column(status)
        .with_context(|| format!("Status column '{}' not found", status))?;

    let text = status_col.cast(&DataType::String)?;

    let mask: Vec<Option<i32>> = text
        .str()?
        .into_iter()
        .map(|v| match v {
            Some(s) if s == mapping.event_value => Some(1),
            Some(s) if s == mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}

/// Count how many records match the event and non-event values
pub fn count_mapped_records(
    df: &DataFrame,
    status: &str,
    mapping: &TargetMapping,
) -> Result<(usize, usize, usize)> {
    let mask = create_target_mask(df, status, mapping)?;

    let events = mask.iter().filter(|v| **v == Some(1)).count();
    let non_events = mask.iter().filter(|v| **v == Some(0)).count();
    let ignored = mask.iter().filter(|v| v.is_none()).count();

    Ok((events, non_events, ignored))
}

/// Stage that keeps resolved loans and derives the label
#[derive(Debug, Clone)]
pub struct TargetDeriver {
    pub status_column: String,
    pub target_column: String,
    pub mapping: TargetMapping,
}

impl Stage for TargetDeriver {
    fn name(&self) -> &'static str {
        "derive_target"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.status_column.clone()]
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        info!("restrict to complete loans");
        let mask = create_target_mask(&df, &self.status_column, &self.mapping)?;

        let resolved = Series::new(
            "resolved".into(),
            mask.iter().map(Option::is_some).collect::<Vec<bool>>(),
        );
        let labels: Vec<i32> = mask.into_iter().flatten().collect();

        let rows_in = df.height();
        let mut df = df.filter(resolved.bool()?)?;
        let events = labels.iter().filter(|v| **v == 1).count();

        info!(
            kept = df.height(),
            dropped = rows_in - df.height(),
            events,
            non_events = labels.len() - events,
            "create target variable"
        );

        df.with_column(Column::new(self.target_column.as_str().into(), labels))?;
        Ok(df.drop(&self.status_column)?)
    }
}

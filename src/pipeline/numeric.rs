//! Final numeric feature list

use anyhow::Result;
use polars::prelude::*;

use super::error::PrepError;

/// Numeric columns of the training partition, in schema order, without the
/// identifier and target.
///
/// Both `id_column` and `target_column` must be numeric columns of `train`.
pub fn extract_numeric_columns(
    train: &DataFrame,
    id_column: &str,
    target_column: &str,
) -> Result<Vec<String>> {
    let mut numeric_cols: Vec<String> = train
        .get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect();

    for required in [id_column, target_column] {
        let pos = numeric_cols
            .iter()
            .position(|c| c == required)
            .ok_or_else(|| PrepError::MissingNumericColumn {
                column: required.to_string(),
            })?;
        numeric_cols.remove(pos);
    }

    Ok(numeric_cols)
}

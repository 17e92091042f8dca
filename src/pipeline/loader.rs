//! Dataset loader for CSV and Parquet files

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

/// Cell values read as missing in CSV input, besides empty fields
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Open a dataset lazily (CSV or Parquet based on extension).
///
/// For CSV input, `text_columns` that exist in the header are read as String
/// regardless of what schema inference would pick. The mixed id column needs
/// this: a file whose first rows hold plain integers would otherwise be typed
/// Int64 and fail on the first composite id.
pub fn scan_dataset(
    path: &Path,
    infer_schema_length: usize,
    text_columns: &[String],
) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let header = get_column_names(path)?;
            let overwrite: Schema = text_columns
                .iter()
                .filter(|c| header.contains(c))
                .map(|c| Field::new(c.as_str().into(), DataType::String))
                .collect();

            // 0 means full table scan
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };

            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .with_dtype_overwrite(Some(Arc::new(overwrite)))
                .with_null_values(Some(NullValues::AllColumns(
                    MISSING_TOKENS.iter().map(|t| (*t).into()).collect(),
                )))
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load a dataset fully into memory
pub fn load_dataset(
    path: &Path,
    infer_schema_length: usize,
    text_columns: &[String],
) -> Result<DataFrame> {
    info!(path = %path.display(), "loading data");
    let df = scan_dataset(path, infer_schema_length, text_columns)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    info!(rows, cols, "dataset loaded");
    Ok(df)
}

/// Column names of a dataset without loading its rows
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()
            .with_context(|| format!("Failed to read CSV header: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to read Parquet schema: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

/// Rough in-memory size of a frame in megabytes
pub fn estimated_size_mb(df: &DataFrame) -> f64 {
    df.estimated_size() as f64 / (1024.0 * 1024.0)
}

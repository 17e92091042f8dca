//! Stage contract shared by the table transformations
//!
//! Each stage declares the columns it needs and turns one frame into the next.
//! `run_stage` enforces the declaration so a column dropped upstream surfaces
//! as a schema error at the stage that needed it.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::Result;
use polars::prelude::*;
use tracing::{debug, info, info_span};

use super::error::PrepError;

/// One step of the preparation pipeline
pub trait Stage {
    /// Short name used in logs and the run summary
    fn name(&self) -> &'static str;

    /// Columns that must exist in the input frame
    fn required_columns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Transform the frame
    fn apply(&self, df: DataFrame) -> Result<DataFrame>;
}

/// What a stage did to the frame
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub name: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_in: usize,
    pub columns_out: usize,
    /// Input columns absent from the output
    pub dropped_columns: Vec<String>,
    pub elapsed: Duration,
}

impl StageRecord {
    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

/// Fail with `PrepError::MissingColumns` if any of `required` is absent from `df`
pub fn ensure_columns(df: &DataFrame, stage: &str, required: &[String]) -> Result<()> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.as_str())
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|c| !present.contains(c.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::MissingColumns {
            stage: stage.to_string(),
            missing,
        }
        .into())
    }
}

/// Check the stage's required columns, apply it, and record the effect
pub fn run_stage(stage: &dyn Stage, df: DataFrame) -> Result<(DataFrame, StageRecord)> {
    let span = info_span!("stage", name = stage.name());
    let _guard = span.enter();

    ensure_columns(&df, stage.name(), &stage.required_columns())?;

    let (rows_in, columns_in) = df.shape();
    let before: Vec<String> = column_names(&df);

    info!(rows = rows_in, columns = columns_in, "starting stage");
    let start = Instant::now();
    let out = stage.apply(df)?;
    let elapsed = start.elapsed();

    let after: HashSet<String> = column_names(&out).into_iter().collect();
    let dropped_columns: Vec<String> = before.into_iter().filter(|c| !after.contains(c)).collect();

    let (rows_out, columns_out) = out.shape();
    debug!(
        rows = rows_out,
        columns = columns_out,
        elapsed_ms = elapsed.as_millis() as u64,
        "finished stage"
    );

    let record = StageRecord {
        name: stage.name(),
        rows_in,
        rows_out,
        columns_in,
        columns_out,
        dropped_columns,
        elapsed,
    };

    Ok((out, record))
}

/// Owned column names in schema order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DropB;

    impl Stage for DropB {
        fn name(&self) -> &'static str {
            "drop_b"
        }

        fn required_columns(&self) -> Vec<String> {
            vec!["b".to_string()]
        }

        fn apply(&self, df: DataFrame) -> Result<DataFrame> {
            Ok(df.drop("b")?)
        }
    }

    #[test]
    fn test_run_stage_records_dropped_columns() {
        let df = df! {
            "a" => [1i32, 2, 3],
            "b" => [4i32, 5, 6],
        }
        .unwrap();

        let (out, record) = run_stage(&DropB, df).unwrap();
        assert_eq!(column_names(&out), vec!["a"]);
        assert_eq!(record.dropped_columns, vec!["b"]);
        assert_eq!(record.rows_in, 3);
        assert_eq!(record.rows_out, 3);
        assert_eq!(record.columns_in, 2);
        assert_eq!(record.columns_out, 1);
    }

    #[test]
    fn test_run_stage_rejects_missing_required_column() {
        let df = df! { "a" => [1i32, 2, 3] }.unwrap();

        let err = run_stage(&DropB, df).unwrap_err();
        match err.downcast_ref::<PrepError>() {
            Some(PrepError::MissingColumns { stage, missing }) => {
                assert_eq!(stage, "drop_b");
                assert_eq!(missing, &vec!["b".to_string()]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }
}

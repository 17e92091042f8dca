//! Artifact inspection: the consumer-side view of a preparation run

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::pipeline::{read_numeric_columns, read_partition};

/// Shapes and numeric feature list of a set of written artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSummary {
    pub train_shape: (usize, usize),
    pub test_shape: (usize, usize),
    pub numeric_columns: Vec<String>,
}

/// Load the three artifacts back from disk
pub fn load_artifacts(train: &Path, test: &Path, numeric_columns: &Path) -> Result<ArtifactSummary> {
    let train_df = read_partition(train)?;
    let test_df = read_partition(test)?;
    let numeric_columns = read_numeric_columns(numeric_columns)?;

    Ok(ArtifactSummary {
        train_shape: train_df.shape(),
        test_shape: test_df.shape(),
        numeric_columns,
    })
}

/// Load the artifacts and print what a model-training job would see
pub fn run_inspect(train: &Path, test: &Path, numeric_columns: &Path) -> Result<()> {
    let summary = load_artifacts(train, test, numeric_columns)?;

    println!(
        "\n {} Prepared artifacts",
        style("◆").cyan().bold()
    );
    println!("   Train: {}", style(train.display()).dim());
    println!("   Test:  {}", style(test.display()).dim());
    println!();

    println!(
        "   {} numeric feature(s):",
        style(summary.numeric_columns.len()).yellow()
    );
    for name in &summary.numeric_columns {
        println!("      {} {}", style("•").dim(), name);
    }
    println!();
    println!(
        "   Train: {} rows × {} columns",
        style(summary.train_shape.0).yellow(),
        style(summary.train_shape.1).yellow()
    );
    println!(
        "   Test:  {} rows × {} columns",
        style(summary.test_shape.0).yellow(),
        style(summary.test_shape.1).yellow()
    );
    println!();

    Ok(())
}

//! Artifact persistence
//!
//! Partitions are written as Arrow IPC files (the Feather v2 layout) and the
//! numeric feature list as plain text, one name per line. The three writes
//! are independent: a failure part-way leaves the earlier files in place.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

/// Output locations of a preparation run
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub numeric_columns: PathBuf,
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))
}

/// Write a partition as an Arrow IPC file
pub fn write_partition(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    IpcWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write IPC file: {}", path.display()))?;
    Ok(())
}

/// Write column names one per line
pub fn write_numeric_columns(columns: &[String], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(create_file(path)?);
    for name in columns {
        writeln!(writer, "{}", name)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Persist train, test, and the numeric list, in that order
pub fn write_artifacts(
    train: &mut DataFrame,
    oos: &mut DataFrame,
    numeric_columns: &[String],
    paths: &ArtifactPaths,
) -> Result<()> {
    info!("writing training and test data for modelling");
    write_partition(train, &paths.train)?;
    write_partition(oos, &paths.test)?;
    write_numeric_columns(numeric_columns, &paths.numeric_columns)?;
    info!(
        train = %paths.train.display(),
        test = %paths.test.display(),
        numeric_columns = %paths.numeric_columns.display(),
        "artifacts written"
    );
    Ok(())
}

/// Read a partition written by `write_partition`
pub fn read_partition(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open IPC file: {}", path.display()))?;
    let df = IpcReader::new(file)
        .finish()
        .with_context(|| format!("Failed to read IPC file: {}", path.display()))?;
    Ok(df)
}

/// Read a numeric column list, trimming whitespace and skipping blank lines
pub fn read_numeric_columns(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut columns = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let name = line.trim();
        if !name.is_empty() {
            columns.push(name.to_string());
        }
    }
    Ok(columns)
}

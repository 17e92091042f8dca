//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use anyhow::Result;

use crate::pipeline::{MalformedIdPolicy, PrepConfig};

/// loanprep - Prepare loan application data for credit-risk modelling
#[derive(Parser, Debug)]
#[command(name = "loanprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON configuration file. Flags given on the command line override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(flatten)]
    pub build: BuildArgs,
}

/// Overrides for a preparation run
#[derive(clap::Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Raw input file (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Training partition output path (Arrow IPC)
    #[arg(long)]
    pub train_output: Option<PathBuf>,

    /// Out-of-sample partition output path (Arrow IPC)
    #[arg(long)]
    pub test_output: Option<PathBuf>,

    /// Numeric feature list output path
    #[arg(long)]
    pub numeric_columns_output: Option<PathBuf>,

    /// Missing value threshold in percent - drop columns with more missing values than this
    #[arg(long, value_parser = validate_missing_threshold)]
    pub missing_threshold: Option<f64>,

    /// Issue years that form the training partition (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub train_years: Vec<i32>,

    /// Issue years that form the out-of-sample partition (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub oos_years: Vec<i32>,

    /// What to do with identifiers that contain no numeric token: "fail" or "drop"
    #[arg(long)]
    pub malformed_ids: Option<MalformedIdPolicy>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long)]
    pub infer_schema_length: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the preparation pipeline (the default when no command is given)
    Build(BuildArgs),

    /// Load written artifacts and print their shapes and the numeric feature list
    Inspect {
        /// Training partition path (defaults to the configured train output)
        #[arg(long)]
        train: Option<PathBuf>,

        /// Out-of-sample partition path (defaults to the configured test output)
        #[arg(long)]
        test: Option<PathBuf>,

        /// Numeric feature list path (defaults to the configured output)
        #[arg(long)]
        numeric_columns: Option<PathBuf>,
    },
}

impl Cli {
    /// Base configuration: the JSON file when given, otherwise the defaults
    pub fn base_config(&self) -> Result<PrepConfig> {
        match &self.config {
            Some(path) => PrepConfig::from_json_file(path),
            None => Ok(PrepConfig::default()),
        }
    }
}

impl BuildArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply_to(&self, mut config: PrepConfig) -> PrepConfig {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(path) = &self.train_output {
            config.train_output = path.clone();
        }
        if let Some(path) = &self.test_output {
            config.test_output = path.clone();
        }
        if let Some(path) = &self.numeric_columns_output {
            config.numeric_columns_output = path.clone();
        }
        if let Some(threshold) = self.missing_threshold {
            config.missing_threshold = threshold;
        }
        if !self.train_years.is_empty() {
            config.training_years = self.train_years.clone();
        }
        if !self.oos_years.is_empty() {
            config.oos_years = self.oos_years.clone();
        }
        if let Some(policy) = self.malformed_ids {
            config.malformed_ids = policy;
        }
        if let Some(n) = self.infer_schema_length {
            config.infer_schema_length = n;
        }
        config
    }
}

/// Validator for missing_threshold parameter
fn validate_missing_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!(
            "missing_threshold must be between 0.0 and 100.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

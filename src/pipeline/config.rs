//! Pipeline configuration
//!
//! Every constant the preparation job depends on lives in `PrepConfig`. The
//! defaults reproduce the Lending Club layout the job was written for; a JSON
//! file can override any subset of fields.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::PrepError;
use super::target::TargetMapping;

/// What to do with identifiers that carry no recognizable numeric token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedIdPolicy {
    /// Abort the run on the first malformed identifier
    #[default]
    Fail,
    /// Remove the offending rows and continue
    Drop,
}

impl FromStr for MalformedIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "drop" => Ok(Self::Drop),
            other => Err(format!(
                "unknown malformed id policy '{}', expected 'fail' or 'drop'",
                other
            )),
        }
    }
}

impl fmt::Display for MalformedIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Full configuration of a preparation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Raw delimited (or Parquet) input file
    pub input: PathBuf,
    /// Training partition output (Arrow IPC)
    pub train_output: PathBuf,
    /// Out-of-sample partition output (Arrow IPC)
    pub test_output: PathBuf,
    /// Numeric feature list output, one name per line
    pub numeric_columns_output: PathBuf,

    pub id_column: String,
    pub status_column: String,
    pub target_column: String,
    /// Status values that resolve to target 1 and 0
    pub target_mapping: TargetMapping,

    /// Drop columns whose missing percentage is strictly above this value (0-100)
    pub missing_threshold: f64,

    pub raw_numeric_columns: Vec<String>,
    pub nominal_columns: Vec<String>,
    pub ordinal_columns: Vec<String>,
    /// Rank order (lowest first) per ordinal column. Columns without an entry
    /// are typed as unordered categoricals.
    pub ordinal_ranks: BTreeMap<String, Vec<String>>,

    pub issue_date_column: String,
    pub earliest_credit_column: String,
    pub duration_column: String,
    /// chrono format string; formats without a day directive assume day 1
    pub date_format: String,

    pub training_years: Vec<i32>,
    pub oos_years: Vec<i32>,

    pub malformed_ids: MalformedIdPolicy,

    /// Rows used for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("/data/sample_data.csv"),
            train_output: PathBuf::from("/data/train"),
            test_output: PathBuf::from("/data/test"),
            numeric_columns_output: PathBuf::from("/data/final_num_cols.txt"),
            id_column: "id".to_string(),
            status_column: "loan_status".to_string(),
            target_column: "target".to_string(),
            target_mapping: TargetMapping::new("Charged Off".to_string(), "Fully Paid".to_string()),
            missing_threshold: 40.0,
            raw_numeric_columns: names(&[
                "total_acc",
                "annual_inc",
                "installment",
                "open_acc",
                "mort_acc",
                "emp_title",
                "fico_range_high",
                "pub_rec",
                "fico_range_low",
                "revol_util",
                "issue_d",
                "title",
                "earliest_cr_line",
                "loan_amnt",
                "pub_rec_bankruptcies",
                "dti",
                "int_rate",
                "revol_bal",
            ]),
            nominal_columns: names(&[
                "addr_state",
                "application_type",
                "home_ownership",
                "initial_list_status",
                "purpose",
                "term",
                "verification_status",
                "zip_code",
            ]),
            ordinal_columns: names(&["emp_length", "grade", "sub_grade"]),
            ordinal_ranks: BTreeMap::new(),
            issue_date_column: "issue_d".to_string(),
            earliest_credit_column: "earliest_cr_line".to_string(),
            duration_column: "days_from_issue_to_earliest_cr".to_string(),
            date_format: "%b-%Y".to_string(),
            training_years: vec![2013, 2014, 2015],
            oos_years: vec![2016],
            malformed_ids: MalformedIdPolicy::Fail,
            infer_schema_length: 10000,
        }
    }
}

impl PrepConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Columns kept by feature selection, in output order, without duplicates
    pub fn selected_columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.raw_numeric_columns
            .iter()
            .chain(&self.nominal_columns)
            .chain(&self.ordinal_columns)
            .chain([&self.target_column, &self.id_column])
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect()
    }

    /// Nominal followed by ordinal columns
    pub fn categorical_columns(&self) -> Vec<String> {
        self.nominal_columns
            .iter()
            .chain(&self.ordinal_columns)
            .cloned()
            .collect()
    }

    /// Check the configuration for contradictions before any data is touched
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.missing_threshold) {
            return Err(invalid(format!(
                "missing_threshold must be between 0 and 100, got {}",
                self.missing_threshold
            )));
        }

        if self.training_years.is_empty() || self.oos_years.is_empty() {
            return Err(invalid("training_years and oos_years must both be non-empty"));
        }

        let overlap: Vec<i32> = self
            .training_years
            .iter()
            .filter(|y| self.oos_years.contains(y))
            .copied()
            .collect();
        if !overlap.is_empty() {
            return Err(invalid(format!(
                "training_years and oos_years overlap: {:?}",
                overlap
            )));
        }

        if self.date_format.trim().is_empty() {
            return Err(invalid("date_format must not be empty"));
        }

        if self.target_mapping.event_value == self.target_mapping.non_event_value {
            return Err(invalid("target event and non-event values must differ"));
        }

        for (column, levels) in &self.ordinal_ranks {
            if !self.ordinal_columns.contains(column) {
                return Err(invalid(format!(
                    "rank order given for '{}', which is not an ordinal column",
                    column
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = levels.iter().find(|l| !seen.insert(l.as_str())) {
                return Err(invalid(format!(
                    "rank order for '{}' lists level '{}' more than once",
                    column, dup
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    PrepError::InvalidConfig(message.into()).into()
}

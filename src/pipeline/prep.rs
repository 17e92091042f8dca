//! End-to-end preparation: stage chain, split, and numeric feature list

use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use super::categorical::CategoricalTyper;
use super::config::PrepConfig;
use super::identifier::IdentifierNormalizer;
use super::missing::MissingnessFilter;
use super::numeric::extract_numeric_columns;
use super::selection::FeatureSelector;
use super::split::split_by_issue_year;
use super::stage::{run_stage, Stage, StageRecord};
use super::target::TargetDeriver;
use super::temporal::{DateFormat, TemporalFeatures};

/// Everything a run produces before it is written out
#[derive(Debug, Clone)]
pub struct PrepOutput {
    pub train: DataFrame,
    pub oos: DataFrame,
    pub numeric_columns: Vec<String>,
    pub records: Vec<StageRecord>,
    /// Rows that fell in neither year list
    pub unassigned_rows: usize,
}

/// The configured stage chain plus the split and extraction settings
pub struct PrepPipeline {
    config: PrepConfig,
    stages: Vec<Box<dyn Stage>>,
}

impl PrepPipeline {
    /// Validate `config` and build the stage chain
    pub fn from_config(config: PrepConfig) -> Result<Self> {
        config.validate()?;

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(IdentifierNormalizer::new(
                config.id_column.clone(),
                config.malformed_ids,
            )?),
            Box::new(TargetDeriver {
                status_column: config.status_column.clone(),
                target_column: config.target_column.clone(),
                mapping: config.target_mapping.clone(),
            }),
            Box::new(MissingnessFilter {
                threshold: config.missing_threshold,
            }),
            Box::new(FeatureSelector::new(config.selected_columns())),
            Box::new(TemporalFeatures {
                issue_column: config.issue_date_column.clone(),
                earliest_credit_column: config.earliest_credit_column.clone(),
                duration_column: config.duration_column.clone(),
                format: DateFormat::new(config.date_format.clone()),
            }),
            Box::new(CategoricalTyper {
                nominal: config.nominal_columns.clone(),
                ordinal: config.ordinal_columns.clone(),
                ranks: config.ordinal_ranks.clone(),
            }),
        ];

        Ok(Self { config, stages })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Columns the loader must read as text
    pub fn text_columns(&self) -> Vec<String> {
        let c = &self.config;
        let mut cols = vec![
            c.id_column.clone(),
            c.status_column.clone(),
            c.issue_date_column.clone(),
            c.earliest_credit_column.clone(),
        ];
        cols.extend(c.categorical_columns());
        cols
    }

    /// Run every stage, split by year, and extract the numeric feature list
    pub fn run(&self, df: DataFrame) -> Result<PrepOutput> {
        let mut df = df;
        let mut records = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let (next, record) = run_stage(stage.as_ref(), df)?;
            records.push(record);
            df = next;
        }

        let c = &self.config;
        let split = split_by_issue_year(&df, &c.issue_date_column, &c.training_years, &c.oos_years)?;
        let numeric_columns = extract_numeric_columns(&split.train, &c.id_column, &c.target_column)?;
        info!(count = numeric_columns.len(), "final numeric columns extracted");

        Ok(PrepOutput {
            train: split.train,
            oos: split.oos,
            numeric_columns,
            records,
            unassigned_rows: split.unassigned,
        })
    }
}

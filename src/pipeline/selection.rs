//! Allow-list feature selection

use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use super::stage::Stage;

/// Projects the frame onto the columns available at application time.
///
/// Every listed column is required, so a column removed by the missingness
/// filter fails the run here rather than silently vanishing.
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    columns: Vec<String>,
}

impl FeatureSelector {
    /// Duplicate names keep their first position.
    pub fn new(columns: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(columns.len());
        for c in columns {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        Self { columns: unique }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Stage for FeatureSelector {
    fn name(&self) -> &'static str {
        "select_features"
    }

    fn required_columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        info!(
            columns = self.columns.len(),
            "use only variables available at loan application time"
        );
        Ok(df.select(self.columns.iter().map(|c| c.as_str()))?)
    }
}

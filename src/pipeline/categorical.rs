//! Categorical typing of nominal and ordinal columns
//!
//! Nominal and ordinal columns become polars `Categorical`. Ordinal order is
//! never inferred: a column only gets an integer rank companion (`<col>_rank`)
//! when its level order is configured.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use polars::prelude::*;
use tracing::{info, warn};

use super::error::PrepError;
use super::stage::Stage;

/// Suffix of the rank column derived from an ordered ordinal
pub const RANK_SUFFIX: &str = "_rank";

/// Name of the rank column for an ordinal column
pub fn rank_column_name(column: &str) -> String {
    format!("{}{}", column, RANK_SUFFIX)
}

/// Cast a column to `Categorical`, going through text for non-string input
pub fn to_categorical(col: &Column) -> Result<Column> {
    let text = if col.dtype() == &DataType::String {
        col.clone()
    } else {
        col.cast(&DataType::String)?
    };
    Ok(text.cast(&DataType::Categorical(None, CategoricalOrdering::Physical))?)
}

/// 0-based rank of each value within `levels`. Nulls stay null.
pub fn rank_values(col: &Column, levels: &[String]) -> Result<Vec<Option<u32>>> {
    let positions: HashMap<&str, u32> = levels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i as u32))
        .collect();

    let text = col.cast(&DataType::String)?;
    text.str()?
        .into_iter()
        .map(|value| match value {
            None => Ok(None),
            Some(v) => positions.get(v).copied().map(Some).ok_or_else(|| {
                PrepError::UnknownOrdinalLevel {
                    column: col.name().to_string(),
                    level: v.to_string(),
                }
                .into()
            }),
        })
        .collect()
}

/// Stage that marks nominal and ordinal columns as categorical
#[derive(Debug, Clone)]
pub struct CategoricalTyper {
    pub nominal: Vec<String>,
    pub ordinal: Vec<String>,
    /// Level order (lowest first) for ordinal columns that have one
    pub ranks: BTreeMap<String, Vec<String>>,
}

impl Stage for CategoricalTyper {
    fn name(&self) -> &'static str {
        "type_categoricals"
    }

    fn required_columns(&self) -> Vec<String> {
        self.nominal.iter().chain(&self.ordinal).cloned().collect()
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        info!(
            nominal = self.nominal.len(),
            ordinal = self.ordinal.len(),
            "convert object to categorical dtype"
        );

        let mut df = df;
        for name in self.nominal.iter().chain(&self.ordinal) {
            let cat = to_categorical(df.column(name)?)?;
            df.with_column(cat)?;
        }

        for name in &self.ordinal {
            match self.ranks.get(name) {
                Some(levels) => {
                    let ranks = rank_values(df.column(name)?, levels)?;
                    df.with_column(Column::new(rank_column_name(name).into(), ranks))?;
                }
                None => warn!(column = %name, "no rank order configured, ordinal typed as unordered"),
            }
        }

        Ok(df)
    }
}

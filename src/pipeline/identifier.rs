//! Identifier normalization
//!
//! The raw `id` column mixes plain numeric ids with composite strings that
//! embed the real id after a `<digit>: ` prefix. Normalization keeps the
//! digit run and stores the column as Float64.

use std::collections::HashSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use regex::Regex;
use tracing::{info, warn};

use super::config::MalformedIdPolicy;
use super::error::PrepError;
use super::stage::Stage;

const PURE_DIGITS: &str = r"^[0-9]+$";
const COMPOSITE_TOKEN: &str = r"\d: (\d+)";

/// Parses raw identifier text into numeric ids
#[derive(Debug, Clone)]
pub struct IdParser {
    pure: Regex,
    composite: Regex,
}

impl IdParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pure: Regex::new(PURE_DIGITS)?,
            composite: Regex::new(COMPOSITE_TOKEN)?,
        })
    }

    /// Extract the identifier from one raw value as a float.
    ///
    /// Pure digit strings map to themselves; composite strings yield the digit
    /// run captured after the first `<digit>: ` token. Digit runs of any length
    /// are accepted and rounded to the nearest `f64`. Returns `None` when
    /// neither form matches.
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let digits = if self.pure.is_match(raw) {
            raw
        } else {
            self.composite.captures(raw)?.get(1)?.as_str()
        };
        digits.parse().ok()
    }
}

/// Stage that rewrites the identifier column as Float64
#[derive(Debug, Clone)]
pub struct IdentifierNormalizer {
    column: String,
    policy: MalformedIdPolicy,
    parser: IdParser,
}

impl IdentifierNormalizer {
    pub fn new(column: impl Into<String>, policy: MalformedIdPolicy) -> Result<Self> {
        Ok(Self {
            column: column.into(),
            policy,
            parser: IdParser::new()?,
        })
    }
}

impl Stage for IdentifierNormalizer {
    fn name(&self) -> &'static str {
        "normalize_ids"
    }

    fn required_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        info!(column = %self.column, "cleaning id column");

        let text = df
            .column(&self.column)?
            .cast(&DataType::String)
            .with_context(|| format!("Failed to cast '{}' to text", self.column))?;

        let mut ids: Vec<Option<f64>> = Vec::with_capacity(df.height());
        let mut malformed = 0usize;
        for (row, value) in text.str()?.into_iter().enumerate() {
            let parsed = value.and_then(|v| self.parser.parse(v));
            if parsed.is_none() {
                if self.policy == MalformedIdPolicy::Fail {
                    return Err(PrepError::MalformedIdentifier {
                        row,
                        value: value.unwrap_or("<null>").to_string(),
                    }
                    .into());
                }
                malformed += 1;
            }
            ids.push(parsed);
        }

        // Compared on the stored float, so long ids that round together collide
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().flatten().find(|id| !seen.insert(id.to_bits())) {
            return Err(PrepError::DuplicateIdentifier {
                column: self.column.clone(),
                value: *dup,
            }
            .into());
        }

        let keep: Vec<bool> = ids.iter().map(Option::is_some).collect();
        let mut df = df;
        df.with_column(Column::new(self.column.as_str().into(), ids))?;

        if malformed > 0 {
            warn!(rows = malformed, "dropping rows with malformed identifiers");
            let mask = Series::new("keep".into(), keep);
            df = df.filter(mask.bool()?)?;
        }

        Ok(df)
    }
}

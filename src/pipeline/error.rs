//! Error types for the preparation pipeline.
//!
//! `PrepError` captures the failure modes that are part of the pipeline's
//! contract. I/O and polars failures are propagated through `anyhow` with
//! context instead; callers that need to branch on the kind of failure can
//! `downcast_ref::<PrepError>()` the returned error.

use thiserror::Error;

/// Errors raised by pipeline stages and configuration validation.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A stage was handed a frame that lacks columns it declared as required.
    ///
    /// Usually means the missingness filter dropped an allow-listed column.
    #[error("stage '{stage}' requires columns that are not present: {missing:?}")]
    MissingColumns {
        /// Stage that rejected the frame
        stage: String,
        /// Required columns absent from the frame
        missing: Vec<String>,
    },

    /// An identifier is neither pure digits nor contains a `<digit>: <digits>` token.
    #[error("identifier {value:?} at row {row} has no embedded numeric token")]
    MalformedIdentifier { row: usize, value: String },

    /// Two rows normalized to the same identifier.
    #[error("identifier column '{column}' contains duplicate value {value}")]
    DuplicateIdentifier { column: String, value: f64 },

    /// A date cell does not match the configured format.
    #[error("value {value:?} in column '{column}' at row {row} does not match date format '{format}'")]
    DateParse {
        column: String,
        row: usize,
        value: String,
        format: String,
    },

    #[error("column '{column}' has type {actual}, expected {expected}")]
    UnexpectedType {
        column: String,
        actual: String,
        expected: &'static str,
    },

    /// An ordinal column holds a level missing from its configured rank order.
    #[error("ordinal column '{column}' contains level {level:?} not present in the configured rank order")]
    UnknownOrdinalLevel { column: String, level: String },

    /// `id` or `target` is not a numeric column of the training partition.
    #[error("expected '{column}' to be a numeric column of the training partition")]
    MissingNumericColumn { column: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

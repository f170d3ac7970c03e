//! Error taxonomy for datasets, configuration, and comparison runs.
//!
//! Blank keys are deliberately absent from this module: a row with an empty
//! key is a classification outcome, not a failure.

use thiserror::Error;

/// Invalid settings or column selections. Always reported before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Threshold must be a number between 0.0 and 1.0 (got {0})")]
    InvalidThreshold(f64),
    #[error("max_matches_per_record must be at least 1 (got {0})")]
    InvalidMaxMatches(usize),
    #[error("batch_size must be at least 1 (got {0})")]
    InvalidBatchSize(usize),
    #[error("Column '{column}' not found in dataset '{dataset}'")]
    UnknownColumn { dataset: String, column: String },
}

/// Outcome of a comparison run that did not produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Comparison was cancelled before completion")]
    Cancelled,
}

/// Violations of the dataset invariants detected while building a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("Duplicate header '{header}' in dataset '{dataset}'")]
    DuplicateHeader { dataset: String, header: String },
    #[error("Dataset '{0}' has no header row")]
    Empty(String),
    #[error("Row {row} of dataset '{dataset}' has {found} cell(s) but only {expected} header(s)")]
    RowTooWide {
        dataset: String,
        row: usize,
        found: usize,
        expected: usize,
    },
}

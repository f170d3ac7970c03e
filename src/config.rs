//! Column selections for a comparison: which column is the key on each side
//! and which extra columns ride along for display and export.

use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, error::ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySelection {
    pub source: String,
    pub target: String,
}

impl KeySelection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        KeySelection {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Resolves both key columns to positions, failing on the first missing one.
    pub fn resolve(
        &self,
        source: &Dataset,
        target: &Dataset,
    ) -> Result<(usize, usize), ConfigError> {
        Ok((
            require_column(source, &self.source)?,
            require_column(target, &self.target)?,
        ))
    }
}

/// Passthrough columns shown next to each match. Never used for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalColumns {
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub target: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub keys: KeySelection,
    #[serde(default)]
    pub additional: AdditionalColumns,
}

impl ComparisonConfig {
    pub fn new(keys: KeySelection) -> Self {
        ComparisonConfig {
            keys,
            additional: AdditionalColumns::default(),
        }
    }

    pub fn with_additional(mut self, source: Vec<String>, target: Vec<String>) -> Self {
        self.additional = AdditionalColumns { source, target };
        self
    }

    pub fn validate(&self, source: &Dataset, target: &Dataset) -> Result<(), ConfigError> {
        self.keys.resolve(source, target)?;
        for column in &self.additional.source {
            require_column(source, column)?;
        }
        for column in &self.additional.target {
            require_column(target, column)?;
        }
        Ok(())
    }
}

pub(crate) fn require_column(dataset: &Dataset, column: &str) -> Result<usize, ConfigError> {
    dataset
        .column_index(column)
        .ok_or_else(|| ConfigError::UnknownColumn {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
        })
}

//! Matching settings.
//!
//! Settings are a plain value object: replaced wholesale between runs and
//! never mutated while a run is in progress. Files may be YAML or JSON and
//! only need to name the fields they override.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Edit-distance formula behind the similarity score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Metric {
    /// Insertions, deletions, substitutions, and adjacent transpositions
    #[default]
    DamerauLevenshtein,
    /// Insertions, deletions, and substitutions only
    Levenshtein,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::DamerauLevenshtein => write!(f, "damerau-levenshtein"),
            Metric::Levenshtein => write!(f, "levenshtein"),
        }
    }
}

/// Named starting points that replace every matching setting at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Preset {
    /// Near-identical keys only
    Exact,
    /// The defaults
    Balanced,
    /// Loose matching; a target may be claimed by up to three source rows
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum similarity in [0, 1] for a candidate to be accepted.
    #[serde(alias = "fuzzyThreshold")]
    pub threshold: f64,
    #[serde(alias = "caseSensitive")]
    pub case_sensitive: bool,
    #[serde(alias = "ignoreWhitespace")]
    pub ignore_whitespace: bool,
    /// How many source records may claim the same target record.
    #[serde(alias = "maxMatchesPerRecord", alias = "maxResults")]
    pub max_matches_per_record: usize,
    pub metric: Metric,
    /// Records processed between progress notifications and yields.
    #[serde(alias = "batchSize")]
    pub batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threshold: DEFAULT_THRESHOLD,
            case_sensitive: false,
            ignore_whitespace: true,
            max_matches_per_record: 1,
            metric: Metric::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Settings {
    pub fn preset(preset: Preset) -> Self {
        let (threshold, max_matches_per_record) = match preset {
            Preset::Exact => (0.9, 1),
            Preset::Balanced => (DEFAULT_THRESHOLD, 1),
            Preset::Fuzzy => (0.3, 3),
        };
        Settings {
            threshold,
            max_matches_per_record,
            ..Settings::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading settings from {path:?}"))?;
        let settings = Self::from_yaml_str(&contents)
            .with_context(|| format!("Parsing settings from {path:?}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses YAML (and therefore JSON) settings without validating them.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.max_matches_per_record < 1 {
            return Err(ConfigError::InvalidMaxMatches(self.max_matches_per_record));
        }
        if self.batch_size < 1 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

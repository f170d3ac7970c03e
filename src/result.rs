use serde::Serialize;

use crate::dataset::{Dataset, Record};

/// An accepted pairing of one source record with one target record.
///
/// Rows are zero-based positions in the datasets the run was given; the key
/// strings are the raw cell text before normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub source_row: usize,
    pub target_row: usize,
    pub source_key: String,
    pub target_key: String,
    pub score: f64,
}

impl Match {
    /// Score as a whole percentage, the way results are displayed.
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}

/// Complete three-way partition produced by one run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    matches: Vec<Match>,
    source_only: Vec<usize>,
    target_only: Vec<usize>,
}

impl ComparisonResult {
    pub(crate) fn new(
        matches: Vec<Match>,
        source_only: Vec<usize>,
        target_only: Vec<usize>,
    ) -> Self {
        ComparisonResult {
            matches,
            source_only,
            target_only,
        }
    }

    /// Matches in source order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Source rows without an accepted counterpart, in source order.
    pub fn source_only(&self) -> &[usize] {
        &self.source_only
    }

    /// Target rows never selected by any source row, in target order.
    pub fn target_only(&self) -> &[usize] {
        &self.target_only
    }

    pub fn source_only_records<'a>(
        &'a self,
        source: &'a Dataset,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.source_only.iter().filter_map(|row| source.record(*row))
    }

    pub fn target_only_records<'a>(
        &'a self,
        target: &'a Dataset,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.target_only.iter().filter_map(|row| target.record(*row))
    }

    /// Number of matches that selected the given target row.
    pub fn consumption(&self, target_row: usize) -> usize {
        self.matches
            .iter()
            .filter(|m| m.target_row == target_row)
            .count()
    }
}

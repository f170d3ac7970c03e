use serde::Serialize;

use crate::{dataset::Dataset, result::ComparisonResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub total_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    pub match_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub source: DatasetSummary,
    pub target: DatasetSummary,
    pub matches: usize,
    /// Mean score over accepted matches; `None` when nothing matched.
    pub mean_score: Option<f64>,
}

impl ComparisonSummary {
    pub fn new(result: &ComparisonResult, source: &Dataset, target: &Dataset) -> Self {
        let matches = result.matches().len();
        let source_matched = source.len() - result.source_only().len();
        let target_matched = target.len() - result.target_only().len();
        let mean_score = (matches > 0)
            .then(|| result.matches().iter().map(|m| m.score).sum::<f64>() / matches as f64);
        ComparisonSummary {
            source: DatasetSummary::new(source, source_matched, result.source_only().len()),
            target: DatasetSummary::new(target, target_matched, result.target_only().len()),
            matches,
            mean_score,
        }
    }

    pub fn table_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let headers = ["dataset", "rows", "matched", "unmatched", "match %"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows = [&self.source, &self.target]
            .iter()
            .map(|side| {
                vec![
                    side.name.clone(),
                    side.total_rows.to_string(),
                    side.matched_rows.to_string(),
                    side.unmatched_rows.to_string(),
                    format!("{:.1}", side.match_percentage),
                ]
            })
            .collect();
        (headers, rows)
    }
}

impl DatasetSummary {
    fn new(dataset: &Dataset, matched_rows: usize, unmatched_rows: usize) -> Self {
        let total_rows = dataset.len();
        let match_percentage = if total_rows > 0 {
            matched_rows as f64 / total_rows as f64 * 100.0
        } else {
            0.0
        };
        DatasetSummary {
            name: dataset.name().to_string(),
            total_rows,
            matched_rows,
            unmatched_rows,
            match_percentage,
        }
    }
}

//! Searchable view over the target dataset's key column.
//!
//! The index is a full scan in target row order with one optimisation: a
//! candidate whose length alone caps its score below the current worst kept
//! hit is skipped without computing the distance. Results are identical to an
//! exhaustive scan.

use std::cmp::Ordering;

use crate::{
    dataset::Dataset,
    normalize::{is_blank, normalize},
    settings::{Metric, Settings},
    similarity::{similarity, upper_bound},
};

#[derive(Debug, Clone)]
struct Entry {
    row: usize,
    raw: String,
    normalized: String,
    char_len: usize,
}

/// One search result. `row` indexes into the target dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub row: usize,
    pub raw: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct CandidateIndex {
    entries: Vec<Entry>,
    metric: Metric,
}

impl CandidateIndex {
    /// Indexes every target record whose key is not blank.
    pub fn build(target: &Dataset, key_column: usize, settings: &Settings) -> Self {
        let entries = target
            .records()
            .iter()
            .filter_map(|record| {
                let raw = record.text(key_column);
                if is_blank(&raw) {
                    return None;
                }
                let normalized = normalize(&raw, settings).into_owned();
                Some(Entry {
                    row: record.index(),
                    char_len: normalized.chars().count(),
                    raw,
                    normalized,
                })
            })
            .collect();
        CandidateIndex {
            entries,
            metric: settings.metric,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns up to `limit` best hits for an already normalized query,
    /// best first. Equal scores keep the lower target row first. Rows for
    /// which `exclude` returns true are never returned.
    pub fn query<F>(&self, query: &str, limit: usize, exclude: F) -> Vec<Hit>
    where
        F: Fn(usize) -> bool,
    {
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query_len = query.chars().count();
        let mut best: Vec<(usize, f64)> = Vec::with_capacity(limit + 1);

        for (position, entry) in self.entries.iter().enumerate() {
            if exclude(entry.row) {
                continue;
            }
            if best.len() == limit {
                let floor = best[limit - 1].1;
                if upper_bound(query_len, entry.char_len) < floor {
                    continue;
                }
            }
            let score = similarity(query, &entry.normalized, self.metric);
            insert_ranked(&mut best, limit, position, score);
        }

        best.into_iter()
            .map(|(position, score)| {
                let entry = &self.entries[position];
                Hit {
                    row: entry.row,
                    raw: entry.raw.clone(),
                    score,
                }
            })
            .collect()
    }
}

// Entries are visited in row order, so a later entry only displaces a kept
// one when it scores strictly higher.
fn insert_ranked(best: &mut Vec<(usize, f64)>, limit: usize, position: usize, score: f64) {
    let slot = best
        .iter()
        .position(|(_, kept)| score.partial_cmp(kept) == Some(Ordering::Greater))
        .unwrap_or(best.len());
    if slot >= limit {
        return;
    }
    best.insert(slot, (position, score));
    best.truncate(limit);
}

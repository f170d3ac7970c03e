//! The matching engine.
//!
//! A run walks the source dataset once, in order. Each non-blank source key is
//! normalized and looked up in a [`CandidateIndex`] over the target, skipping
//! targets that already reached `max_matches_per_record`. The single best
//! remaining candidate is accepted when its score reaches the threshold.
//! Targets never selected are reported as target-only once the scan ends.
//!
//! Every `batch_size` records the engine reports progress, refreshes the live
//! preview, pauses through the observer, and checks for cancellation.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::{debug, info};

use crate::{
    config::KeySelection,
    dataset::Dataset,
    error::{ConfigError, RunError},
    index::CandidateIndex,
    normalize::{is_blank, normalize},
    result::{ComparisonResult, Match},
    settings::Settings,
};

/// Most recent accepted matches kept for the live preview.
pub const PREVIEW_CAPACITY: usize = 5;
/// Records that must be processed before a preview is published.
pub const PREVIEW_MIN_PROCESSED: usize = 10;

const PREPARE_FRACTION: f64 = 0.1;
const INDEXED_FRACTION: f64 = 0.2;
const SCAN_START_FRACTION: f64 = 0.3;
const SCAN_SPAN_FRACTION: f64 = 0.6;
const FINALIZE_FRACTION: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Completion in [0, 1]; never decreases within a run.
    pub fraction: f64,
    pub phase: String,
}

/// Receives partial views of a run in progress.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &Progress);

    /// Latest accepted matches, oldest first, at most [`PREVIEW_CAPACITY`].
    fn on_preview(&mut self, _preview: &[Match]) {}

    /// Called between batches so the host can run other work.
    fn pause(&mut self) {
        std::thread::yield_now();
    }
}

/// Observer that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &Progress) {}
}

/// Shared flag a host sets to abandon a run at the next batch boundary.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct MatchingEngine {
    settings: Settings,
    cancellation: CancellationToken,
}

impl MatchingEngine {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(MatchingEngine {
            settings,
            cancellation: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(
        &self,
        source: &Dataset,
        target: &Dataset,
        keys: &KeySelection,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ComparisonResult, RunError> {
        let settings = &self.settings;
        settings.validate()?;
        let (source_column, target_column) = keys.resolve(source, target)?;

        observer.on_progress(&Progress {
            fraction: PREPARE_FRACTION,
            phase: "Preparing search data...".to_string(),
        });
        let index = CandidateIndex::build(target, target_column, settings);
        info!(
            "Indexed {} of {} '{}' record(s) on '{}'",
            index.len(),
            target.len(),
            target.name(),
            keys.target
        );
        observer.on_progress(&Progress {
            fraction: INDEXED_FRACTION,
            phase: format!("Indexed {} candidate value(s)", index.len()),
        });

        let total = source.len();
        observer.on_progress(&Progress {
            fraction: SCAN_START_FRACTION,
            phase: format!("Processing {total} records..."),
        });
        self.checkpoint(observer)?;

        let mut consumed = vec![0usize; target.len()];
        let mut matches = Vec::new();
        let mut source_only = Vec::new();
        let mut preview: VecDeque<Match> = VecDeque::with_capacity(PREVIEW_CAPACITY);
        let mut blank_keys = 0usize;
        let cap = settings.max_matches_per_record;

        for (processed, record) in source.records().iter().enumerate().map(|(i, r)| (i + 1, r)) {
            let raw = record.text(source_column);
            let accepted = if is_blank(&raw) {
                blank_keys += 1;
                None
            } else {
                let query = normalize(&raw, settings);
                index
                    .query(&query, 1, |row| consumed[row] >= cap)
                    .into_iter()
                    .next()
                    .filter(|hit| hit.score >= settings.threshold)
            };

            match accepted {
                Some(hit) => {
                    consumed[hit.row] += 1;
                    let found = Match {
                        source_row: record.index(),
                        target_row: hit.row,
                        source_key: raw,
                        target_key: hit.raw,
                        score: hit.score,
                    };
                    if preview.len() == PREVIEW_CAPACITY {
                        preview.pop_front();
                    }
                    preview.push_back(found.clone());
                    matches.push(found);
                }
                None => source_only.push(record.index()),
            }

            if processed % settings.batch_size == 0 || processed == total {
                observer.on_progress(&Progress {
                    fraction: SCAN_START_FRACTION
                        + SCAN_SPAN_FRACTION * processed as f64 / total as f64,
                    phase: format!("Processed {processed}/{total} records..."),
                });
                if processed >= PREVIEW_MIN_PROCESSED && !preview.is_empty() {
                    observer.on_preview(preview.make_contiguous());
                }
                debug!(
                    "Processed {processed}/{total} record(s), {} match(es) so far",
                    matches.len()
                );
                self.checkpoint(observer)?;
            }
        }
        if blank_keys > 0 {
            debug!("{blank_keys} source record(s) had a blank '{}' key", keys.source);
        }

        observer.on_progress(&Progress {
            fraction: FINALIZE_FRACTION,
            phase: "Finalizing results...".to_string(),
        });
        let target_only = consumed
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(row, _)| row)
            .collect::<Vec<_>>();

        let result = ComparisonResult::new(matches, source_only, target_only);
        info!(
            "Comparison complete: {} match(es), {} '{}'-only, {} '{}'-only",
            result.matches().len(),
            result.source_only().len(),
            source.name(),
            result.target_only().len(),
            target.name()
        );
        observer.on_progress(&Progress {
            fraction: 1.0,
            phase: "Complete!".to_string(),
        });
        Ok(result)
    }

    fn checkpoint(&self, observer: &mut dyn ProgressObserver) -> Result<(), RunError> {
        observer.pause();
        if self.cancellation.is_cancelled() {
            info!("Comparison cancelled; discarding partial results");
            return Err(RunError::Cancelled);
        }
        Ok(())
    }
}

/// Runs a comparison without progress reporting or cancellation.
pub fn compare(
    source: &Dataset,
    target: &Dataset,
    keys: &KeySelection,
    settings: &Settings,
) -> Result<ComparisonResult, RunError> {
    MatchingEngine::new(settings.clone())?.run(source, target, keys, &mut NoProgress)
}

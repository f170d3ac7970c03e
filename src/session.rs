//! Holds two datasets and the latest completed comparison between them.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    config::ComparisonConfig,
    dataset::Dataset,
    engine::{CancellationToken, MatchingEngine, ProgressObserver},
    error::RunError,
    result::ComparisonResult,
    settings::Settings,
};

/// A completed run together with the configuration that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRun {
    pub settings: Settings,
    pub config: ComparisonConfig,
    pub result: ComparisonResult,
}

/// Runs replace the published result only once they finish, so readers see
/// either the previous complete run or the new one.
#[derive(Debug)]
pub struct ComparisonSession {
    source: Arc<Dataset>,
    target: Arc<Dataset>,
    latest: RwLock<Option<Arc<ComparisonRun>>>,
}

impl ComparisonSession {
    pub fn new(source: Arc<Dataset>, target: Arc<Dataset>) -> Self {
        ComparisonSession {
            source,
            target,
            latest: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &Arc<Dataset> {
        &self.source
    }

    pub fn target(&self) -> &Arc<Dataset> {
        &self.target
    }

    pub fn latest(&self) -> Option<Arc<ComparisonRun>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates, runs, and publishes. Failed or cancelled runs leave the
    /// previously published run in place.
    pub fn run(
        &self,
        config: &ComparisonConfig,
        settings: &Settings,
        cancellation: Option<CancellationToken>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Arc<ComparisonRun>, RunError> {
        config.validate(&self.source, &self.target)?;
        let mut engine = MatchingEngine::new(settings.clone())?;
        if let Some(token) = cancellation {
            engine = engine.with_cancellation(token);
        }
        let result = engine.run(&self.source, &self.target, &config.keys, observer)?;
        let run = Arc::new(ComparisonRun {
            settings: settings.clone(),
            config: config.clone(),
            result,
        });
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&run));
        Ok(run)
    }

    pub fn clear(&self) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

mod common;

use std::sync::{Arc, mpsc};
use std::thread;

use common::{keyed, settings, table};
use csv_reconcile::{
    CancellationToken, ComparisonConfig, ComparisonSession, ConfigError, KeySelection, Match,
    NoProgress, Progress, ProgressObserver, RunError, Settings,
};

fn id_config() -> ComparisonConfig {
    ComparisonConfig::new(KeySelection::new("id", "id"))
}

fn session(source: &[&str], target: &[&str]) -> ComparisonSession {
    ComparisonSession::new(
        Arc::new(keyed("source", source)),
        Arc::new(keyed("target", target)),
    )
}

/// Cancels on the first pause.
struct CancelImmediately(CancellationToken);

impl ProgressObserver for CancelImmediately {
    fn on_progress(&mut self, _progress: &Progress) {}

    fn on_preview(&mut self, _preview: &[Match]) {}

    fn pause(&mut self) {
        self.0.cancel();
    }
}

#[test]
fn nothing_is_published_before_the_first_run() {
    let session = session(&["a"], &["a"]);
    assert!(session.latest().is_none());
}

#[test]
fn completed_run_is_published_with_its_configuration() {
    let session = session(&["Alice Smith", "Bob Lee"], &["alice smith"]);

    let run = session
        .run(&id_config(), &settings(0.6), None, &mut NoProgress)
        .expect("run");

    let latest = session.latest().expect("published");
    assert!(Arc::ptr_eq(&run, &latest));
    assert_eq!(latest.settings, settings(0.6));
    assert_eq!(latest.config, id_config());
    assert_eq!(latest.result.matches().len(), 1);
    assert_eq!(latest.result.source_only(), &[1]);
}

#[test]
fn rerun_with_new_settings_replaces_the_result() {
    let session = session(&["Alice Smith"], &["alice smith"]);
    session
        .run(&id_config(), &settings(0.6), None, &mut NoProgress)
        .expect("first run");

    let strict = Settings {
        case_sensitive: true,
        ..settings(1.0)
    };
    session
        .run(&id_config(), &strict, None, &mut NoProgress)
        .expect("second run");

    let latest = session.latest().expect("published");
    assert!(latest.settings.case_sensitive);
    assert!(latest.result.matches().is_empty());
}

#[test]
fn failed_configuration_keeps_the_previous_run() {
    let session = session(&["a"], &["a"]);
    let first = session
        .run(&id_config(), &settings(0.6), None, &mut NoProgress)
        .expect("first run");

    let bad_column = ComparisonConfig::new(KeySelection::new("id", "id"))
        .with_additional(Vec::new(), vec!["email".to_string()]);
    let err = session
        .run(&bad_column, &settings(0.6), None, &mut NoProgress)
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::UnknownColumn { ref column, .. }) if column == "email"
    ));

    let err = session
        .run(&id_config(), &settings(2.0), None, &mut NoProgress)
        .unwrap_err();
    assert_eq!(err, RunError::Config(ConfigError::InvalidThreshold(2.0)));

    assert!(Arc::ptr_eq(&first, &session.latest().expect("still published")));
}

#[test]
fn cancelled_run_publishes_nothing() {
    let session = session(&["a", "b"], &["a", "b"]);
    let previous = session
        .run(&id_config(), &settings(0.6), None, &mut NoProgress)
        .expect("first run");

    let token = CancellationToken::new();
    let err = session
        .run(
            &id_config(),
            &settings(0.0),
            Some(token.clone()),
            &mut CancelImmediately(token),
        )
        .unwrap_err();

    assert_eq!(err, RunError::Cancelled);
    let latest = session.latest().expect("previous run kept");
    assert!(Arc::ptr_eq(&previous, &latest));
    assert_eq!(latest.settings.threshold, 0.6);
}

#[test]
fn clear_drops_the_published_run() {
    let session = session(&["a"], &["a"]);
    session
        .run(&id_config(), &settings(0.6), None, &mut NoProgress)
        .expect("run");
    session.clear();
    assert!(session.latest().is_none());
}

#[test]
fn readers_on_other_threads_see_only_complete_runs() {
    let keys = (0..200).map(|n| format!("name {n}")).collect::<Vec<_>>();
    let refs = keys.iter().map(String::as_str).collect::<Vec<_>>();
    let session = Arc::new(ComparisonSession::new(
        Arc::new(keyed("source", &refs)),
        Arc::new(keyed("target", &refs)),
    ));
    let (done_tx, done_rx) = mpsc::channel();

    let reader = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            let mut observed = Vec::new();
            loop {
                if let Some(run) = session.latest() {
                    let result = &run.result;
                    observed.push(result.matches().len() + result.source_only().len());
                }
                if done_rx.try_recv().is_ok() {
                    break;
                }
                thread::yield_now();
            }
            observed
        })
    };

    for threshold in [1.0, 0.8, 0.5] {
        session
            .run(&id_config(), &settings(threshold), None, &mut NoProgress)
            .expect("run");
    }
    done_tx.send(()).expect("signal reader");

    let observed = reader.join().expect("reader thread");
    assert!(observed.iter().all(|total| *total == 200));
}

#[test]
fn datasets_are_shared_not_copied() {
    let source = Arc::new(table("crm", &["id", "email"], &[&["1", "a@x.io"]]));
    let target = Arc::new(keyed("billing", &["1"]));
    let session = ComparisonSession::new(Arc::clone(&source), Arc::clone(&target));

    assert!(Arc::ptr_eq(session.source(), &source));
    assert!(Arc::ptr_eq(session.target(), &target));
}

//! `compare` subcommand: load both files, run the engine, show and export.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::CompareArgs,
    config::{ComparisonConfig, KeySelection},
    dataset::Dataset,
    engine::{Progress, ProgressObserver},
    export::{self, ResultView},
    filter::{RowFilter, parse_filters},
    io_utils,
    result::Match,
    session::ComparisonSession,
    settings::Settings,
    summary::ComparisonSummary,
    table,
};

pub fn execute(args: &CompareArgs) -> Result<()> {
    let settings = resolve_settings(args)?;
    let source = Arc::new(load_dataset(
        &args.source,
        args.delimiter,
        args.source_encoding.as_deref(),
    )?);
    let target = Arc::new(load_dataset(
        &args.target,
        args.delimiter,
        args.target_encoding.as_deref(),
    )?);
    let config = ComparisonConfig::new(KeySelection::new(&args.source_key, &args.target_key))
        .with_additional(args.source_columns.clone(), args.target_columns.clone());

    let source_filter = RowFilter::resolve(&source, &parse_filters(&args.source_filters)?)?;
    let target_filter = RowFilter::resolve(&target, &parse_filters(&args.target_filters)?)?;

    info!(
        "Comparing '{}' ({} row(s)) on '{}' against '{}' ({} row(s)) on '{}' with threshold {}",
        source.name(),
        source.len(),
        config.keys.source,
        target.name(),
        target.len(),
        config.keys.target,
        settings.threshold
    );
    let session = ComparisonSession::new(Arc::clone(&source), Arc::clone(&target));
    let run = session
        .run(&config, &settings, None, &mut LogProgress::default())
        .context("Running comparison")?;

    let view = ResultView::new(&source, &target, &run.result, &run.config)
        .with_filters(source_filter, target_filter);
    let summary = ComparisonSummary::new(&run.result, &source, &target);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Serializing summary")?
        );
    } else {
        let (headers, rows) = summary.table_rows();
        table::print_table(&headers, &rows);
        if args.preview_rows > 0 {
            let shown = view
                .matches()
                .take(args.preview_rows)
                .map(|(m, _, _)| match_row(m))
                .collect::<Vec<_>>();
            if !shown.is_empty() {
                println!();
                table::print_table(&match_headers(&config), &shown);
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        let tables = view.tables(args.layout);
        let written = export::write_tables(dir, &tables)?;
        info!("Wrote {} result file(s) to {:?}", written.len(), dir);
    }
    Ok(())
}

fn resolve_settings(args: &CompareArgs) -> Result<Settings> {
    let mut settings = match (&args.settings, args.preset) {
        (Some(path), _) => Settings::load(path)?,
        (None, Some(preset)) => Settings::preset(preset),
        (None, None) => Settings::default(),
    };
    if let Some(threshold) = args.threshold {
        settings.threshold = threshold;
    }
    if args.case_sensitive {
        settings.case_sensitive = true;
    }
    if args.keep_whitespace {
        settings.ignore_whitespace = false;
    }
    if let Some(max) = args.max_matches {
        settings.max_matches_per_record = max;
    }
    if let Some(metric) = args.metric {
        settings.metric = metric;
    }
    settings.validate()?;
    debug!("Effective settings: {settings:?}");
    Ok(settings)
}

fn load_dataset(path: &Path, delimiter: Option<u8>, encoding: Option<&str>) -> Result<Dataset> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let encoding = io_utils::resolve_encoding(encoding)?;
    debug!(
        "Loading {:?} with delimiter '{}' and encoding {}",
        path,
        io_utils::printable_delimiter(delimiter),
        encoding.name()
    );
    Dataset::from_csv_path(path, delimiter, encoding)
}

fn match_headers(config: &ComparisonConfig) -> Vec<String> {
    vec![
        config.keys.source.clone(),
        config.keys.target.clone(),
        "score".to_string(),
    ]
}

fn match_row(m: &Match) -> Vec<String> {
    vec![
        m.source_key.trim().to_string(),
        m.target_key.trim().to_string(),
        format!("{}%", m.percent()),
    ]
}

/// Reports run progress through the log, one line per phase change.
#[derive(Debug, Default)]
struct LogProgress {
    last_phase: Option<String>,
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, progress: &Progress) {
        let percent = (progress.fraction * 100.0).round();
        if progress.phase.starts_with("Processed ") {
            debug!("[{percent:>3}%] {}", progress.phase);
            return;
        }
        if self.last_phase.as_deref() != Some(progress.phase.as_str()) {
            info!("[{percent:>3}%] {}", progress.phase);
            self.last_phase = Some(progress.phase.clone());
        }
    }

    fn on_preview(&mut self, preview: &[Match]) {
        for m in preview {
            debug!(
                "Preview: '{}' <-> '{}' ({}%)",
                m.source_key.trim(),
                m.target_key.trim(),
                m.percent()
            );
        }
    }
}

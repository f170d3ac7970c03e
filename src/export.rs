//! Projections of a finished comparison into output tables.
//!
//! Two layouts are offered. `compact` puts both key values and the score side
//! by side with suffixed passthrough columns (`name_File1`, `name_File2`).
//! `full` produces per-dataset views carrying every original column, with
//! unmatched rows tagged by a `Status` column.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;

use crate::{
    config::ComparisonConfig,
    dataset::{Dataset, Record},
    filter::RowFilter,
    io_utils,
    result::{ComparisonResult, Match},
};

pub const SOURCE_SUFFIX: &str = "_File1";
pub const TARGET_SUFFIX: &str = "_File2";
pub const SCORE_HEADER: &str = "Similarity_Score";
pub const STATUS_HEADER: &str = "Status";
pub const SOURCE_UNMATCHED_STATUS: &str = "No Match Found";
pub const TARGET_UNMATCHED_STATUS: &str = "Never Matched";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ExportLayout {
    #[default]
    Compact,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// File stem the table is written under.
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read-only, optionally filtered view over a result and its datasets.
pub struct ResultView<'a> {
    source: &'a Dataset,
    target: &'a Dataset,
    result: &'a ComparisonResult,
    config: &'a ComparisonConfig,
    source_filter: RowFilter,
    target_filter: RowFilter,
}

impl<'a> ResultView<'a> {
    pub fn new(
        source: &'a Dataset,
        target: &'a Dataset,
        result: &'a ComparisonResult,
        config: &'a ComparisonConfig,
    ) -> Self {
        ResultView {
            source,
            target,
            result,
            config,
            source_filter: RowFilter::default(),
            target_filter: RowFilter::default(),
        }
    }

    pub fn with_filters(mut self, source_filter: RowFilter, target_filter: RowFilter) -> Self {
        self.source_filter = source_filter;
        self.target_filter = target_filter;
        self
    }

    pub fn matches(&self) -> impl Iterator<Item = (&'a Match, &'a Record, &'a Record)> + '_ {
        self.result.matches().iter().filter_map(move |m| {
            let source = self.source.record(m.source_row)?;
            let target = self.target.record(m.target_row)?;
            (self.source_filter.accepts(source) && self.target_filter.accepts(target))
                .then_some((m, source, target))
        })
    }

    pub fn source_only(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.result
            .source_only_records(self.source)
            .filter(move |record| self.source_filter.accepts(record))
    }

    pub fn target_only(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.result
            .target_only_records(self.target)
            .filter(move |record| self.target_filter.accepts(record))
    }

    pub fn tables(&self, layout: ExportLayout) -> Vec<ExportTable> {
        match layout {
            ExportLayout::Compact => self.compact_tables(),
            ExportLayout::Full => self.full_tables(),
        }
    }

    fn compact_tables(&self) -> Vec<ExportTable> {
        let keys = &self.config.keys;
        let source_extra = passthrough(self.source, &self.config.additional.source, &keys.source);
        let target_extra = passthrough(self.target, &self.config.additional.target, &keys.target);
        let (source_label, target_label) = labels(self.source, self.target);

        let mut headers = vec![
            format!("{}{SOURCE_SUFFIX}", keys.source),
            format!("{}{TARGET_SUFFIX}", keys.target),
            SCORE_HEADER.to_string(),
        ];
        headers.extend(source_extra.iter().map(|(name, _)| format!("{name}{SOURCE_SUFFIX}")));
        headers.extend(target_extra.iter().map(|(name, _)| format!("{name}{TARGET_SUFFIX}")));
        let rows = self
            .matches()
            .map(|(m, source, target)| {
                let mut row = vec![
                    m.source_key.trim().to_string(),
                    m.target_key.trim().to_string(),
                    format!("{}%", m.percent()),
                ];
                row.extend(source_extra.iter().map(|(_, idx)| source.text(*idx)));
                row.extend(target_extra.iter().map(|(_, idx)| target.text(*idx)));
                row
            })
            .collect();
        let matches = ExportTable {
            name: "matches".to_string(),
            headers,
            rows,
        };

        vec![
            matches,
            only_table(&source_label, self.source, &keys.source, &source_extra, self.source_only()),
            only_table(&target_label, self.target, &keys.target, &target_extra, self.target_only()),
        ]
    }

    fn full_tables(&self) -> Vec<ExportTable> {
        let keys = &self.config.keys;
        let (source_label, target_label) = labels(self.source, self.target);
        let matches = self.matches().collect::<Vec<_>>();

        let source_matched = matched_side(
            &source_label,
            self.source,
            &keys.source,
            &keys.target,
            matches.iter().map(|(m, source, _)| (*m, &m.source_key, &m.target_key, *source)),
        );
        let target_matched = matched_side(
            &target_label,
            self.target,
            &keys.target,
            &keys.source,
            matches.iter().map(|(m, _, target)| (*m, &m.target_key, &m.source_key, *target)),
        );
        vec![
            source_matched,
            unmatched_side(&source_label, self.source, self.source_only(), SOURCE_UNMATCHED_STATUS),
            target_matched,
            unmatched_side(&target_label, self.target, self.target_only(), TARGET_UNMATCHED_STATUS),
        ]
    }
}

fn only_table<'r>(
    label: &str,
    dataset: &Dataset,
    key: &str,
    extra: &[(String, usize)],
    records: impl Iterator<Item = &'r Record>,
) -> ExportTable {
    let key_idx = dataset.column_index(key);
    let mut headers = vec![key.to_string()];
    headers.extend(extra.iter().map(|(name, _)| name.clone()));
    let rows = records
        .map(|record| {
            let mut row = vec![key_idx.map(|idx| record.text(idx)).unwrap_or_default()];
            row.extend(extra.iter().map(|(_, idx)| record.text(*idx)));
            row
        })
        .collect();
    ExportTable {
        name: format!("{label}_only"),
        headers,
        rows,
    }
}

fn matched_side<'r, I>(
    label: &str,
    dataset: &Dataset,
    own_key: &str,
    other_key: &str,
    matches: I,
) -> ExportTable
where
    I: Iterator<Item = (&'r Match, &'r String, &'r String, &'r Record)>,
{
    let others = dataset
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, header)| header.as_str() != own_key)
        .collect::<Vec<_>>();
    let mut headers = vec![
        own_key.to_string(),
        format!("Matched_With_{other_key}"),
        SCORE_HEADER.to_string(),
    ];
    headers.extend(others.iter().map(|(_, header)| (*header).clone()));
    let rows = matches
        .map(|(m, own_value, other_value, record)| {
            let mut row = vec![
                own_value.trim().to_string(),
                other_value.trim().to_string(),
                format!("{}%", m.percent()),
            ];
            row.extend(others.iter().map(|(idx, _)| record.text(*idx)));
            row
        })
        .collect();
    ExportTable {
        name: format!("{label}_matched_rows"),
        headers,
        rows,
    }
}

fn unmatched_side<'r>(
    label: &str,
    dataset: &Dataset,
    records: impl Iterator<Item = &'r Record>,
    status: &str,
) -> ExportTable {
    let mut headers = dataset.headers().to_vec();
    headers.push(STATUS_HEADER.to_string());
    let rows = records
        .map(|record| {
            let mut row = record.cells().iter().map(|cell| cell.as_display()).collect::<Vec<_>>();
            row.push(status.to_string());
            row
        })
        .collect();
    ExportTable {
        name: format!("{label}_unmatched_rows"),
        headers,
        rows,
    }
}

// Passthrough columns that exist in the dataset, minus the key itself.
fn passthrough(dataset: &Dataset, columns: &[String], key: &str) -> Vec<(String, usize)> {
    let mut resolved: Vec<(String, usize)> = Vec::new();
    for column in columns {
        if column == key || resolved.iter().any(|(name, _)| name == column) {
            continue;
        }
        if let Some(idx) = dataset.column_index(column) {
            resolved.push((column.clone(), idx));
        }
    }
    resolved
}

/// File-safe labels for the two datasets, disambiguated when names collide.
fn labels(source: &Dataset, target: &Dataset) -> (String, String) {
    let source_label = sanitize(source.name());
    let target_label = sanitize(target.name());
    if source_label == target_label {
        (format!("{source_label}_file1"), format!("{target_label}_file2"))
    } else {
        (source_label, target_label)
    }
}

fn sanitize(name: &str) -> String {
    let cleaned = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect::<String>();
    if cleaned.is_empty() { "dataset".to_string() } else { cleaned }
}

/// Writes each table as `<dir>/<name>.csv`, creating `dir` when missing.
pub fn write_tables(dir: &Path, tables: &[ExportTable]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Creating output directory {dir:?}"))?;
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.csv", table.name));
        let delimiter =
            io_utils::resolve_output_delimiter(&path, None, io_utils::DEFAULT_CSV_DELIMITER);
        let mut writer = io_utils::open_csv_writer(&path, delimiter)?;
        writer
            .write_record(&table.headers)
            .with_context(|| format!("Writing headers to {path:?}"))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .with_context(|| format!("Writing row to {path:?}"))?;
        }
        writer
            .flush()
            .with_context(|| format!("Flushing {path:?}"))?;
        info!("Wrote {} row(s) to {:?}", table.rows.len(), path);
        written.push(path);
    }
    Ok(written)
}

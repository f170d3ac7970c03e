//! Records, datasets, and CSV ingestion.
//!
//! A [`Dataset`] guarantees two invariants that the matching core relies on
//! and never re-checks: header names are unique, and every [`Record`] holds
//! exactly one [`Value`] per header (missing cells become [`Value::Empty`]).

use std::{collections::HashSet, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;

use crate::{data::Value, error::DatasetError, io_utils};

/// One row of a dataset. Cells are stored in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    index: usize,
    cells: Vec<Value>,
}

impl Record {
    /// Zero-based position of this record within its dataset.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> &Value {
        // Construction guarantees one cell per header.
        &self.cells[column]
    }

    /// Cell text as used for key comparison and display.
    pub fn text(&self, column: usize) -> String {
        self.cell(column).as_display()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from raw text rows. Short rows are padded with empty
    /// cells; rows wider than the header list are rejected.
    pub fn new<S, R, C>(name: S, headers: Vec<String>, rows: R) -> Result<Self, DatasetError>
    where
        S: Into<String>,
        R: IntoIterator<Item = Vec<C>>,
        C: AsRef<str>,
    {
        let name = name.into();
        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(DatasetError::DuplicateHeader {
                    dataset: name,
                    header: header.clone(),
                });
            }
        }

        let width = headers.len();
        let mut records = Vec::new();
        for (row, raw) in rows.into_iter().enumerate() {
            if raw.len() > width {
                return Err(DatasetError::RowTooWide {
                    dataset: name,
                    row: row + 1,
                    found: raw.len(),
                    expected: width,
                });
            }
            let mut cells: Vec<Value> = raw.iter().map(|c| Value::infer(c.as_ref())).collect();
            cells.resize(width, Value::Empty);
            records.push(Record {
                index: records.len(),
                cells,
            });
        }

        Ok(Dataset {
            name,
            headers,
            records,
        })
    }

    /// Reads a delimited file. Blank header cells are named `Column_<n>` and
    /// rows whose cells are all empty are skipped.
    pub fn from_csv_path(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let name = dataset_name(path);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let raw_headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DatasetError::Empty(name).into());
        }
        let headers = raw_headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let trimmed = header.trim();
                if trimmed.is_empty() {
                    format!("Column_{}", idx + 1)
                } else {
                    trimmed.to_string()
                }
            })
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        let mut blank_rows = 0usize;
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record =
                record.with_context(|| format!("Reading row {} of {path:?}", row_idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {} of {path:?}", row_idx + 2))?;
            if decoded.iter().all(|cell| cell.is_empty()) {
                blank_rows += 1;
                continue;
            }
            rows.push(decoded);
        }
        if blank_rows > 0 {
            debug!("Skipped {blank_rows} blank row(s) in {path:?}");
        }

        Dataset::new(name, headers, rows).with_context(|| format!("Loading dataset {path:?}"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell lookup by column name; `None` when the column does not exist.
    pub fn value<'a>(&self, record: &'a Record, column: &str) -> Option<&'a Value> {
        self.column_index(column).map(|idx| record.cell(idx))
    }
}

fn dataset_name(path: &Path) -> String {
    if io_utils::is_dash(path) {
        return "stdin".to_string();
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

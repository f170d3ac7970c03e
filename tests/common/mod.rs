#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_reconcile::{Dataset, Settings};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Reads a file under the workspace back as CSV rows, header first.
    pub fn read_csv(&self, name: &str) -> Vec<Vec<String>> {
        let path = self.temp_dir.path().join(name);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap_or_else(|err| panic!("open {path:?}: {err}"));
        reader
            .records()
            .map(|record| {
                record
                    .expect("csv record")
                    .iter()
                    .map(|cell| cell.to_string())
                    .collect()
            })
            .collect()
    }
}

/// Single-column dataset whose one header is `id`.
pub fn keyed(name: &str, keys: &[&str]) -> Dataset {
    Dataset::new(
        name,
        vec!["id".to_string()],
        keys.iter().map(|key| vec![*key]),
    )
    .expect("valid dataset")
}

/// Dataset from a header list and string rows.
pub fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> Dataset {
    Dataset::new(
        name,
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter().map(|row| row.to_vec()),
    )
    .expect("valid dataset")
}

pub fn settings(threshold: f64) -> Settings {
    Settings {
        threshold,
        ..Settings::default()
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    export::ExportLayout,
    settings::{Metric, Preset},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Fuzzy-match rows between two CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match rows of a source file against a target file on one key column each
    Compare(CompareArgs),
    /// Show one page of rows from a CSV file in a formatted table
    Preview(PreviewArgs),
    /// List the columns of a CSV file with fill counts and sample values
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Source CSV file; every row is looked up in the target
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,
    /// Target CSV file searched for counterparts
    #[arg(short = 't', long = "target")]
    pub target: PathBuf,
    /// Key column in the source file
    #[arg(long = "source-key")]
    pub source_key: String,
    /// Key column in the target file
    #[arg(long = "target-key")]
    pub target_key: String,
    /// Extra source columns to carry into the results
    #[arg(long = "source-columns", value_delimiter = ',')]
    pub source_columns: Vec<String>,
    /// Extra target columns to carry into the results
    #[arg(long = "target-columns", value_delimiter = ',')]
    pub target_columns: Vec<String>,
    /// Start from a named preset instead of the defaults
    #[arg(long, value_enum, conflicts_with = "settings")]
    pub preset: Option<Preset>,
    /// YAML or JSON settings file; flags below override its values
    #[arg(long = "settings")]
    pub settings: Option<PathBuf>,
    /// Minimum similarity (0.0 to 1.0) for a match to be accepted
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Treat "Apple" and "apple" as different keys
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,
    /// Compare keys with their whitespace exactly as written
    #[arg(long = "keep-whitespace")]
    pub keep_whitespace: bool,
    /// How many source rows may match the same target row
    #[arg(long = "max-matches")]
    pub max_matches: Option<usize>,
    /// Edit-distance formula used for scoring
    #[arg(long, value_enum)]
    pub metric: Option<Metric>,
    /// Filter applied to source rows in the results, e.g. `region = EMEA`
    #[arg(long = "source-filter", action = clap::ArgAction::Append)]
    pub source_filters: Vec<String>,
    /// Filter applied to target rows in the results
    #[arg(long = "target-filter", action = clap::ArgAction::Append)]
    pub target_filters: Vec<String>,
    /// Directory to write result files into
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Shape of the written result files
    #[arg(long, value_enum, default_value = "compact")]
    pub layout: ExportLayout,
    /// Number of matches shown in the terminal (0 hides them)
    #[arg(long = "preview-rows", default_value_t = 10)]
    pub preview_rows: usize,
    /// Print the summary as JSON instead of a table
    #[arg(long = "json")]
    pub json: bool,
    /// CSV delimiter character for both inputs
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the source file (defaults to utf-8)
    #[arg(long = "source-encoding")]
    pub source_encoding: Option<String>,
    /// Character encoding of the target file (defaults to utf-8)
    #[arg(long = "target-encoding")]
    pub target_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Rows per page
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

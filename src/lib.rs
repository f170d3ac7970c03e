pub mod cli;
pub mod columns;
pub mod compare;
pub mod config;
pub mod data;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod index;
pub mod io_utils;
pub mod normalize;
pub mod preview;
pub mod result;
pub mod session;
pub mod settings;
pub mod similarity;
pub mod summary;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::{AdditionalColumns, ComparisonConfig, KeySelection},
    dataset::{Dataset, Record},
    engine::{CancellationToken, MatchingEngine, NoProgress, Progress, ProgressObserver},
    error::{ConfigError, DatasetError, RunError},
    result::{ComparisonResult, Match},
    session::{ComparisonRun, ComparisonSession},
    settings::{Metric, Preset, Settings},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_reconcile", log::LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => compare::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}

//! Command-line interface for peak and cluster extraction.
//!
//! `peakclus run` loads a JSON input document, runs the extraction with the
//! given threshold and writes the peak and cluster tables to stdout.

mod commands;
mod input;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, OutputFormat, RunCommand, StrategyArg,
    render_summary, run_cli,
};
pub use input::{DegreesField, InputDocument, MaskEntry, StatisticRows};

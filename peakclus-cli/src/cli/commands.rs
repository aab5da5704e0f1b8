//! Command implementations and argument parsing for the peakclus CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use peakclus_core::{
    AdjacencyError, ExecutionStrategy, PeakClusBuilder, PeakClusError, PeakClusterReport,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::load_input;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "peakclus",
    about = "Extract peaks and resel-ranked clusters from a statistic map."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run peak and cluster extraction on a JSON input document.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// JSON document holding `t`, `edges` and the optional `df`, `k`, `mask`
    /// and `resels_per_vertex` fields.
    pub input: PathBuf,

    /// Cluster-forming threshold applied to the primary statistic.
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Number of variates, overriding the document.
    #[arg(long)]
    pub k: Option<usize>,

    /// Degrees of freedom (one or two comma-separated values), overriding the
    /// document.
    #[arg(long, value_delimiter = ',')]
    pub df: Option<Vec<f64>>,

    /// Scheduling of the per-node resel computation.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,
}

/// Execution strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Let the library choose.
    Auto,
    /// Run on the calling thread.
    Sequential,
    /// Require the Rayon pool.
    Parallel,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Parallel => Self::Parallel,
        }
    }
}

/// Output formats for the execution summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated tables for terminals.
    Human,
    /// A single JSON object.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input document could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input document is not valid JSON for the expected schema.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the malformed document.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A numeric mask entry was neither 0 nor 1.
    #[error("mask entry {index} must be 0 or 1 (got {value})")]
    InvalidMask {
        /// Zero-based position of the entry.
        index: usize,
        /// The rejected value.
        value: u8,
    },
    /// The edge list contained an invalid identifier.
    #[error(transparent)]
    Edges(#[from] AdjacencyError),
    /// Core validation or extraction failed.
    #[error(transparent)]
    Core(#[from] PeakClusError),
}

/// Summarises the outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name derived from the input file.
    pub input: String,
    /// Threshold that formed the clusters.
    pub threshold: f64,
    /// Requested output format.
    pub output: OutputFormat,
    /// Extraction result.
    pub report: PeakClusterReport,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, validation or extraction fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use peakclus_cli::cli::{Cli, Command, OutputFormat, RunCommand, StrategyArg, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), r#"{ "t": [1, 5, 2, 5, 1], "edges": [[1,2],[2,3],[3,4],[4,5]] }"#)?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         input: file.path().to_path_buf(),
///         threshold: 2.0,
///         k: None,
///         df: None,
///         strategy: StrategyArg::Sequential,
///         output: OutputFormat::Human,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.report.cluster_id_values(), vec![0, 1, 1, 1, 0]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(threshold = command.threshold, input = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let search = PeakClusBuilder::new()
        .with_threshold(command.threshold)
        .with_execution_strategy(command.strategy.into())
        .build()?;
    let input = derive_input_name(&command.input);
    Span::current().record("input", field::display(&input));

    let document = load_input(&command.input)?;
    let model = document.model(command.k, command.df.as_deref())?;
    let mask = document.mask()?;
    let edges = document.edge_list()?;
    let report = match &document.resels_per_vertex {
        Some(weights) => search.run_weighted(&model, &mask, &edges, weights)?,
        None => search.run(&model, &mask, &edges)?,
    };

    info!(
        input = input.as_str(),
        clusters = report.clusters().len(),
        peaks = report.peaks().len(),
        "command completed"
    );
    Ok(ExecutionSummary {
        input,
        threshold: command.threshold,
        output: command.output,
        report,
    })
}

pub(super) fn derive_input_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "input".to_owned(), ToOwned::to_owned)
}

#[derive(Serialize)]
struct PeakRow {
    value: f64,
    node: usize,
    cluster: usize,
}

#[derive(Serialize)]
struct ClusterRow {
    id: usize,
    vertices: usize,
    resels: f64,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    input: &'a str,
    threshold: f64,
    peaks: Vec<PeakRow>,
    clusters: Vec<ClusterRow>,
    cluster_ids: Vec<u64>,
}

impl<'a> SummaryDocument<'a> {
    fn new(summary: &'a ExecutionSummary) -> Self {
        let report = &summary.report;
        Self {
            input: &summary.input,
            threshold: summary.threshold,
            peaks: report
                .peaks()
                .iter()
                .map(|peak| PeakRow {
                    value: peak.value,
                    node: peak.node.get(),
                    cluster: peak.cluster.get(),
                })
                .collect(),
            clusters: report
                .clusters()
                .iter()
                .map(|cluster| ClusterRow {
                    id: cluster.id.get(),
                    vertices: cluster.vertex_count,
                    resels: cluster.resels,
                })
                .collect(),
            cluster_ids: report.cluster_id_values(),
        }
    }
}

/// Renders `summary` to `writer` in its requested [`OutputFormat`].
///
/// The human format prints a header, a `peak` line per peak and a `cluster`
/// line per cluster; the JSON format prints one object with `peaks`,
/// `clusters` and `cluster_ids`.
///
/// # Errors
/// Returns [`io::Error`] if writing or serialisation fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.output {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &SummaryDocument::new(summary))?;
            writeln!(writer)
        }
        OutputFormat::Human => render_human(summary, writer),
    }
}

fn render_human(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let report = &summary.report;
    writeln!(writer, "input: {}", summary.input)?;
    writeln!(writer, "threshold: {}", summary.threshold)?;
    writeln!(
        writer,
        "clusters: {}  peaks: {}",
        report.clusters().len(),
        report.peaks().len()
    )?;
    for peak in report.peaks() {
        writeln!(
            writer,
            "peak\t{}\t{}\t{}",
            peak.node.get(),
            peak.value,
            peak.cluster.get()
        )?;
    }
    for cluster in report.clusters() {
        writeln!(
            writer,
            "cluster\t{}\t{}\t{}",
            cluster.id.get(),
            cluster.vertex_count,
            cluster.resels
        )?;
    }
    Ok(())
}

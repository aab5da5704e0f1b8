//! Entry point for the `peakclus` binary.
//!
//! Initialises logging, runs the parsed command, writes the summary to stdout
//! and maps failures to a non-zero exit code with their stable error code
//! attached to the log record.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use peakclus_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let mut writer = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };
    let (code, adjacency_code) = match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (
            Some(core.code().as_str()),
            core.adjacency_code().map(|code| code.as_str()),
        ),
        Some(CliError::Edges(edges)) => (Some(edges.code().as_str()), None),
        _ => (None, None),
    };
    error!(
        error = %err,
        cause = %err.root_cause(),
        code = code.map(field::display),
        adjacency_code = adjacency_code.map(field::display),
        "command execution failed"
    );
    ExitCode::FAILURE
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}

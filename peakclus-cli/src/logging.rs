//! Structured logging for the `peakclus` binary.
//!
//! Diagnostics go to stderr so stdout carries only the rendered summary.
//! `RUST_LOG` sets the filter (default `info`) and `PEAKCLUS_LOG_FORMAT`
//! selects `human` or `json` output. Records from the `log` facade are
//! forwarded into `tracing`.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "PEAKCLUS_LOG_FORMAT";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Rendering of log records on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// One JSON object per record, including the span list.
    Json,
}

impl LogFormat {
    /// Parses a case-insensitive format name.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for names other than
    /// `human` and `json`.
    ///
    /// # Examples
    /// ```
    /// use peakclus_cli::logging::LogFormat;
    ///
    /// assert_eq!(LogFormat::parse(" JSON ")?, LogFormat::Json);
    /// assert!(LogFormat::parse("xml").is_err());
    /// # Ok::<(), peakclus_cli::logging::LoggingError>(())
    /// ```
    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }

    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable was not valid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// The requested format is not `human` or `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value supplied by the user.
        provided: String,
    },
    /// Another global subscriber is already installed.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber once and returns the active format.
///
/// Later calls return the format chosen by the first successful call.
///
/// # Errors
/// Returns [`LoggingError`] when the format variable is invalid or another
/// subscriber already owns the global slot.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }
    let format = LogFormat::from_env()?;
    install(format)?;
    Ok(*INSTALLED.get_or_init(|| format))
}

fn install(format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let fmt_layer = match format {
        LogFormat::Human => fmt_layer.boxed(),
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // A logger installed elsewhere keeps the `log` slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("Human", LogFormat::Human)]
    #[case("json", LogFormat::Json)]
    #[case("\tJSON\n", LogFormat::Json)]
    fn parse_accepts_known_formats(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::parse(raw).expect("format must parse"), expected);
    }

    #[rstest]
    #[case("yaml", "yaml")]
    #[case(" Pretty ", "pretty")]
    #[case("", "")]
    fn parse_reports_the_normalised_value(#[case] raw: &str, #[case] provided: &str) {
        match LogFormat::parse(raw).expect_err("format must be rejected") {
            LoggingError::UnsupportedFormat { provided: got } => assert_eq!(got, provided),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

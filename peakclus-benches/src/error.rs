//! Benchmark setup error type.

use peakclus_core::{AdjacencyError, PeakClusError};

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A lattice side or row count was zero.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// The parameter that was zero.
        context: &'static str,
    },
    /// Building the lattice edge list failed.
    #[error("lattice adjacency failed: {0}")]
    Adjacency(#[from] AdjacencyError),
    /// Model validation or extraction failed.
    #[error("peak and cluster extraction failed: {0}")]
    Core(#[from] PeakClusError),
}

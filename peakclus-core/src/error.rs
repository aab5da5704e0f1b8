//! Error types for the peakclus core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{builder::ExecutionStrategy, remap::RemapError};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::AdjacencyProvider`] implementations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AdjacencyError {
    /// The provider could not derive adjacency for the requested domain.
    #[error("adjacency unavailable: {reason}")]
    Unavailable {
        /// Human-readable explanation supplied by the provider.
        reason: Arc<str>,
    },
    /// A raw node identifier was zero; identifiers are 1-based.
    #[error("node identifier {raw} is not 1-based")]
    InvalidNodeId {
        /// The offending raw identifier.
        raw: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`AdjacencyError`] variants.
    enum AdjacencyErrorCode for AdjacencyError {
        /// The provider could not derive adjacency for the requested domain.
        Unavailable => Unavailable { .. } => "ADJACENCY_UNAVAILABLE",
        /// A raw node identifier was zero.
        InvalidNodeId => InvalidNodeId { .. } => "ADJACENCY_INVALID_NODE_ID",
    }
}

/// Error type produced when configuring or running [`crate::PeakClus`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PeakClusError {
    /// The statistic map has no rows or no nodes.
    #[error("statistic map must contain at least one row and one node")]
    EmptyStatistic,
    /// A statistic row does not have one entry per node.
    #[error("statistic row {row} has {len} entries but row 0 has {expected}")]
    RaggedStatistic {
        /// Zero-based row index.
        row: usize,
        /// Number of entries found in the row.
        len: usize,
        /// Number of nodes implied by row 0.
        expected: usize,
    },
    /// The mask does not cover every node.
    #[error("mask has {mask} entries but the statistic map has {nodes} nodes")]
    MaskLengthMismatch {
        /// Length of the supplied mask.
        mask: usize,
        /// Number of nodes in the statistic map.
        nodes: usize,
    },
    /// The resels-per-vertex weights do not cover every node.
    #[error("resels-per-vertex has {resels} entries but the statistic map has {nodes} nodes")]
    ReselsLengthMismatch {
        /// Length of the supplied weight slice.
        resels: usize,
        /// Number of nodes in the statistic map.
        nodes: usize,
    },
    /// A resels-per-vertex weight is negative, NaN or infinite.
    #[error("resels-per-vertex entry {index} must be finite and non-negative (got {value})")]
    InvalidReselWeight {
        /// Zero-based node index of the offending weight.
        index: usize,
        /// The rejected weight.
        value: f64,
    },
    /// The cluster-forming threshold is NaN or infinite.
    #[error("threshold must be finite (got {threshold})")]
    NonFiniteThreshold {
        /// The rejected threshold.
        threshold: f64,
    },
    /// No resel formula exists for the requested number of variates.
    #[error("variate count must be 1, 2 or 3 (got {k})")]
    UnsupportedVariateCount {
        /// The rejected variate count.
        k: usize,
    },
    /// Degrees of freedom must be a scalar or a pair.
    #[error("degrees of freedom must have 1 or 2 entries (got {len})")]
    InvalidDegreesOfFreedom {
        /// Number of entries supplied.
        len: usize,
    },
    /// An edge referenced a node outside the statistic map.
    #[error("edge {edge} references node {node}, but the statistic map has {node_count} nodes")]
    EdgeOutOfBounds {
        /// Zero-based position of the edge in the edge list.
        edge: usize,
        /// The 1-based node identifier that is out of range.
        node: usize,
        /// Number of nodes in the statistic map.
        node_count: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// An [`crate::AdjacencyProvider`] failed to produce an edge list.
    #[error("adjacency provider `{provider}` failed: {error}")]
    Adjacency {
        /// Identifier for the provider that produced the error.
        provider: Arc<str>,
        #[source]
        /// Underlying provider error.
        error: AdjacencyError,
    },
    /// Remapping between component identifiers and ranks failed.
    #[error("cluster id remap failed: {error}")]
    Remap {
        #[source]
        /// Underlying remap error.
        error: RemapError,
    },
}

define_error_codes! {
    /// Stable codes describing [`PeakClusError`] variants.
    enum PeakClusErrorCode for PeakClusError {
        /// The statistic map has no rows or no nodes.
        EmptyStatistic => EmptyStatistic => "PEAKCLUS_EMPTY_STATISTIC",
        /// A statistic row does not have one entry per node.
        RaggedStatistic => RaggedStatistic { .. } => "PEAKCLUS_RAGGED_STATISTIC",
        /// The mask does not cover every node.
        MaskLengthMismatch => MaskLengthMismatch { .. } => "PEAKCLUS_MASK_LENGTH_MISMATCH",
        /// The resels-per-vertex weights do not cover every node.
        ReselsLengthMismatch => ReselsLengthMismatch { .. } => "PEAKCLUS_RESELS_LENGTH_MISMATCH",
        /// A resels-per-vertex weight is negative, NaN or infinite.
        InvalidReselWeight => InvalidReselWeight { .. } => "PEAKCLUS_INVALID_RESEL_WEIGHT",
        /// The cluster-forming threshold is NaN or infinite.
        NonFiniteThreshold => NonFiniteThreshold { .. } => "PEAKCLUS_NON_FINITE_THRESHOLD",
        /// No resel formula exists for the requested number of variates.
        UnsupportedVariateCount => UnsupportedVariateCount { .. } => "PEAKCLUS_UNSUPPORTED_VARIATE_COUNT",
        /// Degrees of freedom must be a scalar or a pair.
        InvalidDegreesOfFreedom => InvalidDegreesOfFreedom { .. } => "PEAKCLUS_INVALID_DEGREES_OF_FREEDOM",
        /// An edge referenced a node outside the statistic map.
        EdgeOutOfBounds => EdgeOutOfBounds { .. } => "PEAKCLUS_EDGE_OUT_OF_BOUNDS",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "PEAKCLUS_BACKEND_UNAVAILABLE",
        /// An adjacency provider failed.
        AdjacencyFailure => Adjacency { .. } => "PEAKCLUS_ADJACENCY_FAILURE",
        /// Remapping between component identifiers and ranks failed.
        RemapFailure => Remap { .. } => "PEAKCLUS_REMAP_FAILURE",
    }
}

impl PeakClusError {
    /// Retrieve the inner [`AdjacencyErrorCode`] when the error originated in an
    /// [`crate::AdjacencyProvider`].
    #[must_use]
    pub const fn adjacency_code(&self) -> Option<AdjacencyErrorCode> {
        match self {
            Self::Adjacency { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns `true` when the error was raised by input validation, before any
    /// part of the computation ran.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyStatistic
                | Self::RaggedStatistic { .. }
                | Self::MaskLengthMismatch { .. }
                | Self::ReselsLengthMismatch { .. }
                | Self::InvalidReselWeight { .. }
                | Self::NonFiniteThreshold { .. }
                | Self::UnsupportedVariateCount { .. }
                | Self::InvalidDegreesOfFreedom { .. }
                | Self::EdgeOutOfBounds { .. }
        )
    }
}

impl From<RemapError> for PeakClusError {
    fn from(error: RemapError) -> Self {
        Self::Remap { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PeakClusError>;

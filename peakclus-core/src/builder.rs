//! Builder utilities for configuring peak and cluster extraction.
//!
//! Exposes the execution strategy selection surface and builder validation
//! used before constructing [`PeakClus`] instances.

use tracing::warn;

use crate::{Result, error::PeakClusError, peak_clus::PeakClus};

/// Indicates how [`PeakClus`] schedules the per-node resel computation.
///
/// `Auto` resolves deterministically: it uses the Rayon pool when the
/// `parallel` feature is compiled in and runs sequentially otherwise. Results
/// are identical under every strategy.
///
/// # Examples
/// ```
/// use peakclus_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Allow the library to select an appropriate backend automatically.
    Auto,
    /// Restrict execution to the calling thread.
    Sequential,
    /// Require the Rayon-backed implementation.
    Parallel,
}

impl ExecutionStrategy {
    /// Resolves `Auto` to the concrete strategy used by this build.
    ///
    /// # Errors
    /// Returns [`PeakClusError::BackendUnavailable`] when `Parallel` is
    /// requested but the `parallel` feature is disabled.
    pub(crate) fn resolve(self) -> Result<Self> {
        match self {
            #[cfg(feature = "parallel")]
            Self::Auto => Ok(Self::Parallel),
            #[cfg(not(feature = "parallel"))]
            Self::Auto => Ok(Self::Sequential),
            Self::Sequential => Ok(Self::Sequential),
            #[cfg(feature = "parallel")]
            Self::Parallel => Ok(Self::Parallel),
            #[cfg(not(feature = "parallel"))]
            Self::Parallel => Err(PeakClusError::BackendUnavailable {
                requested: Self::Parallel,
            }),
        }
    }
}

/// Configures and constructs [`PeakClus`] instances.
///
/// # Examples
/// ```
/// use peakclus_core::{ExecutionStrategy, PeakClusBuilder};
///
/// let search = PeakClusBuilder::new()
///     .with_threshold(3.1)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(search.threshold(), 3.1);
/// assert_eq!(search.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct PeakClusBuilder {
    threshold: f64,
    execution_strategy: ExecutionStrategy,
}

impl Default for PeakClusBuilder {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl PeakClusBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::{ExecutionStrategy, PeakClusBuilder};
    ///
    /// let builder = PeakClusBuilder::new();
    /// assert_eq!(builder.threshold(), 0.0);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the cluster-forming threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the configured threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sets the execution strategy to use when running the extraction.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`PeakClus`] instance.
    ///
    /// # Errors
    /// Returns [`PeakClusError::NonFiniteThreshold`] when the threshold is NaN
    /// or infinite, and [`PeakClusError::BackendUnavailable`] when the
    /// strategy cannot be honoured by this build.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::{PeakClusBuilder, PeakClusError};
    ///
    /// let err = PeakClusBuilder::new()
    ///     .with_threshold(f64::NAN)
    ///     .build()
    ///     .expect_err("NaN thresholds are rejected");
    /// assert!(matches!(err, PeakClusError::NonFiniteThreshold { .. }));
    /// ```
    pub fn build(self) -> Result<PeakClus> {
        if !self.threshold.is_finite() {
            warn!(threshold = self.threshold, "rejecting non-finite threshold");
            return Err(PeakClusError::NonFiniteThreshold {
                threshold: self.threshold,
            });
        }
        let strategy = self.execution_strategy.resolve()?;
        Ok(PeakClus::new(self.threshold, self.execution_strategy, strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn build_rejects_non_finite_thresholds(#[case] threshold: f64) {
        let err = PeakClusBuilder::new()
            .with_threshold(threshold)
            .build()
            .expect_err("non-finite threshold must be rejected");
        assert!(matches!(err, PeakClusError::NonFiniteThreshold { .. }));
    }

    #[test]
    fn sequential_always_resolves() {
        assert_eq!(
            ExecutionStrategy::Sequential.resolve(),
            Ok(ExecutionStrategy::Sequential)
        );
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    #[case(ExecutionStrategy::Auto)]
    #[case(ExecutionStrategy::Parallel)]
    fn auto_and_parallel_use_rayon(#[case] requested: ExecutionStrategy) {
        assert_eq!(requested.resolve(), Ok(ExecutionStrategy::Parallel));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn auto_falls_back_to_sequential() {
        assert_eq!(
            ExecutionStrategy::Auto.resolve(),
            Ok(ExecutionStrategy::Sequential)
        );
    }

    #[test]
    fn built_instance_reports_the_requested_strategy() {
        let search = PeakClusBuilder::new()
            .with_threshold(-1.0)
            .with_execution_strategy(ExecutionStrategy::Auto)
            .build()
            .expect("valid configuration");
        assert_eq!(search.threshold(), -1.0);
        assert_eq!(search.execution_strategy(), ExecutionStrategy::Auto);
    }
}

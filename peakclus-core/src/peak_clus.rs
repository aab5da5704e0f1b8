//! Peak and cluster extraction orchestration.
//!
//! Provides the [`PeakClus`] runtime entry point, which validates inputs,
//! obtains the adjacency graph and drives the detection, labelling, resel and
//! assembly stages in order.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    Result,
    adjacency::{AdjacencyProvider, EdgeList},
    assembly::{AssemblyInputs, assemble},
    builder::ExecutionStrategy,
    components::{ExcursionSet, label_components},
    error::PeakClusError,
    local_max::{apply_mask, local_maxima},
    model::StatisticModel,
    resels::{ReselInputs, ReselStrategy, component_resels, node_contributions},
    result::PeakClusterReport,
};

/// Entry point for peak and cluster extraction.
///
/// # Examples
/// ```
/// use peakclus_core::{EdgeList, PeakClusBuilder, StatisticMap, StatisticModel};
///
/// let model = StatisticModel::new(StatisticMap::from_primary(vec![1.0, 5.0, 2.0, 5.0, 1.0])?);
/// let edges = EdgeList::from_raw_pairs(&[(1, 2), (2, 3), (3, 4), (4, 5)])?;
/// let search = PeakClusBuilder::new().with_threshold(2.0).build()?;
///
/// let report = search.run(&model, &[true; 5], &edges)?;
/// assert_eq!(report.clusters().len(), 1);
/// assert_eq!(report.clusters()[0].vertex_count, 3);
/// assert_eq!(report.peaks().len(), 2);
/// assert_eq!(report.cluster_id_values(), vec![0, 1, 1, 1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PeakClus {
    threshold: f64,
    requested: ExecutionStrategy,
    resolved: ExecutionStrategy,
}

impl PeakClus {
    pub(crate) fn new(
        threshold: f64,
        requested: ExecutionStrategy,
        resolved: ExecutionStrategy,
    ) -> Self {
        Self {
            threshold,
            requested,
            resolved,
        }
    }

    /// Returns the cluster-forming threshold.
    #[must_use]
    #[rustfmt::skip]
    pub fn threshold(&self) -> f64 { self.threshold }

    /// Returns the execution strategy requested at build time.
    #[must_use]
    #[rustfmt::skip]
    pub fn execution_strategy(&self) -> ExecutionStrategy { self.requested }

    /// Extracts peaks and clusters with unit resels per vertex.
    ///
    /// # Errors
    /// Returns [`PeakClusError::MaskLengthMismatch`] when `mask` does not cover
    /// every node, [`PeakClusError::Adjacency`] when the provider fails, and
    /// [`PeakClusError::EdgeOutOfBounds`] when an edge references a node
    /// outside the statistic map. An empty supra-threshold set is not an
    /// error; it yields [`PeakClusterReport::empty`].
    pub fn run<A>(
        &self,
        model: &StatisticModel,
        mask: &[bool],
        adjacency: &A,
    ) -> Result<PeakClusterReport>
    where
        A: AdjacencyProvider + ?Sized,
    {
        self.run_inner(model, mask, adjacency, None)
    }

    /// Extracts peaks and clusters, weighting each node by
    /// `resels_per_vertex`.
    ///
    /// # Errors
    /// As [`Self::run`], plus [`PeakClusError::ReselsLengthMismatch`] when the
    /// weights do not cover every node and [`PeakClusError::InvalidReselWeight`]
    /// when a weight is negative, NaN or infinite.
    pub fn run_weighted<A>(
        &self,
        model: &StatisticModel,
        mask: &[bool],
        adjacency: &A,
        resels_per_vertex: &[f64],
    ) -> Result<PeakClusterReport>
    where
        A: AdjacencyProvider + ?Sized,
    {
        self.run_inner(model, mask, adjacency, Some(resels_per_vertex))
    }

    #[instrument(
        name = "core.run",
        err,
        skip(self, model, mask, adjacency, weights),
        fields(
            provider = %adjacency.name(),
            nodes = model.node_count(),
            rows = model.statistic().row_count(),
            k = model.variate_count().get(),
            threshold = self.threshold,
            strategy = ?self.resolved,
        ),
    )]
    fn run_inner<A>(
        &self,
        model: &StatisticModel,
        mask: &[bool],
        adjacency: &A,
        weights: Option<&[f64]>,
    ) -> Result<PeakClusterReport>
    where
        A: AdjacencyProvider + ?Sized,
    {
        let nodes = model.node_count();
        validate_inputs(nodes, mask, weights)?;
        let edges = adjacency
            .edges(nodes)
            .map_err(|error| PeakClusError::Adjacency {
                provider: Arc::from(adjacency.name()),
                error,
            })?;
        validate_edges(&edges, nodes)?;

        let primary = model.statistic().primary();
        let maxima = local_maxima(&apply_mask(primary, mask), &edges);
        let set = ExcursionSet::from_threshold(primary, mask, self.threshold);
        if set.is_empty() {
            info!("no node reached the threshold, returning an empty report");
            return Ok(PeakClusterReport::empty(nodes));
        }

        let components = label_components(&set, &edges);
        let inputs = ReselInputs {
            strategy: ReselStrategy::select(model),
            statistic: model.statistic(),
            threshold: self.threshold,
            weights,
        };
        let parallel = matches!(self.resolved, ExecutionStrategy::Parallel);
        let contributions = node_contributions(&inputs, &set, parallel);
        let resels = component_resels(&contributions, &components);

        let report = assemble(&AssemblyInputs {
            primary,
            maxima: &maxima,
            set: &set,
            components: &components,
            resels: &resels,
        })?;
        record_metrics(&report);
        info!(
            supra_threshold = set.len(),
            clusters = report.clusters().len(),
            peaks = report.peaks().len(),
            "peak and cluster extraction completed"
        );
        Ok(report)
    }
}

fn validate_inputs(nodes: usize, mask: &[bool], weights: Option<&[f64]>) -> Result<()> {
    if mask.len() != nodes {
        return Err(PeakClusError::MaskLengthMismatch {
            mask: mask.len(),
            nodes,
        });
    }
    let Some(weights) = weights else {
        return Ok(());
    };
    if weights.len() != nodes {
        return Err(PeakClusError::ReselsLengthMismatch {
            resels: weights.len(),
            nodes,
        });
    }
    // Weights feed the resel ranking and must be finite and non-negative.
    match weights
        .iter()
        .enumerate()
        .find(|&(_, &value)| !value.is_finite() || value < 0.0)
    {
        Some((index, &value)) => Err(PeakClusError::InvalidReselWeight { index, value }),
        None => Ok(()),
    }
}

fn validate_edges(edges: &EdgeList, node_count: usize) -> Result<()> {
    for (position, edge) in edges.iter().enumerate() {
        for node in [edge.left(), edge.right()] {
            if node.get() > node_count {
                return Err(PeakClusError::EdgeOutOfBounds {
                    edge: position,
                    node: node.get(),
                    node_count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(feature = "metrics")]
#[expect(
    clippy::cast_precision_loss,
    reason = "Histogram samples are recorded as f64"
)]
fn record_metrics(report: &PeakClusterReport) {
    metrics::counter!("peakclus_runs_total").increment(1);
    metrics::histogram!("peakclus_clusters_per_run").record(report.clusters().len() as f64);
    metrics::histogram!("peakclus_peaks_per_run").record(report.peaks().len() as f64);
}

#[cfg(not(feature = "metrics"))]
fn record_metrics(_report: &PeakClusterReport) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::PeakClusBuilder, model::StatisticMap};

    fn search(threshold: f64) -> PeakClus {
        PeakClusBuilder::new()
            .with_threshold(threshold)
            .with_execution_strategy(ExecutionStrategy::Sequential)
            .build()
            .expect("valid configuration")
    }

    #[test]
    fn validate_edges_reports_first_offender() {
        let edges = EdgeList::from_raw_pairs(&[(1, 2), (2, 9)]).expect("valid pairs");
        let err = validate_edges(&edges, 3).expect_err("node 9 is out of range");
        assert_eq!(
            err,
            PeakClusError::EdgeOutOfBounds {
                edge: 1,
                node: 9,
                node_count: 3,
            }
        );
    }

    #[test]
    fn validate_inputs_reports_first_invalid_weight() {
        let weights = [1.0, -0.5, f64::NAN];
        let err = validate_inputs(3, &[true; 3], Some(&weights)).expect_err("negative weight");
        assert_eq!(
            err,
            PeakClusError::InvalidReselWeight {
                index: 1,
                value: -0.5,
            }
        );
        assert!(validate_inputs(3, &[true; 3], Some(&[0.0, 2.0, 0.5])).is_ok());
    }

    #[test]
    fn mask_is_validated_before_the_provider_runs() {
        struct Failing;
        impl AdjacencyProvider for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn edges(&self, _: usize) -> core::result::Result<EdgeList, crate::AdjacencyError> {
                panic!("provider must not be consulted");
            }
        }
        let model = StatisticModel::new(StatisticMap::from_primary(vec![1.0, 2.0]).expect("map"));
        let err = search(0.0)
            .run(&model, &[true], &Failing)
            .expect_err("mask length mismatch");
        assert_eq!(err, PeakClusError::MaskLengthMismatch { mask: 1, nodes: 2 });
    }
}

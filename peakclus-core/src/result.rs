//! Result types for peak and cluster extraction.
//!
//! Provides the peak table, the ranked cluster table and the per-node cluster
//! map returned by [`crate::PeakClus::run`].

use std::num::NonZeroUsize;

use crate::adjacency::NodeId;

/// Rank-based identifier of a cluster; `1` is the cluster with the most
/// resels.
///
/// # Examples
/// ```
/// use peakclus_core::ClusterId;
///
/// let id = ClusterId::new(4).expect("ranks start at 1");
/// assert_eq!(id.get(), 4);
/// assert!(ClusterId::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(NonZeroUsize);

impl ClusterId {
    /// Creates a cluster identifier from a 1-based rank.
    #[must_use]
    pub const fn new(rank: usize) -> Option<Self> {
        match NonZeroUsize::new(rank) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Identifier of the cluster at 0-based position `position` in rank order.
    #[must_use]
    pub(crate) const fn from_position(position: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(position))
    }

    /// Returns the 1-based rank.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> usize { self.0.get() }
}

/// A local maximum lying inside the supra-threshold set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Primary statistic at the peak.
    pub value: f64,
    /// 1-based node identifier.
    pub node: NodeId,
    /// Cluster containing the peak.
    pub cluster: ClusterId,
}

/// A connected component of the supra-threshold subgraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Rank of the cluster by resels, largest first.
    pub id: ClusterId,
    /// Number of nodes in the cluster.
    pub vertex_count: usize,
    /// Resel measure of the cluster.
    pub resels: f64,
}

/// Output of a [`crate::PeakClus::run`] invocation.
///
/// # Examples
/// ```
/// use peakclus_core::PeakClusterReport;
///
/// let report = PeakClusterReport::empty(3);
/// assert!(report.peaks().is_empty());
/// assert!(report.clusters().is_empty());
/// assert_eq!(report.cluster_id_values(), vec![0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PeakClusterReport {
    peaks: Vec<Peak>,
    clusters: Vec<Cluster>,
    cluster_ids: Vec<Option<ClusterId>>,
}

impl PeakClusterReport {
    pub(crate) fn new(
        peaks: Vec<Peak>,
        clusters: Vec<Cluster>,
        cluster_ids: Vec<Option<ClusterId>>,
    ) -> Self {
        Self {
            peaks,
            clusters,
            cluster_ids,
        }
    }

    /// Report for a domain of `node_count` nodes with no supra-threshold node.
    #[must_use]
    pub fn empty(node_count: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), vec![None; node_count])
    }

    /// Peaks sorted by statistic value, largest first.
    #[must_use]
    #[rustfmt::skip]
    pub fn peaks(&self) -> &[Peak] { &self.peaks }

    /// Clusters sorted by rank.
    #[must_use]
    #[rustfmt::skip]
    pub fn clusters(&self) -> &[Cluster] { &self.clusters }

    /// Cluster of every node, `None` outside the supra-threshold set.
    #[must_use]
    #[rustfmt::skip]
    pub fn cluster_ids(&self) -> &[Option<ClusterId>] { &self.cluster_ids }

    /// Cluster map with `0` for nodes outside every cluster.
    #[must_use]
    pub fn cluster_id_values(&self) -> Vec<u64> {
        self.cluster_ids
            .iter()
            .map(|id| id.map_or(0, |cluster| cluster.get() as u64))
            .collect()
    }

    /// Looks up a cluster by identifier.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.get() - 1).filter(|cluster| cluster.id == id)
    }

    /// Peaks belonging to cluster `id`, in peak-table order.
    pub fn peaks_in(&self, id: ClusterId) -> impl Iterator<Item = &Peak> {
        self.peaks.iter().filter(move |peak| peak.cluster == id)
    }

    /// Sum of resels over every cluster.
    #[must_use]
    pub fn total_resels(&self) -> f64 {
        self.clusters.iter().map(|cluster| cluster.resels).sum()
    }

    /// Returns whether no node reached the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

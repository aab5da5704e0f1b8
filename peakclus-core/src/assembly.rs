//! Ranking of components and assembly of the peak and cluster tables.

use tracing::debug;

use crate::{
    Result,
    adjacency::NodeId,
    components::{Components, ExcursionSet},
    membership::first_match_indices,
    remap::NearestNeighbourRemap,
    result::{Cluster, ClusterId, Peak, PeakClusterReport},
};

/// Ranks components by resels, largest first.
///
/// Returns, for each position in `resels`, its cluster identifier. Ties keep
/// the ascending order of the positions, so the lowest component id among
/// equal-resel clusters gets the smallest rank. SurfStat's `SurfStatPeakClus`
/// breaks such ties the other way (the highest component id ranks first), so
/// tied ranks differ when comparing against its output.
///
/// # Examples
/// ```
/// use peakclus_core::rank_by_resels;
///
/// let ranks: Vec<usize> = rank_by_resels(&[2.0, 5.0, 2.0])
///     .into_iter()
///     .map(|id| id.get())
///     .collect();
/// assert_eq!(ranks, vec![2, 1, 3]);
/// ```
#[must_use]
pub fn rank_by_resels(resels: &[f64]) -> Vec<ClusterId> {
    let mut order: Vec<usize> = (0..resels.len()).collect();
    order.sort_by(|&left, &right| resels[right].total_cmp(&resels[left]));
    let mut ranks = vec![ClusterId::from_position(0); resels.len()];
    for (position, &slot) in order.iter().enumerate() {
        ranks[slot] = ClusterId::from_position(position);
    }
    ranks
}

/// Everything computed upstream of assembly.
pub(crate) struct AssemblyInputs<'a> {
    pub(crate) primary: &'a [f64],
    pub(crate) maxima: &'a [NodeId],
    pub(crate) set: &'a ExcursionSet,
    pub(crate) components: &'a Components,
    pub(crate) resels: &'a [f64],
}

pub(crate) fn assemble(inputs: &AssemblyInputs<'_>) -> Result<PeakClusterReport> {
    let AssemblyInputs {
        primary,
        maxima,
        set,
        components,
        resels,
    } = *inputs;
    let ranks = rank_by_resels(resels);

    // Component ids are shifted to 1-based so the sentinel key 0 stays free.
    let keys: Vec<usize> = components.ids().iter().map(|&root| root + 1).collect();
    let rank_values: Vec<Option<ClusterId>> = ranks.iter().copied().map(Some).collect();
    let remap = NearestNeighbourRemap::with_sentinel(keys, rank_values, None)?;

    let mut cluster_ids = vec![None; primary.len()];
    for (member, &root) in set.members().iter().zip(components.roots()) {
        cluster_ids[member.index()] = remap.lookup(root + 1);
    }

    let mut peaks: Vec<Peak> = first_match_indices(maxima, set.members())
        .into_iter()
        .zip(maxima)
        .filter_map(|(found, &node)| {
            found?;
            let cluster = cluster_ids[node.index()]?;
            Some(Peak {
                value: primary[node.index()],
                node,
                cluster,
            })
        })
        .collect();
    peaks.sort_by(|left, right| right.value.total_cmp(&left.value));

    let mut clusters: Vec<Cluster> = ranks
        .iter()
        .zip(components.sizes())
        .zip(resels)
        .map(|((&id, &vertex_count), &resels)| Cluster {
            id,
            vertex_count,
            resels,
        })
        .collect();
    clusters.sort_by_key(|cluster| cluster.id);

    debug!(
        peaks = peaks.len(),
        clusters = clusters.len(),
        "assembled peak and cluster tables"
    );
    Ok(PeakClusterReport::new(peaks, clusters, cluster_ids))
}

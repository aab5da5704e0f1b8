//! Connected-component labelling of the supra-threshold subgraph.
//!
//! Supra-threshold nodes are compacted into a dense index space by a running
//! count over the node ordering, edges with an endpoint outside the set are
//! discarded, and the remaining edges are merged with a parent-pointer
//! forest. The distinct roots of the compressed forest are the component
//! identifiers: ascending, but not contiguous.

mod union_find;

use tracing::debug;

use crate::adjacency::{EdgeList, NodeId};

use self::union_find::ParentForest;

/// Nodes whose primary statistic reaches the threshold inside the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcursionSet {
    members: Vec<NodeId>,
    dense: Vec<Option<usize>>,
}

impl ExcursionSet {
    /// Selects nodes with `values[i] >= threshold` and `mask[i]`.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::ExcursionSet;
    ///
    /// let set = ExcursionSet::from_threshold(&[1.0, 3.0, 2.0, 5.0], &[true, true, false, true], 2.0);
    /// let ids: Vec<usize> = set.members().iter().map(|id| id.get()).collect();
    /// assert_eq!(ids, vec![2, 4]);
    /// assert_eq!(set.dense_index(3), Some(1));
    /// ```
    #[must_use]
    pub fn from_threshold(values: &[f64], mask: &[bool], threshold: f64) -> Self {
        let mut members = Vec::new();
        let dense = values
            .iter()
            .zip(mask)
            .enumerate()
            .map(|(index, (&value, &inside))| {
                (inside && value >= threshold).then(|| {
                    members.push(NodeId::from_index(index));
                    members.len() - 1
                })
            })
            .collect();
        Self { members, dense }
    }

    /// Supra-threshold nodes in ascending order; position is the dense index.
    #[must_use]
    #[rustfmt::skip]
    pub fn members(&self) -> &[NodeId] { &self.members }

    /// Number of supra-threshold nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether no node reached the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Dense index of the node at 0-based slot `node`, when it is a member.
    #[must_use]
    pub fn dense_index(&self, node: usize) -> Option<usize> {
        self.dense.get(node).copied().flatten()
    }

    /// Returns whether `node` belongs to the set.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.dense_index(node.index()).is_some()
    }
}

/// Result of labelling an [`ExcursionSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Components {
    roots: Vec<usize>,
    ids: Vec<usize>,
    sizes: Vec<usize>,
}

impl Components {
    /// Per dense index, the root of its component.
    #[must_use]
    #[rustfmt::skip]
    pub fn roots(&self) -> &[usize] { &self.roots }

    /// Distinct component roots in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn ids(&self) -> &[usize] { &self.ids }

    /// Vertex count per component, parallel to [`Self::ids`].
    #[must_use]
    #[rustfmt::skip]
    pub fn sizes(&self) -> &[usize] { &self.sizes }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether there are no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of the component rooted at `root` within [`Self::ids`].
    #[must_use]
    pub fn slot_of(&self, root: usize) -> Option<usize> {
        self.ids.binary_search(&root).ok()
    }

    /// Position within [`Self::ids`] of the component holding dense index
    /// `dense`.
    #[must_use]
    pub fn slot_of_dense(&self, dense: usize) -> Option<usize> {
        self.roots.get(dense).and_then(|&root| self.slot_of(root))
    }
}

/// Labels the connected components of `set` under `edges`.
///
/// Two members share a component iff a path joins them along edges whose
/// endpoints are both members. Members without qualifying edges form
/// singleton components. Edge endpoints must lie within the node range of the
/// set.
///
/// # Examples
/// ```
/// use peakclus_core::{EdgeList, ExcursionSet, label_components};
///
/// let edges = EdgeList::from_raw_pairs(&[(1, 2), (2, 3), (3, 4), (4, 5)])?;
/// let set = ExcursionSet::from_threshold(&[3.0, 3.0, 0.0, 3.0, 3.0], &[true; 5], 1.0);
/// let components = label_components(&set, &edges);
/// assert_eq!(components.len(), 2);
/// assert_eq!(components.sizes(), &[2, 2]);
/// # Ok::<(), peakclus_core::AdjacencyError>(())
/// ```
#[must_use]
pub fn label_components(set: &ExcursionSet, edges: &EdgeList) -> Components {
    let mut forest = ParentForest::new(set.len());
    let mut merges = 0_usize;
    for edge in edges {
        let (Some(left), Some(right)) = (
            set.dense_index(edge.left().index()),
            set.dense_index(edge.right().index()),
        ) else {
            continue;
        };
        if forest.union(left, right) {
            merges += 1;
        }
    }
    forest.compress();
    let roots = forest.into_parents();

    let mut ids = roots.clone();
    ids.sort_unstable();
    ids.dedup();

    let mut sizes = vec![0_usize; ids.len()];
    for root in &roots {
        if let Ok(slot) = ids.binary_search(root) {
            sizes[slot] += 1;
        }
    }

    debug!(
        members = set.len(),
        merges,
        components = ids.len(),
        "labelled supra-threshold components"
    );
    Components { roots, ids, sizes }
}

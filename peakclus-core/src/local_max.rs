//! Local-maximum detection under edge-wise comparison.
//!
//! A node is a local maximum unless some edge joins it to a strictly greater
//! neighbour. Equal values disqualify neither endpoint, so plateaus yield
//! several adjacent maxima.

use crate::adjacency::{EdgeList, NodeId};

/// Replaces masked-out values with the global minimum of `values`.
///
/// The substituted nodes can still be compared against as neighbours, but can
/// never dominate a node inside the mask. NaN entries are ignored when taking
/// the minimum.
///
/// # Examples
/// ```
/// use peakclus_core::apply_mask;
///
/// let masked = apply_mask(&[3.0, 9.0, 1.0], &[true, false, true]);
/// assert_eq!(masked, vec![3.0, 1.0, 1.0]);
/// ```
#[must_use]
pub fn apply_mask(values: &[f64], mask: &[bool]) -> Vec<f64> {
    let floor = values.iter().copied().fold(f64::INFINITY, f64::min);
    values
        .iter()
        .zip(mask)
        .map(|(&value, &inside)| if inside { value } else { floor })
        .collect()
}

/// Returns the ascending identifiers of nodes not dominated by any neighbour.
///
/// Edges must reference nodes within `values`; the caller validates this.
///
/// # Examples
/// ```
/// use peakclus_core::{EdgeList, local_maxima};
///
/// let edges = EdgeList::from_raw_pairs(&[(1, 2), (2, 3), (3, 4)])?;
/// let maxima = local_maxima(&[1.0, 5.0, 5.0, 2.0], &edges);
/// let ids: Vec<usize> = maxima.iter().map(|id| id.get()).collect();
/// assert_eq!(ids, vec![2, 3]);
/// # Ok::<(), peakclus_core::AdjacencyError>(())
/// ```
#[must_use]
pub fn local_maxima(values: &[f64], edges: &EdgeList) -> Vec<NodeId> {
    let mut candidate = vec![true; values.len()];
    for edge in edges {
        let left = edge.left().index();
        let right = edge.right().index();
        let left_value = values[left];
        let right_value = values[right];
        if left_value < right_value {
            candidate[left] = false;
        }
        if right_value < left_value {
            candidate[right] = false;
        }
    }
    candidate
        .iter()
        .enumerate()
        .filter_map(|(index, &is_max)| is_max.then_some(NodeId::from_index(index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(maxima: &[NodeId]) -> Vec<usize> {
        maxima.iter().map(|id| id.get()).collect()
    }

    fn chain(len: usize) -> EdgeList {
        let pairs: Vec<_> = (1..len).map(|i| (i, i + 1)).collect();
        EdgeList::from_raw_pairs(&pairs).expect("chain ids are 1-based")
    }

    #[rstest]
    #[case::plateau(vec![1.0, 5.0, 2.0, 5.0, 1.0], vec![2, 4])]
    #[case::adjacent_plateau(vec![1.0, 4.0, 4.0, 1.0], vec![2, 3])]
    #[case::flat(vec![2.0, 2.0, 2.0], vec![1, 2, 3])]
    #[case::monotone(vec![1.0, 2.0, 3.0], vec![3])]
    fn detects_maxima_on_a_chain(#[case] values: Vec<f64>, #[case] expected: Vec<usize>) {
        let edges = chain(values.len());
        assert_eq!(ids(&local_maxima(&values, &edges)), expected);
    }

    #[test]
    fn isolated_nodes_are_maxima() {
        let edges = EdgeList::from_raw_pairs(&[(1, 2)]).expect("valid pairs");
        assert_eq!(ids(&local_maxima(&[0.0, 1.0, -3.0], &edges)), vec![2, 3]);
    }

    #[test]
    fn masked_nodes_never_dominate() {
        let values = apply_mask(&[1.0, 9.0, 2.0], &[true, false, true]);
        let edges = chain(3);
        let maxima = ids(&local_maxima(&values, &edges));
        assert_eq!(maxima, vec![1, 3]);
    }

    #[test]
    fn apply_mask_ignores_nan_when_taking_the_floor() {
        let masked = apply_mask(&[f64::NAN, 4.0, 2.0], &[true, false, true]);
        assert_eq!(masked[1], 2.0);
    }
}

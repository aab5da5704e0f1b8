//! Small mesh generators and a brute-force labelling oracle.
//!
//! Node identifiers in generated pairs are 1-based, matching the edge lists
//! consumed by `peakclus-core`.

use std::collections::VecDeque;

/// Edges of a path `1 - 2 - ... - len`.
///
/// # Examples
/// ```
/// use peakclus_test_support::graphs::path_pairs;
///
/// assert_eq!(path_pairs(3), vec![(1, 2), (2, 3)]);
/// assert!(path_pairs(1).is_empty());
/// ```
#[must_use]
pub fn path_pairs(len: usize) -> Vec<(usize, usize)> {
    (1..len).map(|node| (node, node + 1)).collect()
}

/// Edges of a `rows × cols` 4-connected grid in row-major order.
///
/// # Examples
/// ```
/// use peakclus_test_support::graphs::grid_pairs;
///
/// // 2×2 grid: two horizontal and two vertical edges.
/// assert_eq!(grid_pairs(2, 2), vec![(1, 2), (1, 3), (2, 4), (3, 4)]);
/// ```
#[must_use]
pub fn grid_pairs(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let id = |row: usize, col: usize| row * cols + col + 1;
    let mut pairs = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                pairs.push((id(row, col), id(row, col + 1)));
            }
            if row + 1 < rows {
                pairs.push((id(row, col), id(row + 1, col)));
            }
        }
    }
    pairs
}

/// Labels the connected components of the subgraph induced by `included`.
///
/// Each included node is labelled with the smallest 0-based index in its
/// component; excluded nodes are `None`. Pairs touching a node outside
/// `included` are ignored.
///
/// # Examples
/// ```
/// use peakclus_test_support::graphs::{bfs_labels, path_pairs};
///
/// let labels = bfs_labels(&[true, true, false, true], &path_pairs(4));
/// assert_eq!(labels, vec![Some(0), Some(0), None, Some(3)]);
/// ```
#[must_use]
pub fn bfs_labels(included: &[bool], pairs: &[(usize, usize)]) -> Vec<Option<usize>> {
    let len = included.len();
    let mut neighbours = vec![Vec::new(); len];
    for &(left, right) in pairs {
        let (left, right) = (left - 1, right - 1);
        if included[left] && included[right] {
            neighbours[left].push(right);
            neighbours[right].push(left);
        }
    }

    let mut labels = vec![None; len];
    for start in (0..len).filter(|&node| included[node]) {
        if labels[start].is_some() {
            continue;
        }
        labels[start] = Some(start);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for &next in &neighbours[node] {
                if labels[next].is_none() {
                    labels[next] = Some(start);
                    queue.push_back(next);
                }
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 0)]
    #[case(1, 4, 3)]
    #[case(3, 3, 12)]
    #[case(4, 5, 31)]
    fn grid_has_expected_edge_count(#[case] rows: usize, #[case] cols: usize, #[case] edges: usize) {
        assert_eq!(grid_pairs(rows, cols).len(), edges);
    }

    #[test]
    fn bfs_labels_split_grid_along_excluded_column() {
        // 2×3 grid with the middle column excluded.
        let included = [true, false, true, true, false, true];
        let labels = bfs_labels(&included, &grid_pairs(2, 3));
        assert_eq!(labels, vec![Some(0), None, Some(2), Some(0), None, Some(2)]);
    }
}

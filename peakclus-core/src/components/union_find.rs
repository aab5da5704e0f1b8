//! Union-find (disjoint set union) over the dense supra-threshold index space.
//!
//! Unions attach the root of the first endpoint beneath the root of the
//! second, without rank balancing; [`ParentForest::compress`] then flattens
//! every chain by path halving so each slot points directly at its root.

#[derive(Clone, Debug)]
pub(super) struct ParentForest {
    parent: Vec<usize>,
}

impl ParentForest {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub(super) fn root(&self, mut node: usize) -> usize {
        while self.parent[node] != node {
            node = self.parent[node];
        }
        node
    }

    /// Joins the trees holding `left` and `right`. Returns `false` when they
    /// already share a root.
    pub(super) fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.root(left);
        let right_root = self.root(right);
        if left_root == right_root {
            return false;
        }
        self.parent[left_root] = right_root;
        true
    }

    pub(super) fn compress(&mut self) {
        for node in 0..self.parent.len() {
            while self.parent[node] != self.parent[self.parent[node]] {
                self.parent[node] = self.parent[self.parent[node]];
            }
        }
    }

    /// Parent slots; after [`Self::compress`] every entry is a root.
    pub(super) fn into_parents(self) -> Vec<usize> {
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_attaches_left_root_under_right_root() {
        let mut forest = ParentForest::new(3);
        assert!(forest.union(0, 1));
        assert_eq!(forest.root(0), 1);
        assert!(forest.union(1, 2));
        assert_eq!(forest.root(0), 2);
        assert!(!forest.union(0, 2));
    }

    #[test]
    fn compress_points_every_slot_at_its_root() {
        let mut forest = ParentForest::new(5);
        forest.union(0, 1);
        forest.union(1, 2);
        forest.union(2, 3);
        forest.compress();
        assert_eq!(forest.into_parents(), vec![3, 3, 3, 3, 4]);
    }
}

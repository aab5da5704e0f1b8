//! Node identifiers, edge lists and the adjacency provider abstraction.
//!
//! Node identifiers are 1-based to match the tables reported to callers;
//! [`NodeId::index`] converts to the 0-based slot used for array access.

use std::num::NonZeroUsize;

use crate::error::AdjacencyError;

/// 1-based identifier of a node (vertex or voxel).
///
/// # Examples
/// ```
/// use peakclus_core::NodeId;
///
/// let id = NodeId::from_index(0);
/// assert_eq!(id.get(), 1);
/// assert_eq!(id.index(), 0);
/// assert!(NodeId::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    /// Wraps a raw 1-based identifier, returning `None` for zero.
    #[must_use]
    pub const fn new(raw: usize) -> Option<Self> {
        match NonZeroUsize::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Builds the identifier of the node stored at 0-based `index`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    /// Returns the raw 1-based identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> usize { self.0.get() }

    /// Returns the 0-based array slot of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.get() - 1
    }
}

/// An undirected adjacency between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    left: NodeId,
    right: NodeId,
}

impl Edge {
    /// Creates an edge between two nodes.
    #[must_use]
    pub const fn new(left: NodeId, right: NodeId) -> Self {
        Self { left, right }
    }

    /// Creates an edge from raw 1-based identifiers.
    ///
    /// # Errors
    /// Returns [`AdjacencyError::InvalidNodeId`] when either identifier is 0.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::{AdjacencyError, Edge};
    ///
    /// let edge = Edge::from_raw(1, 2)?;
    /// assert_eq!(edge.left().get(), 1);
    /// assert!(matches!(Edge::from_raw(0, 2), Err(AdjacencyError::InvalidNodeId { raw: 0 })));
    /// # Ok::<(), AdjacencyError>(())
    /// ```
    pub fn from_raw(left: usize, right: usize) -> Result<Self, AdjacencyError> {
        let left_id = NodeId::new(left).ok_or(AdjacencyError::InvalidNodeId { raw: left })?;
        let right_id = NodeId::new(right).ok_or(AdjacencyError::InvalidNodeId { raw: right })?;
        Ok(Self::new(left_id, right_id))
    }

    /// Returns the first endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn left(&self) -> NodeId { self.left }

    /// Returns the second endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn right(&self) -> NodeId { self.right }
}

/// An ordered list of edges, each undirected adjacency appearing once.
///
/// # Examples
/// ```
/// use peakclus_core::EdgeList;
///
/// let edges = EdgeList::from_raw_pairs(&[(1, 2), (2, 3)])?;
/// assert_eq!(edges.len(), 2);
/// assert_eq!(edges.max_node().map(|id| id.get()), Some(3));
/// # Ok::<(), peakclus_core::AdjacencyError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Wraps pre-built edges.
    #[must_use]
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Builds an edge list from raw 1-based pairs.
    ///
    /// # Errors
    /// Returns [`AdjacencyError::InvalidNodeId`] when any identifier is 0.
    pub fn from_raw_pairs(pairs: &[(usize, usize)]) -> Result<Self, AdjacencyError> {
        pairs
            .iter()
            .map(|&(left, right)| Edge::from_raw(left, right))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the list holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over the edges in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns the edges as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the largest node identifier referenced by any edge.
    #[must_use]
    pub fn max_node(&self) -> Option<NodeId> {
        self.edges
            .iter()
            .map(|edge| edge.left().max(edge.right()))
            .max()
    }
}

impl FromIterator<Edge> for EdgeList {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Derives the adjacency graph of a domain (triangle mesh, voxel lattice, ...).
///
/// Implementations return each undirected adjacency once, with no
/// self-edges. The core validates that every endpoint lies within
/// `1..=node_count` before using the list.
///
/// # Examples
/// ```
/// use peakclus_core::{AdjacencyError, AdjacencyProvider, EdgeList};
///
/// struct Chain;
///
/// impl AdjacencyProvider for Chain {
///     fn name(&self) -> &str { "chain" }
///     fn edges(&self, node_count: usize) -> Result<EdgeList, AdjacencyError> {
///         let pairs: Vec<_> = (1..node_count).map(|i| (i, i + 1)).collect();
///         EdgeList::from_raw_pairs(&pairs)
///     }
/// }
///
/// let edges = Chain.edges(4)?;
/// assert_eq!(edges.len(), 3);
/// # Ok::<(), AdjacencyError>(())
/// ```
pub trait AdjacencyProvider {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Produces the edge list for a domain of `node_count` nodes.
    fn edges(&self, node_count: usize) -> Result<EdgeList, AdjacencyError>;
}

/// A precomputed edge list is its own provider.
impl AdjacencyProvider for EdgeList {
    fn name(&self) -> &str {
        "edge_list"
    }

    fn edges(&self, _node_count: usize) -> Result<EdgeList, AdjacencyError> {
        Ok(self.clone())
    }
}

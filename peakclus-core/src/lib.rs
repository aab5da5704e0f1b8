//! Peak and cluster extraction for statistic maps on surface meshes.
//!
//! A [`PeakClus`] takes a [`StatisticModel`], a node mask and an
//! [`AdjacencyProvider`], then reports local maxima above a threshold, the
//! connected supra-threshold clusters ranked by resels and the cluster of
//! every node.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod assembly;
mod builder;
mod components;
mod error;
mod local_max;
mod membership;
mod model;
mod peak_clus;
mod remap;
pub mod resels;
mod result;

pub use crate::{
    adjacency::{AdjacencyProvider, Edge, EdgeList, NodeId},
    assembly::rank_by_resels,
    builder::{ExecutionStrategy, PeakClusBuilder},
    components::{Components, ExcursionSet, label_components},
    error::{AdjacencyError, AdjacencyErrorCode, PeakClusError, PeakClusErrorCode, Result},
    local_max::{apply_mask, local_maxima},
    membership::{first_match_indices, membership_mask},
    model::{DegreesOfFreedom, StatisticMap, StatisticModel, VariateCount},
    peak_clus::PeakClus,
    remap::{NearestNeighbourRemap, RemapError},
    resels::ReselStrategy,
    result::{Cluster, ClusterId, Peak, PeakClusterReport},
};

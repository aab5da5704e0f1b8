//! Property tests checking extraction against brute-force oracles.

use std::collections::HashMap;

use peakclus_core::{
    EdgeList, ExecutionStrategy, PeakClusBuilder, PeakClusterReport, StatisticMap, StatisticModel,
};
use peakclus_test_support::{
    ci::property_test_profile::suite_config,
    graphs::{bfs_labels, grid_pairs, path_pairs},
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use test_strategy::Arbitrary;

/// Mesh family the synthetic field is laid on.
#[derive(Clone, Copy, Debug, Arbitrary)]
enum Topology {
    #[weight(2)]
    Path,
    #[weight(3)]
    Grid,
    /// Grid with a random half of its edges removed.
    #[weight(1)]
    Sparse,
}

#[derive(Clone, Debug)]
struct Field {
    values: Vec<f64>,
    mask: Vec<bool>,
    weights: Vec<f64>,
    pairs: Vec<(usize, usize)>,
    threshold: f64,
}

impl Field {
    fn generate(topology: Topology, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let rows = rng.gen_range(1..6);
        let cols = rng.gen_range(1..8);
        let nodes = rows * cols;
        let pairs = match topology {
            Topology::Path => path_pairs(nodes),
            Topology::Grid => grid_pairs(rows, cols),
            Topology::Sparse => grid_pairs(rows, cols)
                .into_iter()
                .filter(|_| rng.gen_bool(0.5))
                .collect(),
        };
        // Quantised values make ties and plateaus common.
        let values = (0..nodes)
            .map(|_| f64::from(rng.gen_range(0_u8..8)) * 0.5)
            .collect();
        let mask = (0..nodes).map(|_| rng.gen_bool(0.85)).collect();
        let weights = (0..nodes).map(|_| rng.gen_range(0.1..2.0)).collect();
        let threshold = f64::from(rng.gen_range(0_u8..8)) * 0.5;
        Self {
            values,
            mask,
            weights,
            pairs,
            threshold,
        }
    }

    fn run(&self) -> PeakClusterReport {
        let model =
            StatisticModel::new(StatisticMap::from_primary(self.values.clone()).expect("non-empty"));
        let edges = EdgeList::from_raw_pairs(&self.pairs).expect("1-based pairs");
        PeakClusBuilder::new()
            .with_threshold(self.threshold)
            .with_execution_strategy(ExecutionStrategy::Sequential)
            .build()
            .expect("finite threshold")
            .run_weighted(&model, &self.mask, &edges, &self.weights)
            .expect("valid inputs")
    }

    fn included(&self) -> Vec<bool> {
        self.values
            .iter()
            .zip(&self.mask)
            .map(|(&value, &inside)| inside && value >= self.threshold)
            .collect()
    }
}

fn field_strategy() -> impl Strategy<Value = Field> {
    (any::<Topology>(), any::<u64>()).prop_map(|(topology, seed)| Field::generate(topology, seed))
}

/// Checks that two labelings induce the same partition of the labelled nodes.
fn same_partition<A, B>(left: &[Option<A>], right: &[Option<B>]) -> Result<(), TestCaseError>
where
    A: Copy + Eq + std::hash::Hash + std::fmt::Debug,
    B: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    prop_assert_eq!(left.len(), right.len());
    let mut forward = HashMap::new();
    let mut backward = HashMap::new();
    for (&l, &r) in left.iter().zip(right) {
        match (l, r) {
            (None, None) => {}
            (Some(l), Some(r)) => {
                prop_assert_eq!(*forward.entry(l).or_insert(r), r);
                prop_assert_eq!(*backward.entry(r).or_insert(l), l);
            }
            _ => prop_assert!(false, "labelled sets differ: {l:?} vs {r:?}"),
        }
    }
    Ok(())
}

fn check_connectivity(field: &Field) -> Result<(), TestCaseError> {
    let report = field.run();
    let oracle = bfs_labels(&field.included(), &field.pairs);
    same_partition(report.cluster_ids(), &oracle)
}

fn check_tables(field: &Field) -> Result<(), TestCaseError> {
    let report = field.run();
    let included = field.included();

    for pair in report.clusters().windows(2) {
        prop_assert!(pair[0].resels >= pair[1].resels);
        prop_assert!(pair[0].id < pair[1].id);
    }
    for (position, cluster) in report.clusters().iter().enumerate() {
        prop_assert_eq!(cluster.id.get(), position + 1);
        let members: Vec<usize> = (0..field.values.len())
            .filter(|&node| report.cluster_ids()[node] == Some(cluster.id))
            .collect();
        prop_assert_eq!(members.len(), cluster.vertex_count);
        let weight: f64 = members.iter().map(|&node| field.weights[node]).sum();
        prop_assert!((weight - cluster.resels).abs() < 1e-9);
    }
    for pair in report.peaks().windows(2) {
        prop_assert!(pair[0].value >= pair[1].value);
        if pair[0].value == pair[1].value {
            prop_assert!(pair[0].node < pair[1].node);
        }
    }
    for peak in report.peaks() {
        prop_assert!(included[peak.node.index()]);
        prop_assert_eq!(report.cluster_ids()[peak.node.index()], Some(peak.cluster));
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_config(128))]

    #[test]
    fn clusters_match_breadth_first_components(field in field_strategy()) {
        check_connectivity(&field)?;
    }

    #[test]
    fn tables_are_ranked_and_consistent(field in field_strategy()) {
        check_tables(&field)?;
    }
}

#[rstest::rstest]
#[case::path(Topology::Path, 7)]
#[case::grid(Topology::Grid, 42)]
#[case::grid_wide(Topology::Grid, 999)]
#[case::sparse(Topology::Sparse, 2024)]
fn seeded_fields_hold_every_property(#[case] topology: Topology, #[case] seed: u64) {
    let field = Field::generate(topology, seed);
    check_connectivity(&field).expect("partition must match the oracle");
    check_tables(&field).expect("tables must be consistent");
}

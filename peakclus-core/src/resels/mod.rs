//! Resel (resolution element) measures per connected component.
//!
//! The formula is selected once per call from the variate count and the number
//! of statistic rows ([`ReselStrategy::select`]). Each supra-threshold node
//! contributes `factor × weight`, where `weight` is its resels-per-vertex value
//! (default 1) and `factor` comes from the selected strategy. Contributions
//! are evaluated independently per node, optionally on the Rayon pool, and then
//! summed per component in node order so the result does not depend on the
//! schedule.

mod formulas;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

pub use self::formulas::{
    SPHERE_SAMPLES, bivariate_multi_row, bivariate_single_row, trivariate_multi_row,
    trivariate_single_row,
};

use crate::{
    components::{Components, ExcursionSet},
    model::{StatisticMap, StatisticModel, VariateCount},
};

/// Resel formula applied to every supra-threshold node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReselStrategy {
    /// `k = 1`: plain weighted vertex count.
    Count,
    /// `k = 2` with a single statistic row.
    BivariateSingleRow {
        /// Number of degrees-of-freedom entries.
        df_len: usize,
    },
    /// `k = 2` with at least two statistic rows; uses row 1.
    BivariateMultiRow,
    /// `k = 3` with a single statistic row.
    TrivariateSingleRow {
        /// Number of degrees-of-freedom entries.
        df_len: usize,
    },
    /// `k = 3` with at least two statistic rows; uses row 1 and, when present,
    /// row 2.
    TrivariateMultiRow,
}

impl ReselStrategy {
    /// Chooses the formula for `model`.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::{
    ///     DegreesOfFreedom, ReselStrategy, StatisticMap, StatisticModel, VariateCount,
    /// };
    ///
    /// let model = StatisticModel::new(StatisticMap::new(vec![vec![3.0], vec![1.0]])?)
    ///     .with_variate_count(VariateCount::Two);
    /// assert_eq!(ReselStrategy::select(&model), ReselStrategy::BivariateMultiRow);
    ///
    /// let scalar = StatisticModel::new(StatisticMap::from_primary(vec![3.0])?)
    ///     .with_variate_count(VariateCount::Three)
    ///     .with_degrees_of_freedom(DegreesOfFreedom::Pair(3.0, 20.0));
    /// assert_eq!(
    ///     ReselStrategy::select(&scalar),
    ///     ReselStrategy::TrivariateSingleRow { df_len: 2 }
    /// );
    /// # Ok::<(), peakclus_core::PeakClusError>(())
    /// ```
    #[must_use]
    pub fn select(model: &StatisticModel) -> Self {
        let single_row = model.statistic().row_count() == 1;
        let df_len = model.degrees_of_freedom().len();
        match (model.variate_count(), single_row) {
            (VariateCount::One, _) => Self::Count,
            (VariateCount::Two, true) => Self::BivariateSingleRow { df_len },
            (VariateCount::Two, false) => Self::BivariateMultiRow,
            (VariateCount::Three, true) => Self::TrivariateSingleRow { df_len },
            (VariateCount::Three, false) => Self::TrivariateMultiRow,
        }
    }

    /// Per-node factor for the node at 0-based slot `node`.
    #[must_use]
    pub fn factor(self, statistic: &StatisticMap, threshold: f64, node: usize) -> f64 {
        let value = |row: usize| statistic.row(row).and_then(|values| values.get(node)).copied();
        let t0 = value(0).unwrap_or(f64::NAN);
        match self {
            Self::Count => 1.0,
            Self::BivariateSingleRow { df_len } => bivariate_single_row(threshold, t0, df_len),
            Self::BivariateMultiRow => {
                bivariate_multi_row(threshold, t0, value(1).unwrap_or(f64::NAN))
            }
            Self::TrivariateSingleRow { df_len } => trivariate_single_row(threshold, t0, df_len),
            Self::TrivariateMultiRow => trivariate_multi_row(
                threshold,
                t0,
                value(1).unwrap_or(f64::NAN),
                value(2),
            ),
        }
    }
}

/// Inputs shared by every per-node resel evaluation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReselInputs<'a> {
    pub(crate) strategy: ReselStrategy,
    pub(crate) statistic: &'a StatisticMap,
    pub(crate) threshold: f64,
    pub(crate) weights: Option<&'a [f64]>,
}

impl ReselInputs<'_> {
    fn contribution(&self, node: usize) -> f64 {
        let weight = self
            .weights
            .and_then(|weights| weights.get(node))
            .copied()
            .unwrap_or(1.0);
        self.strategy.factor(self.statistic, self.threshold, node) * weight
    }
}

/// Per-node contributions, indexed by dense position in `set`.
#[cfg(feature = "parallel")]
pub(crate) fn node_contributions(
    inputs: &ReselInputs<'_>,
    set: &ExcursionSet,
    parallel: bool,
) -> Vec<f64> {
    if parallel {
        set.members()
            .par_iter()
            .map(|node| inputs.contribution(node.index()))
            .collect()
    } else {
        sequential_contributions(inputs, set)
    }
}

/// Per-node contributions, indexed by dense position in `set`.
#[cfg(not(feature = "parallel"))]
pub(crate) fn node_contributions(
    inputs: &ReselInputs<'_>,
    set: &ExcursionSet,
    _parallel: bool,
) -> Vec<f64> {
    sequential_contributions(inputs, set)
}

fn sequential_contributions(inputs: &ReselInputs<'_>, set: &ExcursionSet) -> Vec<f64> {
    set.members()
        .iter()
        .map(|node| inputs.contribution(node.index()))
        .collect()
}

/// Sums per-node contributions into one resel value per component, parallel to
/// [`Components::ids`].
pub(crate) fn component_resels(contributions: &[f64], components: &Components) -> Vec<f64> {
    let mut resels = vec![0.0_f64; components.len()];
    for (dense, &contribution) in contributions.iter().enumerate() {
        if let Some(slot) = components.slot_of_dense(dense) {
            resels[slot] += contribution;
        }
    }
    debug!(components = resels.len(), "accumulated component resels");
    resels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adjacency::EdgeList, components::label_components, model::DegreesOfFreedom};
    use rstest::rstest;

    fn chain(len: usize) -> EdgeList {
        let pairs: Vec<_> = (1..len).map(|i| (i, i + 1)).collect();
        EdgeList::from_raw_pairs(&pairs).expect("chain ids are 1-based")
    }

    fn model(rows: Vec<Vec<f64>>, k: VariateCount) -> StatisticModel {
        StatisticModel::new(StatisticMap::new(rows).expect("valid rows")).with_variate_count(k)
    }

    fn count_inputs<'a>(model: &'a StatisticModel, weights: &'a [f64]) -> ReselInputs<'a> {
        ReselInputs {
            strategy: ReselStrategy::select(model),
            statistic: model.statistic(),
            threshold: 1.0,
            weights: Some(weights),
        }
    }

    #[test]
    fn count_strategy_sums_weights() {
        let model = model(vec![vec![3.0, 3.0, 0.0, 3.0]], VariateCount::One);
        let set = ExcursionSet::from_threshold(model.statistic().primary(), &[true; 4], 1.0);
        let components = label_components(&set, &chain(4));
        let weights = [0.5, 1.5, 9.0, 2.0];
        let contributions = node_contributions(&count_inputs(&model, &weights), &set, false);
        assert_eq!(component_resels(&contributions, &components), vec![2.0, 2.0]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_contributions_match_sequential() {
        let values: Vec<f64> = (0..64).map(|i| f64::from(i % 7)).collect();
        let model = model(vec![values], VariateCount::One);
        let set = ExcursionSet::from_threshold(model.statistic().primary(), &[true; 64], 2.0);
        let weights: Vec<f64> = (0..64).map(|i| 0.25 * f64::from(i)).collect();
        let inputs = count_inputs(&model, &weights);
        assert_eq!(
            node_contributions(&inputs, &set, true),
            node_contributions(&inputs, &set, false)
        );
    }

    #[test]
    fn missing_weights_default_to_one() {
        let model = model(vec![vec![3.0, 3.0]], VariateCount::One);
        let set = ExcursionSet::from_threshold(model.statistic().primary(), &[true; 2], 1.0);
        let components = label_components(&set, &chain(2));
        let inputs = ReselInputs {
            strategy: ReselStrategy::Count,
            statistic: model.statistic(),
            threshold: 1.0,
            weights: None,
        };
        let contributions = node_contributions(&inputs, &set, false);
        assert_eq!(component_resels(&contributions, &components), vec![2.0]);
    }

    #[rstest]
    #[case(VariateCount::One, 1, ReselStrategy::Count)]
    #[case(VariateCount::Two, 1, ReselStrategy::BivariateSingleRow { df_len: 1 })]
    #[case(VariateCount::Two, 2, ReselStrategy::BivariateMultiRow)]
    #[case(VariateCount::Three, 1, ReselStrategy::TrivariateSingleRow { df_len: 1 })]
    #[case(VariateCount::Three, 3, ReselStrategy::TrivariateMultiRow)]
    fn select_branches_on_variates_and_rows(
        #[case] k: VariateCount,
        #[case] rows: usize,
        #[case] expected: ReselStrategy,
    ) {
        let model = model(vec![vec![1.0]; rows], k);
        assert_eq!(ReselStrategy::select(&model), expected);
    }

    #[test]
    fn bivariate_factor_is_zero_at_the_threshold() {
        let model = model(vec![vec![2.0, 5.0]], VariateCount::Two)
            .with_degrees_of_freedom(DegreesOfFreedom::Single(10.0));
        let strategy = ReselStrategy::select(&model);
        assert_eq!(strategy.factor(model.statistic(), 2.0, 0), 0.0);
        assert!(strategy.factor(model.statistic(), 2.0, 1) > 0.0);
    }
}

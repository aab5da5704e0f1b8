//! Synthetic statistic fields on square 4-connected lattices.
//!
//! A field is a sum of Gaussian bumps at random centres plus uniform noise,
//! which yields a realistic mix of blobs, plateaus and isolated peaks once
//! thresholded. Auxiliary rows for the multivariate corrections are scaled
//! copies of the primary row, so they stay below it.

use peakclus_core::{EdgeList, StatisticMap, StatisticModel, VariateCount};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Configuration for [`SyntheticField::generate`].
#[derive(Clone, Debug)]
pub struct SyntheticFieldConfig {
    /// Nodes per lattice side.
    pub side: usize,
    /// Number of Gaussian bumps.
    pub bumps: usize,
    /// Variate count; selects how many statistic rows are generated.
    pub variates: VariateCount,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A generated field with its mask and lattice adjacency.
#[derive(Clone, Debug)]
pub struct SyntheticField {
    /// Statistic model over `side²` nodes.
    pub model: StatisticModel,
    /// Analysis mask; a random tenth of the nodes lie outside.
    pub mask: Vec<bool>,
    /// 4-neighbour lattice edges.
    pub edges: EdgeList,
}

impl SyntheticField {
    /// Generates a field according to `config`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::ZeroValue`] when `side` is zero.
    ///
    /// # Examples
    /// ```
    /// use peakclus_benches::field::{SyntheticField, SyntheticFieldConfig};
    /// use peakclus_core::VariateCount;
    ///
    /// let field = SyntheticField::generate(&SyntheticFieldConfig {
    ///     side: 4,
    ///     bumps: 2,
    ///     variates: VariateCount::Two,
    ///     seed: 7,
    /// })?;
    /// assert_eq!(field.model.node_count(), 16);
    /// assert_eq!(field.model.statistic().row_count(), 2);
    /// assert_eq!(field.edges.len(), 24);
    /// # Ok::<(), peakclus_benches::error::BenchSetupError>(())
    /// ```
    pub fn generate(config: &SyntheticFieldConfig) -> Result<Self, BenchSetupError> {
        if config.side == 0 {
            return Err(BenchSetupError::ZeroValue {
                context: "lattice side",
            });
        }
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let primary = bump_field(config.side, config.bumps, &mut rng);
        let rows = auxiliary_rows(&primary, config.variates.get());
        let mask = (0..primary.len()).map(|_| rng.gen_bool(0.9)).collect();
        let model = StatisticModel::new(StatisticMap::new(rows)?)
            .with_variate_count(config.variates);
        Ok(Self {
            model,
            mask,
            edges: lattice_edges(config.side)?,
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "Synthetic field values are computed in floating point from lattice coordinates"
)]
fn bump_field(side: usize, bumps: usize, rng: &mut SmallRng) -> Vec<f64> {
    let extent = side as f64;
    let centres: Vec<(f64, f64, f64)> = (0..bumps)
        .map(|_| {
            (
                rng.gen_range(0.0..extent),
                rng.gen_range(0.0..extent),
                rng.gen_range(1.0..6.0),
            )
        })
        .collect();
    let width = (extent / 8.0).max(1.0);
    (0..side * side)
        .map(|node| {
            let (row, col) = ((node / side) as f64, (node % side) as f64);
            let signal: f64 = centres
                .iter()
                .map(|&(cy, cx, height)| {
                    let distance = (row - cy).powi(2) + (col - cx).powi(2);
                    height * (-distance / (2.0 * width * width)).exp()
                })
                .sum();
            signal + rng.gen_range(-0.5..0.5)
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "Auxiliary rows scale the primary statistic"
)]
fn auxiliary_rows(primary: &[f64], variates: usize) -> Vec<Vec<f64>> {
    let mut rows = vec![primary.to_vec()];
    for scale in [0.5, 0.25].into_iter().take(variates.saturating_sub(1)) {
        rows.push(primary.iter().map(|value| value * scale).collect());
    }
    rows
}

fn lattice_edges(side: usize) -> Result<EdgeList, BenchSetupError> {
    let id = |row: usize, col: usize| row * side + col + 1;
    let mut pairs = Vec::with_capacity(2 * side * side);
    for row in 0..side {
        for col in 0..side {
            if col + 1 < side {
                pairs.push((id(row, col), id(row, col + 1)));
            }
            if row + 1 < side {
                pairs.push((id(row, col), id(row + 1, col)));
            }
        }
    }
    Ok(EdgeList::from_raw_pairs(&pairs)?)
}

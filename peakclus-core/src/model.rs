//! Statistic model inputs: the per-node statistic rows, degrees of freedom and
//! variate count.

use crate::{Result, error::PeakClusError};

/// Number of statistical variates behind the statistic map.
///
/// Only one, two and three variates have a resel formula; other counts are
/// rejected by [`VariateCount::try_from`].
///
/// # Examples
/// ```
/// use peakclus_core::{PeakClusError, VariateCount};
///
/// assert_eq!(VariateCount::try_from(2_usize)?, VariateCount::Two);
/// assert!(matches!(
///     VariateCount::try_from(4_usize),
///     Err(PeakClusError::UnsupportedVariateCount { k: 4 })
/// ));
/// # Ok::<(), PeakClusError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariateCount {
    /// Univariate statistic (t or F).
    #[default]
    One,
    /// Bivariate Hotelling-type statistic.
    Two,
    /// Trivariate Hotelling-type statistic.
    Three,
}

impl VariateCount {
    /// Returns the numeric variate count.
    #[must_use]
    pub const fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<usize> for VariateCount {
    type Error = PeakClusError;

    fn try_from(k: usize) -> Result<Self> {
        match k {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(PeakClusError::UnsupportedVariateCount { k }),
        }
    }
}

/// Degrees of freedom of the statistic.
///
/// Only the number of entries matters downstream: a single value marks a
/// Hotelling T statistic and a pair marks T². The values are kept for callers
/// that forward them to p-value computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegreesOfFreedom {
    /// A scalar degrees-of-freedom value.
    Single(f64),
    /// A pair of degrees-of-freedom values.
    Pair(f64, f64),
}

#[expect(
    clippy::len_without_is_empty,
    reason = "Degrees of freedom always carry one or two entries"
)]
impl DegreesOfFreedom {
    /// Builds degrees of freedom from a slice of one or two entries.
    ///
    /// # Errors
    /// Returns [`PeakClusError::InvalidDegreesOfFreedom`] for any other length.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::DegreesOfFreedom;
    ///
    /// let df = DegreesOfFreedom::from_slice(&[10.0, 20.0])?;
    /// assert_eq!(df.len(), 2);
    /// assert!(DegreesOfFreedom::from_slice(&[]).is_err());
    /// # Ok::<(), peakclus_core::PeakClusError>(())
    /// ```
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [single] => Ok(Self::Single(*single)),
            [first, second] => Ok(Self::Pair(*first, *second)),
            _ => Err(PeakClusError::InvalidDegreesOfFreedom { len: values.len() }),
        }
    }

    /// Number of entries (1 or 2).
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
        }
    }
}

impl Default for DegreesOfFreedom {
    fn default() -> Self {
        Self::Single(1.0)
    }
}

/// Rows of per-node statistics, shape `(rows, nodes)`.
///
/// Row 0 is the primary statistic used for thresholding and clustering. The
/// remaining rows feed the multivariate resel correction only.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticMap {
    rows: Vec<Vec<f64>>,
    node_count: usize,
}

impl StatisticMap {
    /// Validates and wraps the supplied rows.
    ///
    /// # Errors
    /// Returns [`PeakClusError::EmptyStatistic`] when there are no rows or row
    /// 0 is empty, and [`PeakClusError::RaggedStatistic`] when a later row has
    /// a different length.
    ///
    /// # Examples
    /// ```
    /// use peakclus_core::StatisticMap;
    ///
    /// let map = StatisticMap::new(vec![vec![1.0, 2.0, 3.0]])?;
    /// assert_eq!(map.node_count(), 3);
    /// assert_eq!(map.row_count(), 1);
    /// # Ok::<(), peakclus_core::PeakClusError>(())
    /// ```
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let node_count = rows.first().map_or(0, Vec::len);
        if node_count == 0 {
            return Err(PeakClusError::EmptyStatistic);
        }
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != node_count)
        {
            return Err(PeakClusError::RaggedStatistic {
                row,
                len: values.len(),
                expected: node_count,
            });
        }
        Ok(Self { rows, node_count })
    }

    /// Convenience constructor for a single-row map.
    ///
    /// # Errors
    /// Returns [`PeakClusError::EmptyStatistic`] when `values` is empty.
    pub fn from_primary(values: Vec<f64>) -> Result<Self> {
        Self::new(vec![values])
    }

    /// Number of nodes (columns).
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Number of statistic rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the primary statistic (row 0).
    #[must_use]
    pub fn primary(&self) -> &[f64] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns row `index` when present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

/// The statistic map together with the metadata that selects the resel
/// formula.
///
/// # Examples
/// ```
/// use peakclus_core::{DegreesOfFreedom, StatisticMap, StatisticModel, VariateCount};
///
/// let model = StatisticModel::new(StatisticMap::from_primary(vec![1.0, 4.0])?)
///     .with_degrees_of_freedom(DegreesOfFreedom::Pair(2.0, 30.0))
///     .with_variate_count(VariateCount::Two);
/// assert_eq!(model.variate_count(), VariateCount::Two);
/// assert_eq!(model.degrees_of_freedom().len(), 2);
/// # Ok::<(), peakclus_core::PeakClusError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticModel {
    statistic: StatisticMap,
    df: DegreesOfFreedom,
    k: VariateCount,
}

impl StatisticModel {
    /// Creates a univariate model with scalar degrees of freedom.
    #[must_use]
    pub fn new(statistic: StatisticMap) -> Self {
        Self {
            statistic,
            df: DegreesOfFreedom::default(),
            k: VariateCount::default(),
        }
    }

    /// Overrides the degrees of freedom.
    #[must_use]
    pub fn with_degrees_of_freedom(mut self, df: DegreesOfFreedom) -> Self {
        self.df = df;
        self
    }

    /// Overrides the variate count.
    #[must_use]
    pub fn with_variate_count(mut self, k: VariateCount) -> Self {
        self.k = k;
        self
    }

    /// Returns the statistic rows.
    #[must_use]
    #[rustfmt::skip]
    pub fn statistic(&self) -> &StatisticMap { &self.statistic }

    /// Returns the degrees of freedom.
    #[must_use]
    #[rustfmt::skip]
    pub fn degrees_of_freedom(&self) -> DegreesOfFreedom { self.df }

    /// Returns the variate count.
    #[must_use]
    #[rustfmt::skip]
    pub fn variate_count(&self) -> VariateCount { self.k }

    /// Number of nodes in the statistic map.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.statistic.node_count()
    }
}

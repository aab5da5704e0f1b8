//! Nearest-neighbour remapping between sparse key spaces.
//!
//! Component identifiers produced by the union-find are sparse (they are the
//! dense index of each root). Ranking produces compact values for each of
//! them, and this module translates arbitrary query keys back through that
//! table by nearest-key lookup.

use thiserror::Error;

/// Errors raised while building a [`NearestNeighbourRemap`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum RemapError {
    /// Keys and values had different lengths.
    #[error("remap has {keys} keys but {values} values")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// Keys were not strictly ascending.
    #[error("remap keys must be strictly ascending (violated at position {index})")]
    Unsorted {
        /// Position of the first key that is not greater than its predecessor.
        index: usize,
    },
    /// No reference keys were supplied.
    #[error("remap requires at least one reference key")]
    Empty,
}

/// Lookup table returning the value of the reference key nearest to a query.
///
/// Distance is the absolute difference between keys. When a query sits
/// exactly halfway between two keys the lower key wins.
///
/// # Examples
/// ```
/// use peakclus_core::NearestNeighbourRemap;
///
/// let remap = NearestNeighbourRemap::with_sentinel(vec![3, 7], vec!['a', 'b'], '-')?;
/// assert_eq!(remap.lookup(0), '-');
/// assert_eq!(remap.lookup(3), 'a');
/// assert_eq!(remap.lookup(5), 'a');
/// assert_eq!(remap.lookup(6), 'b');
/// assert_eq!(remap.lookup(100), 'b');
/// # Ok::<(), peakclus_core::RemapError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NearestNeighbourRemap<V> {
    keys: Vec<usize>,
    values: Vec<V>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "Construction rejects empty tables"
)]
impl<V: Copy> NearestNeighbourRemap<V> {
    /// Builds a remap from strictly ascending keys and their values.
    ///
    /// # Errors
    /// Returns [`RemapError::LengthMismatch`] when the inputs differ in length,
    /// [`RemapError::Empty`] when no keys are given and [`RemapError::Unsorted`]
    /// when the keys are not strictly ascending.
    pub fn new(keys: Vec<usize>, values: Vec<V>) -> Result<Self, RemapError> {
        if keys.len() != values.len() {
            return Err(RemapError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        if keys.is_empty() {
            return Err(RemapError::Empty);
        }
        if let Some(position) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(RemapError::Unsorted {
                index: position + 1,
            });
        }
        Ok(Self { keys, values })
    }

    /// Builds a remap whose table starts with the implicit `0 → sentinel`
    /// entry.
    ///
    /// # Errors
    /// As [`Self::new`]; additionally a key of `0` in `keys` collides with the
    /// sentinel and is reported as [`RemapError::Unsorted`].
    pub fn with_sentinel(keys: Vec<usize>, values: Vec<V>, sentinel: V) -> Result<Self, RemapError> {
        if keys.len() != values.len() {
            return Err(RemapError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut all_keys = Vec::with_capacity(keys.len() + 1);
        all_keys.push(0);
        all_keys.extend(keys);
        let mut all_values = Vec::with_capacity(values.len() + 1);
        all_values.push(sentinel);
        all_values.extend(values);
        Self::new(all_keys, all_values)
    }

    /// Returns the value of the reference key nearest to `query`.
    #[must_use]
    pub fn lookup(&self, query: usize) -> V {
        // First key >= query; the nearest key is either it or its predecessor.
        let upper = self.keys.partition_point(|&key| key < query);
        let slot = match (upper.checked_sub(1), self.keys.get(upper)) {
            (None, _) => 0,
            (Some(lower), None) => lower,
            (Some(lower), Some(&above)) => {
                let below = self.keys[lower];
                if above - query < query - below {
                    upper
                } else {
                    lower
                }
            }
        };
        self.values[slot]
    }

    /// Maps every query through [`Self::lookup`].
    #[must_use]
    pub fn lookup_all(&self, queries: &[usize]) -> Vec<V> {
        queries.iter().map(|&query| self.lookup(query)).collect()
    }

    /// Number of reference keys, including any sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![1, 2], vec![10], RemapError::LengthMismatch { keys: 2, values: 1 })]
    #[case(vec![], vec![], RemapError::Empty)]
    #[case(vec![1, 3, 3], vec![0, 0, 0], RemapError::Unsorted { index: 2 })]
    #[case(vec![4, 2], vec![0, 0], RemapError::Unsorted { index: 1 })]
    fn new_rejects_invalid_tables(
        #[case] keys: Vec<usize>,
        #[case] values: Vec<u32>,
        #[case] expected: RemapError,
    ) {
        let err = NearestNeighbourRemap::new(keys, values).expect_err("table must be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn sentinel_rejects_zero_key() {
        let err = NearestNeighbourRemap::with_sentinel(vec![0, 2], vec![1, 2], 0)
            .expect_err("zero collides with the sentinel");
        assert_eq!(err, RemapError::Unsorted { index: 1 });
    }

    #[test]
    fn len_counts_the_sentinel_entry() {
        let remap = NearestNeighbourRemap::with_sentinel(vec![3, 7], vec![1, 2], 0)
            .expect("valid table");
        assert_eq!(remap.len(), 3);
    }

    #[rstest]
    #[case(2, 20)]
    #[case(4, 20)]
    #[case(5, 20)]
    #[case(6, 80)]
    #[case(8, 80)]
    fn ties_resolve_to_the_lower_key(#[case] query: usize, #[case] expected: u32) {
        let remap = NearestNeighbourRemap::new(vec![2, 8], vec![20, 80]).expect("valid table");
        assert_eq!(remap.lookup(query), expected);
    }

    fn brute_force(keys: &[usize], values: &[u32], query: usize) -> u32 {
        let mut best = 0;
        for (slot, &key) in keys.iter().enumerate() {
            if key.abs_diff(query) < keys[best].abs_diff(query) {
                best = slot;
            }
        }
        values[best]
    }

    proptest! {
        #[test]
        fn lookup_matches_brute_force(
            raw_keys in prop::collection::btree_set(0_usize..500, 1..40),
            query in 0_usize..600,
        ) {
            let keys: Vec<usize> = raw_keys.into_iter().collect();
            let values: Vec<u32> = (0..keys.len()).map(|slot| u32::try_from(slot).unwrap_or(u32::MAX)).collect();
            let remap = NearestNeighbourRemap::new(keys.clone(), values.clone()).expect("sorted keys");
            prop_assert_eq!(remap.lookup(query), brute_force(&keys, &values, query));
        }
    }
}

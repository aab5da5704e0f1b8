//! Set-membership helpers.

use std::{collections::HashMap, hash::Hash};

/// For each needle, returns the index of its first occurrence in `haystack`.
///
/// # Examples
/// ```
/// use peakclus_core::first_match_indices;
///
/// let found = first_match_indices(&[4, 9, 2], &[2, 4, 4, 7]);
/// assert_eq!(found, vec![Some(1), None, Some(0)]);
/// ```
#[must_use]
pub fn first_match_indices<T: Eq + Hash>(needles: &[T], haystack: &[T]) -> Vec<Option<usize>> {
    let mut first_seen: HashMap<&T, usize> = HashMap::with_capacity(haystack.len());
    for (position, value) in haystack.iter().enumerate() {
        first_seen.entry(value).or_insert(position);
    }
    needles
        .iter()
        .map(|needle| first_seen.get(needle).copied())
        .collect()
}

/// Returns `true` for each needle that occurs anywhere in `haystack`.
///
/// # Examples
/// ```
/// use peakclus_core::membership_mask;
///
/// assert_eq!(membership_mask(&[1, 5], &[5, 6]), vec![false, true]);
/// ```
#[must_use]
pub fn membership_mask<T: Eq + Hash>(needles: &[T], haystack: &[T]) -> Vec<bool> {
    first_match_indices(needles, haystack)
        .into_iter()
        .map(|found| found.is_some())
        .collect()
}

//! Font-size based heading classification.

use std::collections::HashMap;

use crate::model::HeadingLevel;

/// Font sizes are compared after rounding to one decimal place. Keys are
/// integer tenths of a point so exact matching is well-defined.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Round a font size to one decimal place.
pub(crate) fn round_size(size: f32) -> f32 {
    size_key(size) as f32 / 10.0
}

/// Mapping from the three largest distinct observed font sizes to heading
/// levels, strictly descending (largest → H1).
///
/// Sizes outside the top three have no entry; a line whose rounded size
/// does not exactly match one of the keys is not a heading candidate.
#[derive(Debug, Clone, Default)]
pub struct FontLevelMap {
    levels: HashMap<i32, HeadingLevel>,
}

impl FontLevelMap {
    /// Build the map from a multiset of observed (already rounded) sizes.
    ///
    /// Fewer than three distinct sizes populate only that many levels;
    /// an empty histogram yields an empty map.
    pub fn from_sizes(sizes: &[f32]) -> Self {
        let mut distinct: Vec<i32> = sizes.iter().map(|s| size_key(*s)).collect();
        distinct.sort_unstable_by(|a, b| b.cmp(a));
        distinct.dedup();

        let levels = distinct
            .into_iter()
            .take(3)
            .enumerate()
            .filter_map(|(rank, key)| HeadingLevel::from_rank(rank).map(|lvl| (key, lvl)))
            .collect();

        Self { levels }
    }

    /// Heading level for a font size, if it is one of the top three.
    pub fn level_for(&self, size: f32) -> Option<HeadingLevel> {
        self.levels.get(&size_key(size)).copied()
    }

    /// Number of populated levels (at most 3).
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if no level is populated.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

//! Recipe subsets as bitmasks over catalog indices.

use std::fmt;

/// A set of catalog recipe indices. Bit `i` set means recipe `i` is included.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecipeSet(u64);

impl RecipeSet {
    pub const EMPTY: RecipeSet = RecipeSet(0);

    pub fn from_bits(bits: u64) -> Self {
        RecipeSet(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices
            .into_iter()
            .fold(RecipeSet::EMPTY, |set, i| set.with(i))
    }

    pub fn with(self, index: usize) -> Self {
        debug_assert!(index < 64);
        RecipeSet(self.0 | (1u64 << index))
    }

    pub fn contains(self, index: usize) -> bool {
        index < 64 && self.0 & (1u64 << index) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset_of(self, other: RecipeSet) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn is_proper_subset_of(self, other: RecipeSet) -> bool {
        self != other && self.is_subset_of(other)
    }

    /// Member indices in ascending order.
    pub fn indices(self) -> Indices {
        Indices(self.0)
    }

    /// Every non-empty subset of `{0, .., n-1}`.
    pub fn non_empty_subsets(n: usize) -> impl Iterator<Item = RecipeSet> {
        assert!(n < 64, "recipe sets hold at most 63 recipes");
        (1..(1u64 << n)).map(RecipeSet)
    }
}

impl fmt::Debug for RecipeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}

pub struct Indices(u64);

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }
}

//! Fixed-capacity cell sets.

use std::fmt;

use crate::Cell;

/// A set of cells of a grid with side `size`, stored as a bitset.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, CellSet};
///
/// let mut set = CellSet::new(9);
/// assert!(set.insert(Cell::new(4, 4)));
/// assert!(!set.insert(Cell::new(4, 4)));
/// assert!(set.contains(Cell::new(4, 4)));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.iter().collect::<Vec<_>>(), [Cell::new(4, 4)]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CellSet {
    size: u8,
    words: Vec<u64>,
}

impl CellSet {
    /// Creates an empty set for a grid of side `size`.
    #[must_use]
    pub fn new(size: u8) -> Self {
        let bits = usize::from(size) * usize::from(size);
        Self {
            size,
            words: vec![0; bits.div_ceil(64)],
        }
    }

    /// Creates a set containing every cell of the grid.
    #[must_use]
    pub fn full(size: u8) -> Self {
        let mut set = Self::new(size);
        let bits = usize::from(size) * usize::from(size);
        for index in 0..bits {
            set.words[index / 64] |= 1 << (index % 64);
        }
        set
    }

    /// Returns the grid side this set was created for.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Inserts a cell. Returns `true` if it was not present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let (word, bit) = self.locate(cell);
        let was_absent = self.words[word] & bit == 0;
        self.words[word] |= bit;
        was_absent
    }

    /// Removes a cell. Returns `true` if it was present.
    pub fn remove(&mut self, cell: Cell) -> bool {
        let (word, bit) = self.locate(cell);
        let was_present = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        was_present
    }

    /// Returns `true` if the cell is in the set.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        let (word, bit) = self.locate(cell);
        self.words[word] & bit != 0
    }

    /// Returns the number of cells in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Iterates over the cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let size = self.size;
        self.words.iter().enumerate().flat_map(move |(i, word)| {
            let mut word = *word;
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }
                let bit = word.trailing_zeros() as usize;
                word &= word - 1;
                Some(Cell::from_index(i * 64 + bit, size))
            })
        })
    }

    fn locate(&self, cell: Cell) -> (usize, u64) {
        let index = cell.index(self.size);
        (index / 64, 1 << (index % 64))
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Extend<Cell> for CellSet {
    fn extend<T: IntoIterator<Item = Cell>>(&mut self, iter: T) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_full() {
        let set = CellSet::full(9);
        assert_eq!(set.len(), 81);
        assert!(set.contains(Cell::new(8, 8)));
        let mut empty = set.clone();
        for cell in set.iter() {
            assert!(empty.remove(cell));
        }
        assert!(empty.is_empty());
    }

    proptest! {
        #[test]
        fn prop_iter_matches_inserted(indices in proptest::collection::btree_set(0usize..144, 0..40)) {
            let mut set = CellSet::new(12);
            for &index in &indices {
                set.insert(Cell::from_index(index, 12));
            }
            let collected = set.iter().map(|cell| cell.index(12)).collect::<Vec<_>>();
            prop_assert_eq!(collected, indices.into_iter().collect::<Vec<_>>());
        }
    }
}

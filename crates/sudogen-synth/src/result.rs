//! Synthesized puzzles.

use rand::{
    Rng,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use sha2::{Digest as _, Sha256};
use sudogen_core::{
    Cell, CellSet, Clues, ConsistencyError, Grid, Interface, InterfaceCell, ParseError, Solution,
    Value,
};

/// An error shuffling a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ShuffleError {
    /// The shuffled values do not form a grid.
    #[display("{_0}")]
    Shape(#[from] ParseError),
    /// The shuffled solution breaks a group of the grid.
    #[display("{_0}")]
    Inconsistent(#[from] ConsistencyError),
}

/// A synthesized puzzle: the intended solution, the hidden cells, the
/// designated interface cells and the highlighted strike, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PuzzleResult {
    /// The intended solution.
    pub solution: Solution,
    /// The hidden cells.
    pub mask: CellSet,
    /// The interface cells.
    pub interface: Interface,
    /// The highlighted strike: a cell and a value it does not hold.
    pub highlight: Option<(Cell, Value)>,
}

impl PuzzleResult {
    /// Returns the playable puzzle.
    #[must_use]
    pub fn clues(&self) -> Clues {
        self.solution.to_clues(&self.mask)
    }

    /// Returns the number of hidden cells.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.mask.len()
    }

    /// Returns the clues on a single line, `.` for hidden cells.
    #[must_use]
    pub fn to_short_string(&self) -> String {
        self.clues().to_short_string()
    }

    /// Returns the clues as a boxed grid, with block separators when `grid`
    /// has regular blocks.
    #[must_use]
    pub fn to_pretty_string(&self, grid: &Grid) -> String {
        self.clues().to_pretty_string(grid.block_shape())
    }

    /// Returns the SHA-256 of the short form, as lowercase hex.
    ///
    /// Puzzles with the same clues share a fingerprint, whatever their
    /// interface.
    ///
    /// ```
    /// use sudogen_core::{CellSet, Interface};
    /// use sudogen_synth::PuzzleResult;
    ///
    /// let result = PuzzleResult {
    ///     solution: "1423 3214 2341 4132".parse()?,
    ///     mask: CellSet::new(4),
    ///     interface: Interface::default(),
    ///     highlight: None,
    /// };
    /// assert_eq!(result.fingerprint().len(), 64);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.to_short_string().as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Returns an equivalent puzzle under a random symmetry of `grid`.
    ///
    /// Values are relabelled. Bands of rows and stacks of columns are
    /// permuted, as are the lines inside each, and the grid is transposed
    /// with probability one half. Geometric moves that are not symmetries of
    /// `grid` are skipped, so a grid with extra groups may only be
    /// relabelled.
    ///
    /// Relabelling preserves every property that does not name specific
    /// values; callers that fixed values or cells should not shuffle.
    ///
    /// # Errors
    ///
    /// Returns an error if the shuffled solution is not a valid solution of
    /// `grid`, which happens when `self` was not one to begin with.
    pub fn shuffled<R>(&self, grid: &Grid, rng: &mut R) -> Result<Self, ShuffleError>
    where
        R: Rng + ?Sized,
    {
        let size = grid.size();
        let mut labels = grid.values().collect::<Vec<_>>();
        labels.shuffle(rng);
        let relabel = |v: Value| labels[v.index()];

        let shape = grid.block_shape();
        let rows = line_permutation(shape.map(|s| s.height), size, rng);
        let columns = line_permutation(shape.map(|s| s.width), size, rng);
        let transpose = [false, true].choose(rng).copied().unwrap_or(false);
        let identity = (0..size).collect::<Vec<_>>();
        let (rows, columns, transpose) = [
            (&rows, &columns, transpose),
            (&rows, &columns, false),
            (&identity, &identity, transpose),
        ]
        .into_iter()
        .find(|(r, c, t)| grid.admits(mapping(r, c, *t)))
        .unwrap_or((&identity, &identity, false));
        let place = mapping(rows, columns, transpose);

        let mut values = vec![Value::new(1); grid.num_cells()];
        for (cell, value) in self.solution.iter() {
            values[place(cell).index(size)] = relabel(value);
        }
        let solution = Solution::from_values(values)?;
        solution.validate(grid)?;

        let mut mask = CellSet::new(size);
        for cell in self.mask.iter() {
            mask.insert(place(cell));
        }
        let side = |side: Option<InterfaceCell>| {
            side.map(|s| InterfaceCell {
                cell: place(s.cell),
                decoy: relabel(s.decoy),
            })
        };

        Ok(Self {
            solution,
            mask,
            interface: Interface {
                input: side(self.interface.input),
                output: side(self.interface.output),
            },
            highlight: self.highlight.map(|(c, v)| (place(c), relabel(v))),
        })
    }
}

/// A random permutation of `size` lines that keeps bands of `band` lines
/// together. Entry `i` is the new position of line `i`.
fn line_permutation<R>(band: Option<u8>, size: u8, rng: &mut R) -> Vec<u8>
where
    R: Rng + ?Sized,
{
    let band = band.filter(|b| *b > 0 && size % b == 0).unwrap_or(size);
    let mut bands = (0..size / band).collect::<Vec<_>>();
    bands.shuffle(rng);
    let mut image = vec![0; usize::from(size)];
    for (from, to) in (0..size / band).zip(bands) {
        let mut offsets = (0..band).collect::<Vec<_>>();
        offsets.shuffle(rng);
        for (offset, moved) in (0..band).zip(offsets) {
            image[usize::from(from * band + offset)] = to * band + moved;
        }
    }
    image
}

fn mapping<'a>(rows: &'a [u8], columns: &'a [u8], transpose: bool) -> impl Fn(Cell) -> Cell + 'a {
    move |cell| {
        let moved = Cell::new(columns[usize::from(cell.x())], rows[usize::from(cell.y())]);
        if transpose { Cell::new(moved.y(), moved.x()) } else { moved }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{SplrBackend, UniquenessOracle, Verdict};

    fn result() -> PuzzleResult {
        let mut mask = CellSet::new(4);
        mask.insert(Cell::new(1, 0));
        mask.insert(Cell::new(2, 3));
        PuzzleResult {
            solution: "1423 3214 2341 4132".parse().unwrap(),
            mask,
            interface: Interface {
                input: Some(InterfaceCell {
                    cell: Cell::new(1, 0),
                    decoy: Value::new(2),
                }),
                output: None,
            },
            highlight: Some((Cell::new(3, 0), Value::new(1))),
        }
    }

    #[test]
    fn test_renderings() {
        let result = result();
        assert_eq!(result.hidden_count(), 2);
        assert_eq!(result.to_short_string(), "1.233214234141.2");
        assert_eq!(result.fingerprint(), result.clone().fingerprint());
        let mut other = result.clone();
        other.mask.remove(Cell::new(1, 0));
        assert_ne!(result.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_shuffle_preserves_structure() {
        let grid = Grid::regular(4).unwrap();
        let result = result();
        for seed in 0..16 {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let shuffled = result.shuffled(&grid, &mut rng).unwrap();
            shuffled.solution.validate(&grid).unwrap();
            assert_eq!(shuffled.hidden_count(), result.hidden_count());
            let input = shuffled.interface.input.unwrap();
            assert!(shuffled.mask.contains(input.cell));
            assert_ne!(shuffled.solution.get(input.cell), input.decoy);
            let (cell, value) = shuffled.highlight.unwrap();
            assert_ne!(shuffled.solution.get(cell), value);
        }
    }

    #[test]
    fn test_shuffle_moves_lines_and_keeps_uniqueness() {
        let grid = Grid::regular(9).unwrap();
        let solution: Solution = "534678912 672195348 198342567 859761423 426853791 713924856 \
                                  961537284 287419635 345286179"
            .parse()
            .unwrap();
        let clues: Clues = "53..7.... 6..195... .98....6. 8...6...3 4..8.3..1 7...2...6 \
                            .6....28. ...419..5 ....8..79"
            .parse()
            .unwrap();
        let mut mask = CellSet::new(9);
        for cell in clues.hidden().iter() {
            mask.insert(cell);
        }
        let result = PuzzleResult {
            solution,
            mask,
            interface: Interface::default(),
            highlight: None,
        };
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        assert_eq!(
            oracle.alternative(&result.clues(), &result.solution, None).unwrap(),
            Verdict::Unique
        );

        let mut moved = false;
        for seed in 0..8 {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let shuffled = result.shuffled(&grid, &mut rng).unwrap();
            shuffled.solution.validate(&grid).unwrap();
            assert_eq!(shuffled.hidden_count(), result.hidden_count());
            assert_eq!(
                oracle
                    .alternative(&shuffled.clues(), &shuffled.solution, None)
                    .unwrap(),
                Verdict::Unique
            );
            // Relabelling alone keeps the hidden cells in place.
            moved |= shuffled.mask != result.mask;
        }
        assert!(moved);
    }

    #[test]
    fn test_line_permutation_keeps_bands() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..16 {
            let image = line_permutation(Some(3), 9, &mut rng);
            let mut sorted = image.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..9).collect::<Vec<_>>());
            for band in 0u8..3 {
                let targets = (band * 3..band * 3 + 3)
                    .map(|line| image[usize::from(line)] / 3)
                    .collect::<Vec<_>>();
                assert!(targets.iter().all(|t| *t == targets[0]));
            }
        }
    }

    #[test]
    fn test_invalid_solution_is_reported() {
        let grid = Grid::regular(4).unwrap();
        let mut result = result();
        result.solution = "1234 1234 1234 1234".parse().unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        assert!(matches!(
            result.shuffled(&grid, &mut rng),
            Err(ShuffleError::Inconsistent(_))
        ));
    }
}

//! Declarative synthesis constraints.

use sudogen_core::{Cell, MaskPattern, Solution, Value};
use sudogen_deduce::StrategyRequirement;

/// A mirror symmetry of the hidden-cell mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Mirror across the vertical axis.
    LeftRight,
    /// Mirror across the horizontal axis.
    TopBottom,
    /// 180 degree rotation about the center.
    Point,
}

impl Symmetry {
    /// Returns the image of `cell` in a grid of side `size`.
    #[must_use]
    pub fn mirror(self, cell: Cell, size: u8) -> Cell {
        let last = size - 1;
        match self {
            Self::LeftRight => Cell::new(last - cell.x(), cell.y()),
            Self::TopBottom => Cell::new(cell.x(), last - cell.y()),
            Self::Point => Cell::new(last - cell.x(), last - cell.y()),
        }
    }
}

/// How strongly the input cell must resist deduction.
///
/// Each alternative is a full assignment agreeing with the clues that puts
/// a value other than the true one in the input cell. The input decoy is
/// one of the alternative values.
///
/// ```
/// use sudogen_synth::Undeducibility;
///
/// let options = Undeducibility::new().with_alternatives(2).with_exclusive(true);
/// assert_eq!(options.alternatives, 2);
/// assert!(!options.unique_alternatives);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Undeducibility {
    /// Number of alternative values for the input cell, each with its own
    /// assignment.
    pub alternatives: usize,
    /// No value other than the true one and the alternatives fits the
    /// input cell.
    pub exclusive: bool,
    /// Each alternative value, written into the input cell, completes to
    /// exactly one assignment.
    pub unique_alternatives: bool,
}

impl Default for Undeducibility {
    fn default() -> Self {
        Self::new()
    }
}

impl Undeducibility {
    /// One alternative, neither exclusive nor unique.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            alternatives: 1,
            exclusive: false,
            unique_alternatives: false,
        }
    }

    /// Sets [`Self::alternatives`].
    #[must_use]
    pub const fn with_alternatives(mut self, alternatives: usize) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Sets [`Self::exclusive`].
    #[must_use]
    pub const fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Sets [`Self::unique_alternatives`].
    #[must_use]
    pub const fn with_unique_alternatives(mut self, unique: bool) -> Self {
        self.unique_alternatives = unique;
        self
    }
}

/// One property the synthesized puzzle must have.
///
/// A synthesis request is a conjunction of constraints. Validity of the
/// solution is always implied.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The number of hidden cells lies in `min..=max`.
    HiddenCount {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Hide as many cells as possible.
    MaximizeHidden,
    /// Hide as few cells as possible.
    MinimizeHidden,
    /// The mask is symmetric.
    Symmetry(Symmetry),
    /// Cells whose solution is one of these values are hidden.
    ForbidValues(Vec<Value>),
    /// The cell is a visible clue with this value.
    FixCell {
        /// The cell.
        cell: Cell,
        /// Its clue.
        value: Value,
    },
    /// The cell is hidden.
    OpenCell(Cell),
    /// The mask follows a pattern.
    Pattern(MaskPattern),
    /// The top row reads `1, 2, ..., size`.
    ///
    /// Any solution can be relabelled to satisfy this, so it only removes
    /// value-permutation duplicates.
    CanonicalTopRow,
    /// The clues admit exactly one solution.
    UniqueSolution,
    /// The intended solution is this grid.
    ///
    /// Strategy encodings shrink considerably once the solution is known,
    /// since every placement and strike is then decided up front.
    FixSolution(Solution),
    /// The puzzle makes a strategy hold or fail.
    Strategy(StrategyRequirement),
    /// Designates a hidden input cell with a decoy value.
    InputCell {
        /// Fixed location, or any cell.
        location: Option<Cell>,
        /// Fixed true value.
        solution: Option<Value>,
        /// Fixed decoy value.
        decoy: Option<Value>,
    },
    /// Designates a hidden output cell with a decoy value.
    OutputCell {
        /// Fixed location, or any cell.
        location: Option<Cell>,
        /// Fixed true value.
        solution: Option<Value>,
        /// A value the true value must differ from.
        forbidden_solution: Option<Value>,
        /// Fixed decoy value.
        decoy: Option<Value>,
    },
    /// The solutions and decoys of the interface cells are pairwise
    /// different.
    InterfaceAllDifferent,
    /// Full assignments agreeing with the clues put other values, the input
    /// decoy among them, in the input cell.
    InputCellUndeducible(Undeducibility),
    /// Every hidden cell admits a full assignment, agreeing with the clues,
    /// with a different value there.
    NoForcedHiddenCell,
    /// Selects one strike of the intended solution to point the solver at.
    ///
    /// The selected value differs from the cell's true value. Strategy
    /// stages talk about it through the highlight rules.
    HighlightStrike {
        /// Fixed cell, or any cell.
        cell: Option<Cell>,
        /// Fixed value, or any value.
        value: Option<Value>,
    },
}

impl Constraint {
    /// Returns `true` for the optimization objectives.
    #[must_use]
    pub fn is_objective(&self) -> bool {
        matches!(self, Self::MaximizeHidden | Self::MinimizeHidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_undeducibility() {
        let options = Undeducibility::default();
        assert_eq!(options, Undeducibility::new());
        assert_eq!(options.alternatives, 1);
        assert!(!options.exclusive && !options.unique_alternatives);
    }

    #[test]
    fn test_mirror_is_an_involution() {
        for symmetry in [Symmetry::LeftRight, Symmetry::TopBottom, Symmetry::Point] {
            for y in 0..9 {
                for x in 0..9 {
                    let cell = Cell::new(x, y);
                    assert_eq!(symmetry.mirror(symmetry.mirror(cell, 9), 9), cell);
                }
            }
        }
        assert_eq!(Symmetry::Point.mirror(Cell::new(0, 1), 9), Cell::new(8, 7));
        assert_eq!(Symmetry::LeftRight.mirror(Cell::new(4, 4), 9), Cell::new(4, 4));
    }
}

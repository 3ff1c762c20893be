//! The puzzle-side inputs a rule guard may inspect.

use sudogen_core::{Cell, Clues, Interface, Solution, Value};

/// A property of the puzzle itself, as opposed to a derived [`Fact`].
///
/// Guards read puzzle atoms directly; in symbolic synthesis they become
/// solver variables.
///
/// [`Fact`]: crate::Fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PuzzleAtom {
    /// The cell is a visible clue with this value.
    Clue(Cell, Value),
    /// The cell is hidden.
    Hidden(Cell),
    /// The intended solution puts this value in the cell.
    Solution(Cell, Value),
    /// The cell is the interface input cell.
    InputCell(Cell),
    /// The cell is the interface output cell.
    OutputCell(Cell),
    /// The value is the output decoy.
    OutputDecoy(Value),
    /// The strike of this value from this cell is the highlighted one.
    HighlightStrike(Cell, Value),
}

/// Read-only view of a concrete puzzle: its clues, and optionally the
/// intended solution and interface cells.
///
/// Without a solution, [`PuzzleAtom::Solution`] only holds for visible clues.
#[derive(Debug, Clone, Copy)]
pub struct PuzzleView<'a> {
    clues: &'a Clues,
    solution: Option<&'a Solution>,
    interface: Interface,
    highlight: Option<(Cell, Value)>,
}

impl<'a> PuzzleView<'a> {
    /// A view of the clues alone.
    #[must_use]
    pub fn new(clues: &'a Clues) -> Self {
        Self {
            clues,
            solution: None,
            interface: Interface::default(),
            highlight: None,
        }
    }

    /// Attaches the intended solution.
    #[must_use]
    pub fn with_solution(mut self, solution: &'a Solution) -> Self {
        self.solution = Some(solution);
        self
    }

    /// Attaches interface cells.
    #[must_use]
    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interface = interface;
        self
    }

    /// Highlights the strike of `value` from `cell`.
    #[must_use]
    pub fn with_highlight(mut self, cell: Cell, value: Value) -> Self {
        self.highlight = Some((cell, value));
        self
    }

    /// Returns the highlighted strike.
    #[must_use]
    pub fn highlight(&self) -> Option<(Cell, Value)> {
        self.highlight
    }

    /// Returns the clues.
    #[must_use]
    pub fn clues(&self) -> &'a Clues {
        self.clues
    }

    /// Returns the interface cells.
    #[must_use]
    pub fn interface(&self) -> Interface {
        self.interface
    }

    /// Returns the intended value of a cell, when known.
    #[must_use]
    pub fn solution_at(&self, cell: Cell) -> Option<Value> {
        match self.solution {
            Some(solution) => Some(solution.get(cell)),
            None => self.clues.get(cell),
        }
    }

    /// Evaluates a puzzle atom.
    #[must_use]
    pub fn holds(&self, atom: PuzzleAtom) -> bool {
        match atom {
            PuzzleAtom::Clue(c, v) => self.clues.get(c) == Some(v),
            PuzzleAtom::Hidden(c) => self.clues.get(c).is_none(),
            PuzzleAtom::Solution(c, v) => self.solution_at(c) == Some(v),
            PuzzleAtom::InputCell(c) => self.interface.is_input(c),
            PuzzleAtom::OutputCell(c) => self.interface.is_output(c),
            PuzzleAtom::OutputDecoy(v) => self.interface.output.is_some_and(|o| o.decoy == v),
            PuzzleAtom::HighlightStrike(c, v) => self.highlight == Some((c, v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::InterfaceCell;

    use super::*;

    #[test]
    fn test_solution_falls_back_to_clues() {
        let clues: Clues = "1... .... .... ....".parse().unwrap();
        let view = PuzzleView::new(&clues);
        assert!(view.holds(PuzzleAtom::Solution(Cell::new(0, 0), Value::new(1))));
        assert!(!view.holds(PuzzleAtom::Solution(Cell::new(1, 0), Value::new(2))));
        assert!(view.holds(PuzzleAtom::Hidden(Cell::new(1, 0))));

        let solution: Solution = "1234 3412 2143 4321".parse().unwrap();
        let view = view.with_solution(&solution);
        assert!(view.holds(PuzzleAtom::Solution(Cell::new(1, 0), Value::new(2))));
    }

    #[test]
    fn test_interface_atoms() {
        let clues = Clues::empty(4);
        let output = InterfaceCell {
            cell: Cell::new(3, 3),
            decoy: Value::new(2),
        };
        let view = PuzzleView::new(&clues).with_interface(Interface {
            input: None,
            output: Some(output),
        });
        assert!(view.holds(PuzzleAtom::OutputCell(Cell::new(3, 3))));
        assert!(view.holds(PuzzleAtom::OutputDecoy(Value::new(2))));
        assert!(!view.holds(PuzzleAtom::InputCell(Cell::new(3, 3))));

        let highlighted = view.with_highlight(Cell::new(0, 2), Value::new(4));
        assert!(highlighted.holds(PuzzleAtom::HighlightStrike(Cell::new(0, 2), Value::new(4))));
        assert!(!highlighted.holds(PuzzleAtom::HighlightStrike(Cell::new(0, 2), Value::new(3))));
        assert!(!view.holds(PuzzleAtom::HighlightStrike(Cell::new(0, 2), Value::new(4))));
    }
}

//! Rules for interface puzzles, whose designated input cell is filled from
//! outside and whose output cell is handed on, and for interactive puzzles
//! that point the solver at one highlighted strike.

use crate::{
    Evaluation, Fact, FactKind, Grounding, PuzzleAtom,
    ground::Atom,
    rule::{BoxedRule, Rule},
};

/// Reveals the true value of the input cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealInputCell;

impl RevealInputCell {
    /// Creates a new `RevealInputCell` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for RevealInputCell {
    fn name(&self) -> &'static str {
        "Reveal Input Cell"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Solution]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let puzzle = eval.puzzle();
        if let Some(input) = puzzle.interface().input
            && let Some(value) = puzzle.solution_at(input.cell)
        {
            eval.derive(Fact::Solution(input.cell, value));
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let grid = grounding.scope().grid();
        for cell in grid.cells() {
            for value in grid.values() {
                grounding.rule(
                    [
                        Atom::Puzzle(PuzzleAtom::InputCell(cell)),
                        Atom::Puzzle(PuzzleAtom::Solution(cell, value)),
                    ],
                    [Fact::Solution(cell, value)],
                );
            }
        }
    }
}

/// Narrows the output cell down to its true value and the output decoy.
///
/// Every other value is struck from the output cell, leaving the solver a
/// two-way choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealOutputValueOrDecoy;

impl RevealOutputValueOrDecoy {
    /// Creates a new `RevealOutputValueOrDecoy` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for RevealOutputValueOrDecoy {
    fn name(&self) -> &'static str {
        "Reveal Output Value Or Decoy"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let puzzle = eval.puzzle();
        let Some(output) = puzzle.interface().output else {
            return;
        };
        let Some(value) = puzzle.solution_at(output.cell) else {
            return;
        };
        if value == output.decoy {
            return;
        }
        for other in eval.scope().grid().values() {
            if other != value && other != output.decoy {
                eval.derive(Fact::Strike(output.cell, other));
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let grid = grounding.scope().grid();
        for cell in grid.cells() {
            for value in grid.values() {
                for decoy in grid.values().filter(|d| *d != value) {
                    let heads = grid
                        .values()
                        .filter(|w| *w != value && *w != decoy)
                        .map(|w| Fact::Strike(cell, w));
                    grounding.rule(
                        [
                            Atom::Puzzle(PuzzleAtom::OutputCell(cell)),
                            Atom::Puzzle(PuzzleAtom::Solution(cell, value)),
                            Atom::Puzzle(PuzzleAtom::OutputDecoy(decoy)),
                        ],
                        heads,
                    );
                }
            }
        }
    }
}

/// Reveals the highlighted strike.
///
/// The highlight names a strike of the intended solution, so revealing it
/// is sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealHighlightStrike;

impl RevealHighlightStrike {
    /// Creates a new `RevealHighlightStrike` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for RevealHighlightStrike {
    fn name(&self) -> &'static str {
        "Reveal Highlight Strike"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        if let Some((cell, value)) = eval.puzzle().highlight() {
            eval.derive(Fact::Strike(cell, value));
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let grid = grounding.scope().grid();
        for cell in grid.cells() {
            for value in grid.values() {
                grounding.rule(
                    [Atom::Puzzle(PuzzleAtom::HighlightStrike(cell, value))],
                    [Fact::Strike(cell, value)],
                );
            }
        }
    }
}

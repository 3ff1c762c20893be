use crate::{
    Evaluation, Fact, FactKind, Grounding, PuzzleAtom,
    ground::Atom,
    rule::{BoxedRule, Rule},
};

const NAME: &str = "Elementary Closure";

/// The bookkeeping every stage needs.
///
/// - A visible clue becomes a solution fact.
/// - A solution decides its cell, strikes the other values of that cell and
///   strikes its value from every active peer.
/// - When every other member of a full group is decided and none of them can
///   take value `v`, the remaining member receives `v`.
///
/// The last case is the "one remaining cell" deduction, expressed without
/// counting candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElementaryClosure;

impl ElementaryClosure {
    /// Creates a new `ElementaryClosure` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ElementaryClosure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Solution, FactKind::Strike, FactKind::Decided]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let scope = eval.scope();
        let grid = scope.grid();
        let facts = eval.facts();

        for (cell, value) in eval.puzzle().clues().given() {
            eval.derive(Fact::Solution(cell, value));
        }

        for cell in grid.cells() {
            for value in grid.values() {
                if !facts.is_solution(cell, value) {
                    continue;
                }
                eval.derive(Fact::Decided(cell));
                for other in grid.values().filter(|w| *w != value) {
                    eval.derive(Fact::Strike(cell, other));
                }
                eval.strike_all(scope.peers(cell).iter().copied(), value);
            }
        }

        for (_, group) in scope.full_groups() {
            for &cell in group.cells() {
                let others = group.cells().iter().copied().filter(|c| *c != cell);
                if !others.clone().all(|c| facts.is_decided(c)) {
                    continue;
                }
                for value in grid.values() {
                    if others.clone().all(|c| facts.is_struck(c, value)) {
                        eval.derive(Fact::Solution(cell, value));
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let scope = grounding.scope();
        let grid = scope.grid();

        for cell in grid.cells() {
            for value in grid.values() {
                grounding.rule(
                    [Atom::Puzzle(PuzzleAtom::Clue(cell, value))],
                    [Fact::Solution(cell, value)],
                );
                let heads = [Fact::Decided(cell)]
                    .into_iter()
                    .chain(grid.values().filter(|w| *w != value).map(|w| Fact::Strike(cell, w)))
                    .chain(scope.peers(cell).iter().map(|p| Fact::Strike(*p, value)));
                grounding.rule([Atom::Derived(Fact::Solution(cell, value))], heads);
            }
        }

        for (_, group) in scope.full_groups() {
            for &cell in group.cells() {
                let others = group.cells().iter().copied().filter(|c| *c != cell);
                for value in grid.values() {
                    let body = others.clone().flat_map(|c| {
                        [
                            Atom::Derived(Fact::Decided(c)),
                            Atom::Derived(Fact::Strike(c, value)),
                        ]
                    });
                    grounding.rule(body, [Fact::Solution(cell, value)]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Grid, Value};

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_clue_strikes_peers() {
        RuleTester::new(Grid::regular(4).unwrap(), "2... .... .... ....")
            .apply(ElementaryClosure::new())
            .assert_derived(Fact::Solution(Cell::new(0, 0), Value::new(2)))
            .assert_derived(Fact::Decided(Cell::new(0, 0)))
            .assert_struck(Cell::new(0, 0), [1, 3, 4])
            .assert_struck(Cell::new(3, 0), [2])
            .assert_struck(Cell::new(0, 3), [2])
            .assert_struck(Cell::new(1, 1), [2])
            .assert_not_struck(Cell::new(2, 2), [2]);
    }

    #[test]
    fn test_last_remaining_cell() {
        RuleTester::new(Grid::regular(4).unwrap(), "12 3. .... .... ....")
            .apply(ElementaryClosure::new())
            .assert_derived(Fact::Solution(Cell::new(3, 0), Value::new(4)))
            .assert_not_derived(Fact::Solution(Cell::new(0, 1), Value::new(3)));
    }

    #[test]
    fn test_solved_grid_is_closed() {
        RuleTester::new(Grid::regular(4).unwrap(), "1234 3412 2143 4321")
            .apply(ElementaryClosure::new())
            .assert_solved();
    }

    #[test]
    fn test_last_remaining_cell_chains() {
        // Filling r1c4 decides the row; column 4 then has a single open cell.
        RuleTester::new(Grid::regular(4).unwrap(), "123. ...2 ...1 ....")
            .apply(ElementaryClosure::new())
            .assert_derived(Fact::Solution(Cell::new(3, 0), Value::new(4)))
            .assert_derived(Fact::Solution(Cell::new(3, 3), Value::new(3)));
    }
}

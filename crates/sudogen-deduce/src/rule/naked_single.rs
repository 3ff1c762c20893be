use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{BoxedRule, Rule},
};

const NAME: &str = "Naked Singles";

/// A rule that places a value in a cell once every other value is struck
/// there.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingles;

impl NakedSingles {
    /// Creates a new `NakedSingles` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for NakedSingles {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Solution]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let grid = eval.scope().grid();
        let facts = eval.facts();
        for cell in grid.cells() {
            let mut candidates = facts.candidates(cell);
            match (candidates.next(), candidates.next()) {
                (Some(value), None) => eval.derive(Fact::Solution(cell, value)),
                // Every value struck: each one is "the only one left".
                (None, _) => {
                    for value in grid.values() {
                        eval.derive(Fact::Solution(cell, value));
                    }
                }
                _ => {}
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let grid = grounding.scope().grid();
        for cell in grid.cells() {
            for value in grid.values() {
                let body = grid
                    .values()
                    .filter(|w| *w != value)
                    .map(|w| Atom::Derived(Fact::Strike(cell, w)));
                grounding.rule(body, [Fact::Solution(cell, value)]);
            }
        }
    }
}

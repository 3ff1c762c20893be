use sudogen_core::{Cell, Value};

use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_naked_sets, ground_naked_sets},
        strikes,
    },
};

const NAME: &str = "Naked Triples";

/// A rule that removes candidates using a naked triple within a group.
///
/// Three cells of a group whose candidates all lie in the same three values
/// must take those values between them, so the values are struck from the
/// rest of the group.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedTriples;

impl NakedTriples {
    /// Creates a new `NakedTriples` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn strike_triple<'a>(
    rest: impl Iterator<Item = Cell> + Clone + 'a,
    triple: [Value; 3],
) -> impl Iterator<Item = Fact> + 'a {
    triple.into_iter().flat_map(move |v| strikes(rest.clone(), v))
}

impl Rule for NakedTriples {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::NakedTriple, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_naked_sets(eval, 3);

        let scope = eval.scope();
        let facts = eval.facts();
        let values = scope.grid().values().collect::<Vec<_>>();
        for (_, group) in scope.groups() {
            if group.len() < 4 {
                continue;
            }
            for set in combinations(&values, 3) {
                let triple = [set[0], set[1], set[2]];
                let cells = group
                    .cells()
                    .iter()
                    .copied()
                    .filter(|c| facts.contains(&Fact::NakedTriple(*c, triple)))
                    .collect::<Vec<_>>();
                for chosen in combinations(&cells, 3) {
                    let rest = group.cells().iter().copied().filter(|c| !chosen.contains(c));
                    for fact in strike_triple(rest, triple) {
                        eval.derive(fact);
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_naked_sets(grounding, 3);

        let scope = grounding.scope();
        let values = scope.grid().values().collect::<Vec<_>>();
        let triples = combinations(&values, 3);
        for (_, group) in scope.groups() {
            for chosen in combinations(group.cells(), 3) {
                for set in &triples {
                    let triple = [set[0], set[1], set[2]];
                    let body = chosen.iter().map(|c| Atom::Derived(Fact::NakedTriple(*c, triple)));
                    let rest = group.cells().iter().copied().filter(|c| !chosen.contains(c));
                    grounding.rule(body, strike_triple(rest, triple));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Grid};

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_eliminates_triple_values_in_row() {
        RuleTester::new(Grid::latin(5).unwrap(), ".........................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(1, 0), [2, 3])
            .with_candidates(Cell::new(2, 0), [1, 3])
            .apply(NakedTriples::new())
            .assert_derived(Fact::naked_triple(
                Cell::new(0, 0),
                [Value::new(1), Value::new(2), Value::new(3)],
            ))
            .assert_struck(Cell::new(3, 0), [1, 2, 3])
            .assert_struck(Cell::new(4, 0), [1, 2, 3])
            .assert_not_struck(Cell::new(3, 0), [4, 5])
            .assert_not_struck(Cell::new(0, 1), [1, 2, 3]);
    }

    #[test]
    fn test_no_change_with_four_values() {
        RuleTester::new(Grid::latin(5).unwrap(), ".........................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(1, 0), [2, 3])
            .with_candidates(Cell::new(2, 0), [1, 4])
            .apply(NakedTriples::new())
            .assert_not_struck(Cell::new(3, 0), [1, 2, 3, 4])
            .assert_not_struck(Cell::new(4, 0), [1, 2, 3, 4]);
    }
}

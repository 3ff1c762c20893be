use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_confinements, ground_confinements},
        strikes,
    },
};

const NAME: &str = "Hidden Pairs";

/// A rule that removes candidates using a hidden pair within a full group.
///
/// When two values of a full group are both confined to the same two cells,
/// those cells cannot hold any other value.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenPairs;

impl HiddenPairs {
    /// Creates a new `HiddenPairs` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for HiddenPairs {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Conjugate, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_confinements(eval, 2);

        let scope = eval.scope();
        let facts = eval.facts();
        let grid = scope.grid();
        for (id, group) in scope.full_groups() {
            for cells in combinations(group.cells(), 2) {
                let (c1, c2) = (cells[0], cells[1]);
                let values = grid
                    .values()
                    .filter(|v| facts.contains(&Fact::Conjugate(id, *v, c1, c2)))
                    .collect::<Vec<_>>();
                for pair in combinations(&values, 2) {
                    for other in grid.values().filter(|w| !pair.contains(w)) {
                        eval.strike_all([c1, c2], other);
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_confinements(grounding, 2);

        let scope = grounding.scope();
        let grid = scope.grid();
        let values = grid.values().collect::<Vec<_>>();
        let value_pairs = combinations(&values, 2);
        for (id, group) in scope.full_groups() {
            for cells in combinations(group.cells(), 2) {
                let (c1, c2) = (cells[0], cells[1]);
                for pair in &value_pairs {
                    let body = pair
                        .iter()
                        .map(|v| Atom::Derived(Fact::Conjugate(id, *v, c1, c2)));
                    let heads = values
                        .iter()
                        .filter(|w| !pair.contains(w))
                        .flat_map(|w| strikes([c1, c2], *w));
                    grounding.rule(body, heads);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Grid, GroupId, Value};

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_clears_other_values_from_pair_cells() {
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_strikes(Cell::new(1, 0), [1, 2])
            .with_strikes(Cell::new(3, 0), [1, 2])
            .apply(HiddenPairs::new())
            .assert_derived(Fact::conjugate(
                GroupId(0),
                Value::new(1),
                Cell::new(0, 0),
                Cell::new(2, 0),
            ))
            .assert_struck(Cell::new(0, 0), [3, 4])
            .assert_struck(Cell::new(2, 0), [3, 4])
            .assert_not_struck(Cell::new(0, 0), [1, 2]);
    }

    #[test]
    fn test_single_value_is_not_enough() {
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_strikes(Cell::new(1, 0), [1, 2])
            .with_strikes(Cell::new(3, 0), [1])
            .apply(HiddenPairs::new())
            .assert_not_struck(Cell::new(0, 0), [2, 3, 4])
            .assert_not_struck(Cell::new(2, 0), [2, 3, 4]);
    }
}

use crate::{
    Evaluation, Fact, FactKind, Grounding,
    rule::{BoxedRule, Rule, struck_in},
};

const NAME: &str = "Hidden Singles";

/// A rule that places a value in the only cell of a full group where it is
/// not struck.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingles;

impl HiddenSingles {
    /// Creates a new `HiddenSingles` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for HiddenSingles {
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
        let scope = eval.scope();
        let facts = eval.facts();
        for (_, group) in scope.full_groups() {
            for value in scope.grid().values() {
                let mut open = group.cells().iter().filter(|c| !facts.is_struck(**c, value));
                match (open.next(), open.next()) {
                    (Some(&cell), None) => eval.derive(Fact::Solution(cell, value)),
                    (None, _) => {
                        for &cell in group.cells() {
                            eval.derive(Fact::Solution(cell, value));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let scope = grounding.scope();
        for (_, group) in scope.full_groups() {
            for &cell in group.cells() {
                for value in scope.grid().values() {
                    let others = group.cells().iter().copied().filter(|c| *c != cell);
                    grounding.rule(struck_in(others, value), [Fact::Solution(cell, value)]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Grid, GroupKind, Value};

    use super::*;
    use crate::{GroupFilter, rule::ElementaryClosure, testing::RuleTester};

    #[test]
    fn test_places_value_confined_to_one_cell() {
        let mut tester = RuleTester::new(Grid::regular(4).unwrap(), "................");
        for x in [0, 1, 3] {
            tester = tester.with_strikes(Cell::new(x, 2), [4]);
        }
        tester
            .apply(HiddenSingles::new())
            .assert_derived(Fact::Solution(Cell::new(2, 2), Value::new(4)))
            .assert_not_derived(Fact::Solution(Cell::new(2, 2), Value::new(3)));
    }

    #[test]
    fn test_with_elementary_closure() {
        // The 1s in r2c1 and r3c3 leave r1c4 as the only place for 1 in row 1.
        RuleTester::new(Grid::regular(4).unwrap(), ".... 1... ..1. ....")
            .apply_all([ElementaryClosure::new().clone_box(), HiddenSingles::new().clone_box()])
            .assert_derived(Fact::Solution(Cell::new(3, 0), Value::new(1)));
    }

    #[test]
    fn test_ignores_inactive_groups() {
        RuleTester::new(Grid::regular(4).unwrap(), ".... 1... ..1. ....")
            .with_groups(GroupFilter::Kinds(vec![GroupKind::Column]))
            .apply_all([ElementaryClosure::new().clone_box(), HiddenSingles::new().clone_box()])
            .assert_not_derived(Fact::Solution(Cell::new(3, 0), Value::new(1)));
    }
}

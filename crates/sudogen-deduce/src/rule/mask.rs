use sudogen_core::{Grid, MaskPattern, MaskSymbol};

use crate::{
    Condition, Evaluation, Fact, FactKind, Grounding, MaskTag, Scope,
    ground::Atom,
    rule::{BoxedRule, Rule, Stratum},
};

/// Requires the stage to derive exactly the cells a mask pattern shows.
///
/// Cells marked `0` must stay underived, cells marked `*` must be derived,
/// and cells with a value must be derived to that value. `?` cells are
/// unconstrained.
#[derive(Debug, Clone)]
pub struct MaskDerived {
    pattern: MaskPattern,
}

impl MaskDerived {
    /// Creates the rule for `pattern`.
    #[must_use]
    pub fn new(pattern: MaskPattern) -> Self {
        Self { pattern }
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &MaskPattern {
        &self.pattern
    }
}

impl Rule for MaskDerived {
    fn name(&self) -> &'static str {
        "Mask Derived"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(self.clone())
    }

    fn supports(&self, grid: &Grid) -> bool {
        self.pattern.size() == grid.size()
    }

    fn requirement(&self, scope: &Scope<'_>) -> Option<Condition> {
        let grid = scope.grid();
        let conditions = self.pattern.iter().map(|(cell, symbol)| match symbol {
            MaskSymbol::Free => Condition::True,
            MaskSymbol::Hidden => Condition::all(
                grid.values()
                    .map(|v| Condition::NotDerived(Fact::Solution(cell, v))),
            ),
            MaskSymbol::Visible => Condition::any(
                grid.values()
                    .map(|v| Condition::Derived(Fact::Solution(cell, v))),
            ),
            MaskSymbol::Given(v) => Condition::Derived(Fact::Solution(cell, v)),
        });
        Some(Condition::all(conditions))
    }
}

/// Requires the stage's derived cells to deviate from a mask pattern
/// somewhere.
///
/// Runs in the verdict stratum: a `0` cell with a derived solution, or a `*`
/// or value cell without the expected solution, records a
/// [`Fact::MaskMismatch`] for that cell, and any cell mismatch records the
/// grid-wide mismatch the requirement asks for.
#[derive(Debug, Clone)]
pub struct MaskNotDerived {
    pattern: MaskPattern,
    tag: MaskTag,
}

impl MaskNotDerived {
    /// Creates the rule for `pattern`.
    #[must_use]
    pub fn new(pattern: MaskPattern) -> Self {
        let tag = MaskTag::of(&pattern);
        Self { pattern, tag }
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &MaskPattern {
        &self.pattern
    }
}

impl Rule for MaskNotDerived {
    fn name(&self) -> &'static str {
        "Mask Not Derived"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(self.clone())
    }

    fn stratum(&self) -> Stratum {
        Stratum::Verdict
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::MaskMismatch]
    }

    fn negates(&self) -> &'static [FactKind] {
        &[FactKind::Solution]
    }

    fn supports(&self, grid: &Grid) -> bool {
        self.pattern.size() == grid.size()
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let grid = eval.scope().grid();
        let facts = eval.facts();
        for (cell, symbol) in self.pattern.iter() {
            let mismatch = match symbol {
                MaskSymbol::Free => false,
                MaskSymbol::Hidden => grid.values().any(|v| facts.is_solution(cell, v)),
                MaskSymbol::Visible => !grid.values().any(|v| facts.is_solution(cell, v)),
                MaskSymbol::Given(v) => !facts.is_solution(cell, v),
            };
            if mismatch {
                eval.derive(Fact::MaskMismatch(self.tag, Some(cell)));
            }
        }
        let any_cell = facts
            .of_kind(FactKind::MaskMismatch)
            .any(|f| matches!(f, Fact::MaskMismatch(tag, Some(_)) if *tag == self.tag));
        if any_cell {
            eval.derive(Fact::MaskMismatch(self.tag, None));
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let grid = grounding.scope().grid();
        let tag = self.tag;
        for (cell, symbol) in self.pattern.iter() {
            let head = Fact::MaskMismatch(tag, Some(cell));
            match symbol {
                MaskSymbol::Free => continue,
                MaskSymbol::Hidden => {
                    for v in grid.values() {
                        grounding.rule([Atom::Derived(Fact::Solution(cell, v))], [head]);
                    }
                }
                MaskSymbol::Visible => grounding.rule(
                    grid.values()
                        .map(|v| Atom::Absent(Fact::Solution(cell, v))),
                    [head],
                ),
                MaskSymbol::Given(v) => {
                    grounding.rule([Atom::Absent(Fact::Solution(cell, v))], [head]);
                }
            }
            grounding.rule([Atom::Derived(head)], [Fact::MaskMismatch(tag, None)]);
        }
    }

    fn requirement(&self, _scope: &Scope<'_>) -> Option<Condition> {
        Some(Condition::Derived(Fact::MaskMismatch(self.tag, None)))
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Grid};

    use super::*;
    use crate::{rule::ElementaryClosure, testing::RuleTester};

    fn pattern(s: &str) -> MaskPattern {
        s.parse().unwrap()
    }

    #[test]
    fn test_mask_derived() {
        let grid = Grid::regular(4).unwrap();
        // Elementary closure fills r1c4 and nothing else.
        let puzzle = "123. .... .... ....";
        RuleTester::new(grid.clone(), puzzle)
            .apply_all([
                ElementaryClosure::new().clone_box(),
                MaskDerived::new(pattern("***4 0000 ???? ????")).clone_box(),
            ])
            .assert_stable(true);
        RuleTester::new(grid, puzzle)
            .apply_all([
                ElementaryClosure::new().clone_box(),
                MaskDerived::new(pattern("***0 ???? ???? ????")).clone_box(),
            ])
            .assert_stable(false);
    }

    #[test]
    fn test_mask_not_derived() {
        let grid = Grid::regular(4).unwrap();
        let puzzle = "123. .... .... ....";
        let deviating = pattern("***0 ???? ???? ????");
        let tag = MaskTag::of(&deviating);
        RuleTester::new(grid.clone(), puzzle)
            .apply_all([
                ElementaryClosure::new().clone_box(),
                MaskNotDerived::new(deviating).clone_box(),
            ])
            .assert_derived(Fact::MaskMismatch(tag, Some(Cell::new(3, 0))))
            .assert_derived(Fact::MaskMismatch(tag, None))
            .assert_stable(true);
        RuleTester::new(grid, puzzle)
            .apply_all([
                ElementaryClosure::new().clone_box(),
                MaskNotDerived::new(pattern("**** ???? ???? ????")).clone_box(),
            ])
            .assert_stable(false);
    }

    #[test]
    fn test_supports_matching_size_only() {
        let rule = MaskDerived::new(pattern("????????????????"));
        assert!(rule.supports(&Grid::regular(4).unwrap()));
        assert!(!rule.supports(&Grid::regular(9).unwrap()));
    }
}

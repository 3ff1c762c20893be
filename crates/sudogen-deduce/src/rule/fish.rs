use sudogen_core::{Cell, GroupKind};

use crate::{
    Evaluation, FactKind, Grounding, Scope,
    rule::{BoxedRule, Rule, combinations, strikes, struck_in},
};

/// A basic fish over rows and columns.
///
/// If, in `size` full base lines, a value is struck everywhere outside
/// `size` cover lines of the crossing direction, each base line places the
/// value in a distinct cover line and the value can be struck from the rest
/// of the cover lines.
#[derive(Debug, Clone, Copy)]
pub struct Fish {
    size: usize,
    name: &'static str,
}

impl Fish {
    /// The two-line fish.
    #[must_use]
    pub const fn x_wing() -> Self {
        Self {
            size: 2,
            name: "X-Wing",
        }
    }

    /// The three-line fish.
    #[must_use]
    pub const fn swordfish() -> Self {
        Self {
            size: 3,
            name: "Swordfish",
        }
    }

    /// Returns the number of base lines.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Cells outside the cover lines in the base lines, and cells outside the
    /// base lines in the cover lines, for every base/cover choice.
    fn patterns(&self, scope: &Scope<'_>) -> Vec<(Vec<Cell>, Vec<Cell>)> {
        let mut patterns = Vec::new();
        for (base_kind, cover_kind) in [
            (GroupKind::Row, GroupKind::Column),
            (GroupKind::Column, GroupKind::Row),
        ] {
            let bases = scope
                .full_groups_of_kind(base_kind)
                .map(|(_, g)| g)
                .collect::<Vec<_>>();
            let covers = scope
                .groups()
                .filter(|(_, g)| g.kind() == cover_kind)
                .map(|(_, g)| g)
                .collect::<Vec<_>>();
            let cover_sets = combinations(&covers, self.size);
            for base_set in combinations(&bases, self.size) {
                for cover_set in &cover_sets {
                    let in_base = |c: &Cell| base_set.iter().any(|g| g.contains(*c));
                    let in_cover = |c: &Cell| cover_set.iter().any(|g| g.contains(*c));
                    let body = base_set
                        .iter()
                        .flat_map(|g| g.cells().iter().copied())
                        .filter(|c| !in_cover(c))
                        .collect::<Vec<_>>();
                    let mut heads = cover_set
                        .iter()
                        .flat_map(|g| g.cells().iter().copied())
                        .filter(|c| !in_base(c))
                        .collect::<Vec<_>>();
                    heads.sort_unstable();
                    heads.dedup();
                    if !heads.is_empty() {
                        patterns.push((body, heads));
                    }
                }
            }
        }
        patterns
    }
}

impl Rule for Fish {
    fn name(&self) -> &'static str {
        self.name
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        let scope = eval.scope();
        let facts = eval.facts();
        for (body, heads) in self.patterns(scope) {
            for value in scope.grid().values() {
                if body.iter().all(|c| facts.is_struck(*c, value)) {
                    eval.strike_all(heads.iter().copied(), value);
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let scope = grounding.scope();
        for (body, heads) in self.patterns(scope) {
            for value in scope.grid().values() {
                grounding.rule(
                    struck_in(body.iter().copied(), value),
                    strikes(heads.iter().copied(), value),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::Grid;

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_x_wing_on_rows() {
        // 2 in rows 1 and 3 only fits columns 1 and 4.
        let mut tester = RuleTester::new(Grid::latin(5).unwrap(), ".........................");
        for y in [0, 2] {
            for x in 1..4 {
                tester = tester.with_strikes(Cell::new(x, y), [2]);
            }
        }
        tester
            .apply(Fish::x_wing())
            .assert_struck(Cell::new(0, 1), [2])
            .assert_struck(Cell::new(4, 3), [2])
            .assert_not_struck(Cell::new(0, 0), [2])
            .assert_not_struck(Cell::new(1, 1), [2]);
    }

    #[test]
    fn test_swordfish_on_columns() {
        // 4 in columns 1, 2 and 3 only fits rows 1, 2 and 3.
        let mut tester = RuleTester::new(Grid::latin(5).unwrap(), ".........................");
        for x in 0..3 {
            for y in 3..5 {
                tester = tester.with_strikes(Cell::new(x, y), [4]);
            }
        }
        tester
            .apply(Fish::swordfish())
            .assert_struck(Cell::new(3, 0), [4])
            .assert_struck(Cell::new(4, 2), [4])
            .assert_not_struck(Cell::new(3, 3), [4]);
    }

    #[test]
    fn test_names() {
        assert_eq!(Fish::x_wing().name(), "X-Wing");
        assert_eq!(Fish::swordfish().size(), 3);
    }
}

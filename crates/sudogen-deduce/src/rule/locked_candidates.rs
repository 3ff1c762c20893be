use sudogen_core::Cell;

use crate::{
    Evaluation, FactKind, Grounding, Scope,
    rule::{BoxedRule, Rule, strikes, struck_in},
};

const NAME: &str = "Locked Candidates";

/// A rule that removes candidates using the intersection of two groups.
///
/// If a value is struck from every cell of a full group outside its
/// intersection with another group, the value must lie in the intersection
/// and can be struck from the rest of the other group. With rows, columns and
/// blocks this covers both "pointing" (block confines the value to a line)
/// and "claiming" (line confines the value to a block).
#[derive(Debug, Default, Clone, Copy)]
pub struct LockedCandidates;

impl LockedCandidates {
    /// Creates a new `LockedCandidates` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// An intersection of two active groups: the cells of the confining full
/// group outside the intersection, and the cells of the other group outside
/// the intersection.
struct Intersection {
    confining: Vec<Cell>,
    targets: Vec<Cell>,
}

fn intersections(scope: &Scope<'_>) -> Vec<Intersection> {
    let mut found = Vec::new();
    for (id1, g1) in scope.full_groups() {
        for (id2, g2) in scope.groups() {
            if id1 == id2 {
                continue;
            }
            let shared = g1.cells().iter().filter(|c| g2.contains(**c)).count();
            if shared < 2 {
                continue;
            }
            let confining = g1
                .cells()
                .iter()
                .copied()
                .filter(|c| !g2.contains(*c))
                .collect::<Vec<_>>();
            let targets = g2
                .cells()
                .iter()
                .copied()
                .filter(|c| !g1.contains(*c))
                .collect::<Vec<_>>();
            if !confining.is_empty() && !targets.is_empty() {
                found.push(Intersection { confining, targets });
            }
        }
    }
    found
}

impl Rule for LockedCandidates {
    fn name(&self) -> &'static str {
        NAME
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
        for intersection in intersections(scope) {
            for value in scope.grid().values() {
                if intersection
                    .confining
                    .iter()
                    .all(|c| facts.is_struck(*c, value))
                {
                    eval.strike_all(intersection.targets.iter().copied(), value);
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        let scope = grounding.scope();
        for intersection in intersections(scope) {
            for value in scope.grid().values() {
                grounding.rule(
                    struck_in(intersection.confining.iter().copied(), value),
                    strikes(intersection.targets.iter().copied(), value),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Grid, GroupKind};

    use super::*;
    use crate::{GroupFilter, testing::RuleTester};

    #[test]
    fn test_pointing() {
        // 1 in block 1 is confined to row 1.
        RuleTester::new(Grid::regular(4).unwrap(), "................")
            .with_strikes(Cell::new(0, 1), [1])
            .with_strikes(Cell::new(1, 1), [1])
            .apply(LockedCandidates::new())
            .assert_struck(Cell::new(2, 0), [1])
            .assert_struck(Cell::new(3, 0), [1])
            .assert_not_struck(Cell::new(0, 2), [1]);
    }

    #[test]
    fn test_claiming() {
        // 3 in row 1 is confined to block 2.
        RuleTester::new(Grid::regular(4).unwrap(), "................")
            .with_strikes(Cell::new(0, 0), [3])
            .with_strikes(Cell::new(1, 0), [3])
            .apply(LockedCandidates::new())
            .assert_struck(Cell::new(2, 1), [3])
            .assert_struck(Cell::new(3, 1), [3])
            .assert_not_struck(Cell::new(2, 2), [3]);
    }

    #[test]
    fn test_needs_active_block() {
        RuleTester::new(Grid::regular(4).unwrap(), "................")
            .with_groups(GroupFilter::Kinds(vec![GroupKind::Row, GroupKind::Column]))
            .with_strikes(Cell::new(0, 1), [1])
            .with_strikes(Cell::new(1, 1), [1])
            .apply(LockedCandidates::new())
            .assert_not_struck(Cell::new(2, 0), [1]);
    }
}

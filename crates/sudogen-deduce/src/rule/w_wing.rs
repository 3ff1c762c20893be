use std::collections::HashMap;

use sudogen_core::{Cell, GroupId, Value};
use tinyvec::TinyVec;

use crate::{
    Evaluation, Fact, FactKind, Grounding, Scope,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_confinements, derive_naked_sets, ground_confinements, ground_naked_sets},
        strikes,
    },
};

const NAME: &str = "W-Wing";

/// A rule joining two equal bivalue cells through a conjugate pair.
///
/// Two cells far apart both hold `x` or `z`. A full group confines `x` to
/// two cells, one seeing each bivalue cell. Both bivalue cells cannot be
/// `x`, since that would leave the conjugate pair without it, so one of them
/// is `z` and every cell seeing both loses `z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WWing;

impl WWing {
    /// Creates a new `WWing` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// The cells losing the second value when `a` and `b` hang off the pair
/// `(p, q)`, or `None` if the four cells do not form a W-Wing.
fn targets(scope: &Scope<'_>, a: Cell, b: Cell, p: Cell, q: Cell) -> Option<Vec<Cell>> {
    let grid = scope.grid();
    if a == b || [a, b].iter().any(|c| *c == p || *c == q) {
        return None;
    }
    if !scope.sees(a, p) || !scope.sees(b, q) {
        return None;
    }
    if grid.share_group(a, q) || grid.share_group(b, p) || grid.share_group(a, b) {
        return None;
    }
    let cells = scope.common_peers(&[a, b]);
    (!cells.is_empty()).then_some(cells)
}

impl Rule for WWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::NakedPair, FactKind::Conjugate, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_naked_sets(eval, 2);
        derive_confinements(eval, 2);

        let scope = eval.scope();
        let facts = eval.facts();
        let mut bivalue: HashMap<(Value, Value), TinyVec<[Cell; 4]>> = HashMap::new();
        for fact in facts.of_kind(FactKind::NakedPair) {
            if let Fact::NakedPair(cell, x, y) = *fact {
                bivalue.entry((x, y)).or_default().push(cell);
            }
        }

        let mut links = facts
            .of_kind(FactKind::Conjugate)
            .filter_map(|f| match *f {
                Fact::Conjugate(id, value, p, q) if scope.is_active_full(id) => Some((value, p, q)),
                _ => None,
            })
            .collect::<Vec<_>>();
        links.sort_unstable();
        links.dedup();

        for (x, p, q) in links {
            for z in scope.grid().values().filter(|z| *z != x) {
                let Some(cells) = bivalue.get(&if x < z { (x, z) } else { (z, x) }) else {
                    continue;
                };
                for &a in cells {
                    for &b in cells {
                        if let Some(targets) = targets(scope, a, b, p, q) {
                            eval.strike_all(targets, z);
                        }
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_naked_sets(grounding, 2);
        ground_confinements(grounding, 2);

        let scope = grounding.scope();
        let values = scope.grid().values().collect::<Vec<_>>();
        let groups = scope.full_groups().collect::<Vec<(GroupId, _)>>();
        for (id, group) in groups {
            for pair in combinations(group.cells(), 2) {
                let (p, q) = (pair[0], pair[1]);
                for &a in scope.peers(p) {
                    for &b in scope.peers(q) {
                        let Some(cells) = targets(scope, a, b, p, q) else {
                            continue;
                        };
                        for &x in &values {
                            for &z in values.iter().filter(|z| **z != x) {
                                grounding.rule(
                                    [
                                        Atom::Derived(Fact::conjugate(id, x, p, q)),
                                        Atom::Derived(Fact::naked_pair(a, x, z)),
                                        Atom::Derived(Fact::naked_pair(b, x, z)),
                                    ],
                                    strikes(cells.iter().copied(), z),
                                );
                            }
                        }
                    }
                }
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
    fn test_strikes_cells_seeing_both_wings() {
        // r1c1 and r2c3 are {1,2}. Row 4 confines 1 to c1 and c3, each end
        // seeing one wing, so r1c3 and r2c1 lose 2.
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(2, 1), [1, 2])
            .with_strikes(Cell::new(1, 3), [1])
            .with_strikes(Cell::new(3, 3), [1])
            .apply(WWing::new())
            .assert_struck(Cell::new(2, 0), [2])
            .assert_struck(Cell::new(0, 1), [2])
            .assert_not_struck(Cell::new(2, 0), [1])
            .assert_not_struck(Cell::new(1, 1), [2]);
    }

    #[test]
    fn test_needs_the_conjugate_pair() {
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(2, 1), [1, 2])
            .with_strikes(Cell::new(1, 3), [1])
            .apply(WWing::new())
            .assert_not_struck(Cell::new(2, 0), [2])
            .assert_not_struck(Cell::new(0, 1), [2]);
    }

    #[test]
    fn test_wings_must_hold_the_same_pair() {
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(2, 1), [1, 3])
            .with_strikes(Cell::new(1, 3), [1])
            .with_strikes(Cell::new(3, 3), [1])
            .apply(WWing::new())
            .assert_not_struck(Cell::new(2, 0), [2, 3])
            .assert_not_struck(Cell::new(0, 1), [2, 3]);
    }
}

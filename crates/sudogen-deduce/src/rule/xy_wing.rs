use sudogen_core::{Cell, Value};

use crate::{
    Evaluation, Fact, FactKind, Grounding, Scope,
    ground::Atom,
    rule::{
        BoxedRule, Rule,
        links::{derive_naked_sets, ground_naked_sets},
        strikes,
    },
};

const NAME: &str = "XY-Wing";

/// A rule built from a bivalue pivot and two bivalue wings.
///
/// The pivot holds `x` or `y`; one wing it sees holds `x` or `z`, the other
/// holds `y` or `z`. Whichever value the pivot takes, one of the wings must
/// be `z`, so `z` is struck from every cell seeing both wings.
///
/// The ground form enumerates every pivot, value triple and pair of pivot
/// peers, which grows quickly with the grid size.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyWing;

impl XyWing {
    /// Creates a new `XyWing` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn targets(scope: &Scope<'_>, pivot: Cell, a: Cell, b: Cell) -> Vec<Cell> {
    scope
        .common_peers(&[a, b])
        .into_iter()
        .filter(|c| *c != pivot)
        .collect()
}

impl Rule for XyWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::NakedPair, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_naked_sets(eval, 2);

        let scope = eval.scope();
        let facts = eval.facts();
        let mut pivots = facts
            .of_kind(FactKind::NakedPair)
            .filter_map(|f| match *f {
                Fact::NakedPair(p, x, y) => Some((p, x, y)),
                _ => None,
            })
            .collect::<Vec<_>>();
        pivots.sort_unstable();

        let values = scope.grid().values().collect::<Vec<Value>>();
        for (pivot, v1, v2) in pivots {
            for (x, y) in [(v1, v2), (v2, v1)] {
                for &z in values.iter().filter(|z| **z != x && **z != y) {
                    let peers = scope.peers(pivot);
                    let wings_x = peers
                        .iter()
                        .copied()
                        .filter(|a| facts.contains(&Fact::naked_pair(*a, x, z)));
                    for a in wings_x {
                        let wings_y = peers
                            .iter()
                            .copied()
                            .filter(|b| *b > a && facts.contains(&Fact::naked_pair(*b, y, z)));
                        for b in wings_y {
                            eval.strike_all(targets(scope, pivot, a, b), z);
                        }
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_naked_sets(grounding, 2);

        let scope = grounding.scope();
        let grid = scope.grid();
        let values = grid.values().collect::<Vec<Value>>();
        for pivot in grid.cells() {
            let peers = scope.peers(pivot);
            for (i, &a) in peers.iter().enumerate() {
                for &b in &peers[i + 1..] {
                    let cells = targets(scope, pivot, a, b);
                    if cells.is_empty() {
                        continue;
                    }
                    for &x in &values {
                        for &y in values.iter().filter(|y| **y != x) {
                            for &z in values.iter().filter(|z| **z != x && **z != y) {
                                grounding.rule(
                                    [
                                        Atom::Derived(Fact::naked_pair(pivot, x, y)),
                                        Atom::Derived(Fact::naked_pair(a, x, z)),
                                        Atom::Derived(Fact::naked_pair(b, y, z)),
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
    fn test_strikes_cell_seeing_both_wings() {
        // Pivot r1c1 {1,2}, wings r1c3 {1,3} and r3c1 {2,3}: r3c3 loses 3.
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(2, 0), [1, 3])
            .with_candidates(Cell::new(0, 2), [2, 3])
            .apply(XyWing::new())
            .assert_struck(Cell::new(2, 2), [3])
            .assert_not_struck(Cell::new(2, 2), [1, 2, 4])
            .assert_not_struck(Cell::new(1, 1), [3]);
    }

    #[test]
    fn test_wings_must_share_the_third_value() {
        RuleTester::new(Grid::latin(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2])
            .with_candidates(Cell::new(2, 0), [1, 3])
            .with_candidates(Cell::new(0, 2), [2, 4])
            .apply(XyWing::new())
            .assert_not_struck(Cell::new(2, 2), [3, 4]);
    }
}

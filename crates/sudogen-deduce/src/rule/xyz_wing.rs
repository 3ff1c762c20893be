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

const NAME: &str = "XYZ-Wing";

/// A rule built from a trivalue pivot and two bivalue wings.
///
/// The pivot holds `x`, `y` or `z`; the wings it sees hold `x` or `z` and
/// `y` or `z`. One of the three cells holds `z`, so every cell seeing all
/// three loses it.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyzWing;

impl XyzWing {
    /// Creates a new `XyzWing` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Splits a triple into `(x, y, z)` once for each choice of `z`.
fn splits(triple: [Value; 3]) -> [(Value, Value, Value); 3] {
    let [a, b, c] = triple;
    [(b, c, a), (a, c, b), (a, b, c)]
}

impl Rule for XyzWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::NakedPair, FactKind::NakedTriple, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_naked_sets(eval, 2);
        derive_naked_sets(eval, 3);

        let scope = eval.scope();
        let facts = eval.facts();
        let mut pivots = facts
            .of_kind(FactKind::NakedTriple)
            .filter_map(|f| match *f {
                Fact::NakedTriple(p, triple) => Some((p, triple)),
                _ => None,
            })
            .collect::<Vec<_>>();
        pivots.sort_unstable();

        for (pivot, triple) in pivots {
            let peers = scope.peers(pivot);
            for (x, y, z) in splits(triple) {
                for &a in peers {
                    if !facts.contains(&Fact::naked_pair(a, x, z)) {
                        continue;
                    }
                    for &b in peers {
                        if b != a && facts.contains(&Fact::naked_pair(b, y, z)) {
                            eval.strike_all(scope.common_peers(&[pivot, a, b]), z);
                        }
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_naked_sets(grounding, 2);
        ground_naked_sets(grounding, 3);

        let scope = grounding.scope();
        let grid = scope.grid();
        let values = grid.values().collect::<Vec<_>>();
        let triples = combinations(&values, 3);
        for pivot in grid.cells() {
            let peers = scope.peers(pivot);
            for &a in peers {
                for &b in peers.iter().filter(|b| **b != a) {
                    let cells: Vec<Cell> = scope.common_peers(&[pivot, a, b]);
                    if cells.is_empty() {
                        continue;
                    }
                    for triple in &triples {
                        let triple = [triple[0], triple[1], triple[2]];
                        for (x, y, z) in splits(triple) {
                            grounding.rule(
                                [
                                    Atom::Derived(Fact::NakedTriple(pivot, triple)),
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

#[cfg(test)]
mod tests {
    use sudogen_core::Grid;

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_strikes_cell_seeing_all_three() {
        RuleTester::new(Grid::regular(4).unwrap(), "................")
            .with_candidates(Cell::new(0, 0), [1, 2, 3])
            .with_candidates(Cell::new(1, 0), [1, 3])
            .with_candidates(Cell::new(0, 1), [2, 3])
            .apply(XyzWing::new())
            .assert_struck(Cell::new(1, 1), [3])
            .assert_not_struck(Cell::new(1, 1), [1, 2])
            .assert_not_struck(Cell::new(2, 0), [3]);
    }

    #[test]
    fn test_splits_cover_every_value() {
        let triple = [Value::new(1), Value::new(2), Value::new(3)];
        let zs = splits(triple).map(|(_, _, z)| z);
        assert_eq!(zs, triple);
    }
}

use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule,
        links::{derive_confinements, ground_confinements},
        strikes,
    },
};

const NAME: &str = "X-Chain";

/// A rule that follows alternating strong and weak links of one value.
///
/// A conjugate pair is a chain link: one of its two cells holds the value.
/// A link `(a, b)` extended by a weak link from `b` to a peer `c` and a
/// conjugate pair `(c, d)` yields the link `(a, d)`. Cells seeing both ends
/// of any link lose the value.
///
/// `ChainHalf(v, a, c)` records the half-step "`a` holds `v` or `c` does
/// not".
#[derive(Debug, Default, Clone, Copy)]
pub struct XChain;

impl XChain {
    /// Creates a new `XChain` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for XChain {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[
            FactKind::Conjugate,
            FactKind::ChainLink,
            FactKind::ChainHalf,
            FactKind::Strike,
        ]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_confinements(eval, 2);

        let scope = eval.scope();
        let facts = eval.facts();
        let mut derived = Vec::new();

        for fact in facts.of_kind(FactKind::Conjugate) {
            if let Fact::Conjugate(id, value, a, b) = *fact
                && scope.is_active_full(id)
            {
                derived.push(Fact::chain_link(value, a, b));
            }
        }

        for fact in facts.of_kind(FactKind::ChainLink) {
            let Fact::ChainLink(value, a, b) = *fact else {
                continue;
            };
            for (end, other) in [(a, b), (b, a)] {
                for &c in scope.peers(other).iter().filter(|c| **c != end) {
                    derived.push(Fact::ChainHalf(value, end, c));
                }
            }
            derived.extend(strikes(scope.common_peers(&[a, b]), value));
        }

        for fact in facts.of_kind(FactKind::ChainHalf) {
            let Fact::ChainHalf(value, a, c) = *fact else {
                continue;
            };
            if a == c {
                continue;
            }
            for id in scope.full_groups_of(c) {
                for &d in scope.grid().group(id).cells() {
                    if d != c && d != a && facts.contains(&Fact::conjugate(id, value, c, d)) {
                        derived.push(Fact::chain_link(value, a, d));
                    }
                }
            }
        }

        for fact in derived {
            eval.derive(fact);
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_confinements(grounding, 2);

        let scope = grounding.scope();
        let grid = scope.grid();
        let cells = grid.cells().collect::<Vec<_>>();

        for (id, group) in scope.full_groups() {
            for (i, &a) in group.cells().iter().enumerate() {
                for &b in &group.cells()[i + 1..] {
                    for value in grid.values() {
                        grounding.rule(
                            [Atom::Derived(Fact::conjugate(id, value, a, b))],
                            [Fact::chain_link(value, a, b)],
                        );
                    }
                }
            }
        }

        for (i, &a) in cells.iter().enumerate() {
            for &b in &cells[i + 1..] {
                let common = scope.common_peers(&[a, b]);
                for value in grid.values() {
                    let halves = [(a, b), (b, a)].into_iter().flat_map(|(end, other)| {
                        scope
                            .peers(other)
                            .iter()
                            .filter(move |c| **c != end)
                            .map(move |c| Fact::ChainHalf(value, end, *c))
                    });
                    grounding.rule(
                        [Atom::Derived(Fact::chain_link(value, a, b))],
                        halves.chain(strikes(common.iter().copied(), value)),
                    );
                }
            }
        }

        for &a in &cells {
            for &c in &cells {
                if a == c {
                    continue;
                }
                for id in scope.full_groups_of(c) {
                    for &d in grid.group(id).cells() {
                        if d == c || d == a {
                            continue;
                        }
                        for value in grid.values() {
                            grounding.rule(
                                [
                                    Atom::Derived(Fact::ChainHalf(value, a, c)),
                                    Atom::Derived(Fact::conjugate(id, value, c, d)),
                                ],
                                [Fact::chain_link(value, a, d)],
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
    use sudogen_core::{Cell, Grid, Value};

    use super::*;
    use crate::testing::RuleTester;

    #[test]
    fn test_conjugate_pair_strikes_common_peers() {
        // 1 in block 1 is confined to r1c1 and r2c2; r1c2 and r2c1 see both.
        RuleTester::new(Grid::regular(4).unwrap(), "................")
            .with_strikes(Cell::new(1, 0), [1])
            .with_strikes(Cell::new(0, 1), [1])
            .apply(XChain::new())
            .assert_derived(Fact::chain_link(Value::new(1), Cell::new(0, 0), Cell::new(1, 1)))
            .assert_not_struck(Cell::new(2, 2), [1]);
    }

    #[test]
    fn test_chain_of_two_conjugates() {
        // Row 1 confines 1 to c1/c4 and row 3 to c2/c4. Column 4 links the two
        // pairs weakly, so r1c1 or r3c2 holds 1.
        let mut tester = RuleTester::new(Grid::regular(4).unwrap(), "................");
        for x in [1, 2] {
            tester = tester.with_strikes(Cell::new(x, 0), [1]);
        }
        for x in [0, 2] {
            tester = tester.with_strikes(Cell::new(x, 2), [1]);
        }
        tester
            .apply(XChain::new())
            .assert_derived(Fact::chain_link(Value::new(1), Cell::new(0, 0), Cell::new(1, 2)))
            .assert_struck(Cell::new(1, 1), [1])
            .assert_struck(Cell::new(0, 3), [1]);
    }
}

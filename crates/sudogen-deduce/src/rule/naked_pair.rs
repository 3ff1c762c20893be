use sudogen_core::Value;

use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_naked_sets, ground_naked_sets},
        strikes,
    },
};

const NAME: &str = "Naked Pairs";

/// A rule that removes candidates using a naked pair within a group.
///
/// A "naked pair" occurs when two cells of a group can only hold the same
/// two values. Those two values can be eliminated from all other cells in
/// that group. The group need not be full.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedPairs;

impl NakedPairs {
    /// Creates a new `NakedPairs` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn value_pairs(values: &[Value]) -> impl Iterator<Item = (Value, Value)> + '_ {
    values
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| values[i + 1..].iter().map(move |b| (*a, *b)))
}

impl Rule for NakedPairs {
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
        let values = scope.grid().values().collect::<Vec<_>>();
        for (_, group) in scope.groups() {
            if group.len() < 3 {
                continue;
            }
            for (a, b) in value_pairs(&values) {
                let cells = group
                    .cells()
                    .iter()
                    .copied()
                    .filter(|c| facts.contains(&Fact::NakedPair(*c, a, b)))
                    .collect::<Vec<_>>();
                for pair in combinations(&cells, 2) {
                    let rest = group.cells().iter().copied().filter(|c| !pair.contains(c));
                    eval.strike_all(rest.clone(), a);
                    eval.strike_all(rest, b);
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_naked_sets(grounding, 2);

        let scope = grounding.scope();
        let values = scope.grid().values().collect::<Vec<_>>();
        for (_, group) in scope.groups() {
            for pair in combinations(group.cells(), 2) {
                for (a, b) in value_pairs(&values) {
                    let body = pair.iter().map(|c| Atom::Derived(Fact::NakedPair(*c, a, b)));
                    let rest = group.cells().iter().copied().filter(|c| !pair.contains(c));
                    grounding.rule(body, strikes(rest.clone(), a).chain(strikes(rest, b)));
                }
            }
        }
    }
}

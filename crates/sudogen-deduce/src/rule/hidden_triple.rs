use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_confinements, ground_confinements},
        strikes,
    },
};

const NAME: &str = "Hidden Triples";

/// A rule that removes candidates using a hidden triple within a full group.
///
/// When three values of a full group are confined to the same three cells,
/// those cells cannot hold any other value.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenTriples;

impl HiddenTriples {
    /// Creates a new `HiddenTriples` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for HiddenTriples {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Confined3, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_confinements(eval, 3);

        let scope = eval.scope();
        let facts = eval.facts();
        let grid = scope.grid();
        for (id, group) in scope.full_groups() {
            for cells in combinations(group.cells(), 3) {
                let cells = [cells[0], cells[1], cells[2]];
                let values = grid
                    .values()
                    .filter(|v| facts.contains(&Fact::Confined3(id, *v, cells)))
                    .collect::<Vec<_>>();
                for triple in combinations(&values, 3) {
                    for other in grid.values().filter(|w| !triple.contains(w)) {
                        eval.strike_all(cells, other);
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_confinements(grounding, 3);

        let scope = grounding.scope();
        let values = scope.grid().values().collect::<Vec<_>>();
        let triples = combinations(&values, 3);
        for (id, group) in scope.full_groups() {
            for cells in combinations(group.cells(), 3) {
                let cells = [cells[0], cells[1], cells[2]];
                for triple in &triples {
                    let body = triple
                        .iter()
                        .map(|v| Atom::Derived(Fact::Confined3(id, *v, cells)));
                    let heads = values
                        .iter()
                        .filter(|w| !triple.contains(w))
                        .flat_map(|w| strikes(cells, *w));
                    grounding.rule(body, heads);
                }
            }
        }
    }
}

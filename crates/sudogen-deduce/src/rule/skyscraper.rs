use std::collections::HashMap;

use sudogen_core::{Cell, GroupId, GroupKind, Value};
use tinyvec::TinyVec;

use crate::{
    Evaluation, Fact, FactKind, Grounding, Scope,
    ground::Atom,
    rule::{
        BoxedRule, Rule, combinations,
        links::{derive_confinements, ground_confinements},
        strikes,
    },
};

const NAME: &str = "Skyscraper";

/// A rule that combines two conjugate pairs in parallel lines.
///
/// Two rows (or two columns) each confine a value to two cells. If one end of
/// the first pair sees one end of the second, at most one of those ends holds
/// the value, so at least one of the two far ends does. Every cell seeing
/// both far ends loses the value.
#[derive(Debug, Default, Clone, Copy)]
pub struct Skyscraper;

impl Skyscraper {
    /// Creates a new `Skyscraper` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

const LINES: [GroupKind; 2] = [GroupKind::Row, GroupKind::Column];

/// Orientations `(near, far)` of a conjugate pair.
fn ends(pair: (Cell, Cell)) -> [(Cell, Cell); 2] {
    [(pair.0, pair.1), (pair.1, pair.0)]
}

/// The cells losing the value, or `None` if the pairs do not form a
/// skyscraper in this orientation.
fn targets(scope: &Scope<'_>, first: (Cell, Cell), second: (Cell, Cell)) -> Option<Vec<Cell>> {
    let (near1, far1) = first;
    let (near2, far2) = second;
    if !scope.sees(near1, near2) || scope.sees(far1, far2) {
        return None;
    }
    let targets = scope.common_peers(&[far1, far2]);
    (!targets.is_empty()).then_some(targets)
}

impl Rule for Skyscraper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[FactKind::Conjugate, FactKind::Strike]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_confinements(eval, 2);

        let scope = eval.scope();
        let facts = eval.facts();
        let mut pairs: HashMap<(GroupId, Value), TinyVec<[(Cell, Cell); 2]>> = HashMap::new();
        for fact in facts.of_kind(FactKind::Conjugate) {
            if let Fact::Conjugate(id, value, a, b) = *fact
                && scope.is_active_full(id)
            {
                pairs.entry((id, value)).or_default().push((a, b));
            }
        }

        for kind in LINES {
            let lines = scope
                .full_groups_of_kind(kind)
                .map(|(id, _)| id)
                .collect::<Vec<_>>();
            for ids in combinations(&lines, 2) {
                for value in scope.grid().values() {
                    let (Some(first), Some(second)) =
                        (pairs.get(&(ids[0], value)), pairs.get(&(ids[1], value)))
                    else {
                        continue;
                    };
                    for &p1 in first {
                        for &p2 in second {
                            for o1 in ends(p1) {
                                for o2 in ends(p2) {
                                    if let Some(cells) = targets(scope, o1, o2) {
                                        eval.strike_all(cells, value);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_confinements(grounding, 2);

        let scope = grounding.scope();
        for kind in LINES {
            let lines = scope.full_groups_of_kind(kind).collect::<Vec<_>>();
            for chosen in combinations(&lines, 2) {
                let ((id1, g1), (id2, g2)) = (chosen[0], chosen[1]);
                for p1 in combinations(g1.cells(), 2) {
                    for p2 in combinations(g2.cells(), 2) {
                        for o1 in ends((p1[0], p1[1])) {
                            for o2 in ends((p2[0], p2[1])) {
                                let Some(cells) = targets(scope, o1, o2) else {
                                    continue;
                                };
                                for value in scope.grid().values() {
                                    grounding.rule(
                                        [
                                            Atom::Derived(Fact::conjugate(id1, value, p1[0], p1[1])),
                                            Atom::Derived(Fact::conjugate(id2, value, p2[0], p2[1])),
                                        ],
                                        strikes(cells.iter().copied(), value),
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

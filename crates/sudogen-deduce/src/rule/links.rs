//! Composite facts shared by several rules: naked sets (a cell's candidates
//! fit in a small value set) and confinements (a value fits in a small cell
//! set of a full group).

use sudogen_core::{Cell, GroupId, Value};
use tinyvec::TinyVec;

use crate::{
    Evaluation, Fact, Grounding,
    ground::Atom,
    rule::{combinations, struck_in, supersets},
};

pub(crate) fn naked_set(cell: Cell, values: &[Value]) -> Option<Fact> {
    match *values {
        [a, b] => Some(Fact::naked_pair(cell, a, b)),
        [a, b, c] => Some(Fact::naked_triple(cell, [a, b, c])),
        _ => None,
    }
}

pub(crate) fn confinement(group: GroupId, value: Value, cells: &[Cell]) -> Option<Fact> {
    match *cells {
        [a, b] => Some(Fact::conjugate(group, value, a, b)),
        [a, b, c] => Some(Fact::confined3(group, value, [a, b, c])),
        _ => None,
    }
}

/// Derives the naked-set facts of size `k` for every cell.
pub(crate) fn derive_naked_sets(eval: &mut Evaluation<'_>, k: usize) {
    let grid = eval.scope().grid();
    let facts = eval.facts();
    let values = grid.values().collect::<Vec<_>>();
    for cell in grid.cells() {
        let candidates = facts.candidates(cell).collect::<Vec<_>>();
        for set in supersets(&candidates, &values, k) {
            if let Some(fact) = naked_set(cell, &set) {
                eval.derive(fact);
            }
        }
    }
}

pub(crate) fn ground_naked_sets(grounding: &mut Grounding<'_>, k: usize) {
    let grid = grounding.scope().grid();
    let values = grid.values().collect::<Vec<_>>();
    for cell in grid.cells() {
        for set in combinations(&values, k) {
            let Some(head) = naked_set(cell, &set) else {
                continue;
            };
            let body = values
                .iter()
                .filter(|v| !set.contains(v))
                .map(|v| Atom::Derived(Fact::Strike(cell, *v)));
            grounding.rule(body, [head]);
        }
    }
}

/// Derives the confinement facts of size `k` for every active full group.
pub(crate) fn derive_confinements(eval: &mut Evaluation<'_>, k: usize) {
    let scope = eval.scope();
    let facts = eval.facts();
    for (id, group) in scope.full_groups() {
        for value in scope.grid().values() {
            let open = group
                .cells()
                .iter()
                .copied()
                .filter(|c| !facts.is_struck(*c, value))
                .collect::<TinyVec<[Cell; 9]>>();
            for cells in supersets(&open, group.cells(), k) {
                if let Some(fact) = confinement(id, value, &cells) {
                    eval.derive(fact);
                }
            }
        }
    }
}

pub(crate) fn ground_confinements(grounding: &mut Grounding<'_>, k: usize) {
    let scope = grounding.scope();
    for (id, group) in scope.full_groups() {
        for cells in combinations(group.cells(), k) {
            for value in scope.grid().values() {
                let Some(head) = confinement(id, value, &cells) else {
                    continue;
                };
                let rest = group.cells().iter().copied().filter(|c| !cells.contains(c));
                grounding.rule(struck_in(rest, value), [head]);
            }
        }
    }
}

use std::collections::BTreeSet;

use sudogen_core::{Cell, GroupId, GroupKind};

use crate::{
    Evaluation, Fact, FactKind, Grounding, Scope,
    ground::Atom,
    rule::{
        BoxedRule, Rule,
        links::{derive_confinements, ground_confinements},
        struck_in,
    },
};

const NAME: &str = "Empty Rectangle";

/// A rule that bends a conjugate pair around a block.
///
/// Within a block, a value is struck everywhere except on one row and one
/// column through a hinge cell. Wherever it goes, it lies on one of those
/// two lines. Take a cell on the first line outside the block: if it held
/// the value, the block would have to use the second line, ruling the value
/// out on that line outside the block. A conjugate pair starting there then
/// puts the value at its other end, which must not see the first cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRectangle;

impl EmptyRectangle {
    /// Creates a new `EmptyRectangle` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// One value-independent instance: strike the value from `target` when it is
/// struck from every `cross_out` cell and `link` confines it to `start` and
/// `end`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Pattern {
    cross_out: Vec<Cell>,
    link: GroupId,
    start: Cell,
    end: Cell,
    target: Cell,
}

fn lines_of<'a>(scope: &'a Scope<'_>, cell: Cell) -> impl Iterator<Item = GroupId> + 'a {
    scope.groups_of(cell).filter(|id| {
        matches!(
            scope.grid().group(*id).kind(),
            GroupKind::Row | GroupKind::Column
        )
    })
}

fn patterns(scope: &Scope<'_>) -> BTreeSet<Pattern> {
    let grid = scope.grid();
    let mut found = BTreeSet::new();
    for (_, block) in scope.full_groups_of_kind(GroupKind::Block) {
        let outside = |c: Cell| !block.contains(c);
        for &hinge in block.cells() {
            let lines = lines_of(scope, hinge).collect::<Vec<_>>();
            for &first in &lines {
                for &second in lines.iter().filter(|l| **l != first) {
                    let (g1, g2) = (grid.group(first), grid.group(second));
                    let cross_out = block
                        .cells()
                        .iter()
                        .copied()
                        .filter(|c| !g1.contains(*c) && !g2.contains(*c))
                        .collect::<Vec<_>>();
                    for &target in g1.cells().iter().filter(|c| outside(**c)) {
                        for &start in g2.cells().iter().filter(|c| outside(**c)) {
                            if start == target {
                                continue;
                            }
                            for link in lines_of(scope, start).filter(|id| grid.is_full(*id)) {
                                for &end in grid.group(link).cells().iter().filter(|c| outside(**c)) {
                                    if end == start || end == target || end == hinge {
                                        continue;
                                    }
                                    if lines_of(scope, target).any(|l| grid.group(l).contains(end)) {
                                        found.insert(Pattern {
                                            cross_out: cross_out.clone(),
                                            link,
                                            start,
                                            end,
                                            target,
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    found
}

impl Rule for EmptyRectangle {
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
        for pattern in patterns(scope) {
            for value in scope.grid().values() {
                let linked = facts.contains(&Fact::conjugate(pattern.link, value, pattern.start, pattern.end));
                if linked && pattern.cross_out.iter().all(|c| facts.is_struck(*c, value)) {
                    eval.derive(Fact::Strike(pattern.target, value));
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_confinements(grounding, 2);

        let patterns = patterns(grounding.scope());
        let values = grounding.scope().grid().values().collect::<Vec<_>>();
        for pattern in patterns {
            for &value in &values {
                let link = Fact::conjugate(pattern.link, value, pattern.start, pattern.end);
                grounding.rule(
                    struck_in(pattern.cross_out.iter().copied(), value).chain([Atom::Derived(link)]),
                    [Fact::Strike(pattern.target, value)],
                );
            }
        }
    }
}

//! Meta rules: they derive nothing and only contribute to a stage's
//! stability predicate.

use sudogen_core::{Cell, Value};

use crate::{
    Condition, Fact, PuzzleAtom, Scope,
    rule::{BoxedRule, Rule},
};

macro_rules! meta_rule {
    ($(#[$attr:meta])* $ty:ident, $name:literal) => {
        $(#[$attr])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $ty;

        impl $ty {
            #[doc = concat!("Creates a new `", stringify!($ty), "` rule.")]
            #[must_use]
            pub const fn new() -> Self {
                Self
            }
        }

        impl Rule for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn clone_box(&self) -> BoxedRule {
                Box::new(*self)
            }

            fn requirement(&self, scope: &Scope<'_>) -> Option<Condition> {
                Some(Self::condition(scope))
            }
        }
    };
}

meta_rule!(
    /// Every cell has a derived solution.
    Solved,
    "Solved"
);

meta_rule!(
    /// Some cell has no derived solution.
    Unsolved,
    "Unsolved"
);

meta_rule!(
    /// No hidden cell has a derived solution.
    NoHiddenDerived,
    "No Hidden Derived"
);

meta_rule!(
    /// Always holds. Useful for stages that only feed later stages.
    Trivial,
    "Trivial"
);

meta_rule!(
    /// No hidden cell is left with its true value as the only unstruck
    /// candidate.
    ///
    /// Together with a stage that does not include naked singles, this
    /// asks that the stage's closure contain no pending naked single.
    ClosedUnderNakedSingles,
    "Closed Under Naked Singles"
);

meta_rule!(
    /// No hidden cell is the last place left for its true value in an active
    /// full group.
    ClosedUnderHiddenSingles,
    "Closed Under Hidden Singles"
);

meta_rule!(
    /// The output cell's true value is derived.
    OutputCellDerivable,
    "Output Cell Derivable"
);

meta_rule!(
    /// The output cell's true value is not derived.
    OutputCellNotDerivable,
    "Output Cell Not Derivable"
);

meta_rule!(
    /// The output decoy is not struck from the output cell.
    OutputDecoyNotRuledOut,
    "Output Decoy Not Ruled Out"
);

meta_rule!(
    /// The highlighted strike is derived.
    HighlightStrikeDerivable,
    "Highlight Strike Derivable"
);

meta_rule!(
    /// The highlighted strike is not derived.
    HighlightStrikeNotDerivable,
    "Highlight Strike Not Derivable"
);

/// None of a fixed list of facts is derived.
///
/// Useful for ruling out an unwanted shortcut: a stage whose closure must
/// not contain a particular conjugate pair or placement.
#[derive(Debug, Clone, Default)]
pub struct ForbidDerived {
    facts: Vec<Fact>,
}

impl ForbidDerived {
    /// Creates a rule forbidding every fact in `facts`.
    #[must_use]
    pub fn new<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = Fact>,
    {
        Self {
            facts: facts.into_iter().collect(),
        }
    }
}

impl Rule for ForbidDerived {
    fn name(&self) -> &'static str {
        "Forbid Derived"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(self.clone())
    }

    fn requirement(&self, _scope: &Scope<'_>) -> Option<Condition> {
        Some(Condition::all(self.facts.iter().map(|f| Condition::NotDerived(*f))))
    }
}

fn solved(scope: &Scope<'_>) -> Condition {
    let grid = scope.grid();
    Condition::all(grid.cells().map(|cell| {
        Condition::any(
            grid.values()
                .map(|v| Condition::Derived(Fact::Solution(cell, v))),
        )
    }))
}

/// `NotPuzzle(atom)`: a guard that makes a conjunct hold vacuously outside
/// the cells it talks about.
fn unless(atom: PuzzleAtom) -> Condition {
    Condition::NotPuzzle(atom)
}

impl Solved {
    fn condition(scope: &Scope<'_>) -> Condition {
        solved(scope)
    }
}

impl Unsolved {
    fn condition(scope: &Scope<'_>) -> Condition {
        solved(scope).negate()
    }
}

impl NoHiddenDerived {
    fn condition(scope: &Scope<'_>) -> Condition {
        let grid = scope.grid();
        Condition::all(grid.cells().map(|cell| {
            Condition::any([
                unless(PuzzleAtom::Hidden(cell)),
                Condition::all(
                    grid.values()
                        .map(|v| Condition::NotDerived(Fact::Solution(cell, v))),
                ),
            ])
        }))
    }
}

impl Trivial {
    fn condition(_scope: &Scope<'_>) -> Condition {
        Condition::True
    }
}

impl ClosedUnderNakedSingles {
    fn condition(scope: &Scope<'_>) -> Condition {
        let grid = scope.grid();
        Condition::all(grid.cells().flat_map(|cell| {
            grid.values().map(move |value| {
                Condition::any(
                    [
                        unless(PuzzleAtom::Hidden(cell)),
                        unless(PuzzleAtom::Solution(cell, value)),
                    ]
                    .into_iter()
                    .chain(
                        grid.values()
                            .filter(move |w| *w != value)
                            .map(move |w| Condition::NotDerived(Fact::Strike(cell, w))),
                    ),
                )
            })
        }))
    }
}

impl ClosedUnderHiddenSingles {
    fn condition(scope: &Scope<'_>) -> Condition {
        let grid = scope.grid();
        let mut conditions = Vec::new();
        for (_, group) in scope.full_groups() {
            for &cell in group.cells() {
                for value in grid.values() {
                    let others = group
                        .cells()
                        .iter()
                        .filter(|c| **c != cell)
                        .map(|c| Condition::NotDerived(Fact::Strike(*c, value)));
                    conditions.push(Condition::any(
                        [
                            unless(PuzzleAtom::Hidden(cell)),
                            unless(PuzzleAtom::Solution(cell, value)),
                        ]
                        .into_iter()
                        .chain(others),
                    ));
                }
            }
        }
        Condition::all(conditions)
    }
}

fn for_output_cell<F>(scope: &Scope<'_>, leaf: F) -> Condition
where
    F: Fn(Cell, Value) -> Condition,
{
    let grid = scope.grid();
    let mut conditions = Vec::new();
    for cell in grid.cells() {
        for value in grid.values() {
            conditions.push(Condition::any([
                unless(PuzzleAtom::OutputCell(cell)),
                unless(PuzzleAtom::Solution(cell, value)),
                leaf(cell, value),
            ]));
        }
    }
    Condition::all(conditions)
}

impl OutputCellDerivable {
    fn condition(scope: &Scope<'_>) -> Condition {
        for_output_cell(scope, |cell, value| {
            Condition::Derived(Fact::Solution(cell, value))
        })
    }
}

impl OutputCellNotDerivable {
    fn condition(scope: &Scope<'_>) -> Condition {
        for_output_cell(scope, |cell, value| {
            Condition::NotDerived(Fact::Solution(cell, value))
        })
    }
}

impl OutputDecoyNotRuledOut {
    fn condition(scope: &Scope<'_>) -> Condition {
        let grid = scope.grid();
        Condition::all(grid.cells().flat_map(|cell| {
            grid.values().map(move |decoy| {
                Condition::any([
                    unless(PuzzleAtom::OutputCell(cell)),
                    unless(PuzzleAtom::OutputDecoy(decoy)),
                    Condition::NotDerived(Fact::Strike(cell, decoy)),
                ])
            })
        }))
    }
}

fn for_highlight<F>(scope: &Scope<'_>, leaf: F) -> Condition
where
    F: Fn(Fact) -> Condition,
{
    let grid = scope.grid();
    let leaf = &leaf;
    Condition::all(grid.cells().flat_map(|cell| {
        grid.values().map(move |value| {
            Condition::any([
                unless(PuzzleAtom::HighlightStrike(cell, value)),
                leaf(Fact::Strike(cell, value)),
            ])
        })
    }))
}

impl HighlightStrikeDerivable {
    fn condition(scope: &Scope<'_>) -> Condition {
        for_highlight(scope, Condition::Derived)
    }
}

impl HighlightStrikeNotDerivable {
    fn condition(scope: &Scope<'_>) -> Condition {
        for_highlight(scope, Condition::NotDerived)
    }
}

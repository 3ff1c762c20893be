//! Simple coloring: conjugate pairs of one value are joined into chains
//! whose cells alternate between two colors. Exactly one color holds the
//! value.

use crate::{
    Evaluation, Fact, FactKind, Grounding,
    ground::Atom,
    rule::{
        BoxedRule, Rule,
        links::{derive_confinements, ground_confinements},
        strikes,
    },
};

fn derive_colors(eval: &mut Evaluation<'_>) {
    derive_confinements(eval, 2);

    let scope = eval.scope();
    let facts = eval.facts();
    let mut derived = Vec::new();

    for fact in facts.of_kind(FactKind::Conjugate) {
        if let Fact::Conjugate(id, value, a, b) = *fact
            && scope.is_active_full(id)
        {
            derived.push(Fact::opposite_color(value, a, b));
        }
    }

    for kind in [FactKind::OppositeColor, FactKind::SameColor] {
        for fact in facts.of_kind(kind) {
            let (Fact::OppositeColor(value, x, y) | Fact::SameColor(value, x, y)) = *fact else {
                continue;
            };
            for (a, b) in [(x, y), (y, x)] {
                for id in scope.full_groups_of(b) {
                    for &c in scope.grid().group(id).cells() {
                        if c == a || c == b || !facts.contains(&Fact::conjugate(id, value, b, c)) {
                            continue;
                        }
                        derived.push(match kind {
                            FactKind::OppositeColor => Fact::same_color(value, a, c),
                            _ => Fact::opposite_color(value, a, c),
                        });
                    }
                }
            }
        }
    }

    for fact in derived {
        eval.derive(fact);
    }
}

fn ground_colors(grounding: &mut Grounding<'_>) {
    ground_confinements(grounding, 2);

    let scope = grounding.scope();
    let grid = scope.grid();

    for (id, group) in scope.full_groups() {
        for (i, &a) in group.cells().iter().enumerate() {
            for &b in &group.cells()[i + 1..] {
                for value in grid.values() {
                    grounding.rule(
                        [Atom::Derived(Fact::conjugate(id, value, a, b))],
                        [Fact::opposite_color(value, a, b)],
                    );
                }
            }
        }
    }

    for a in grid.cells() {
        for b in grid.cells().filter(|b| *b != a) {
            for id in scope.full_groups_of(b) {
                for &c in grid.group(id).cells() {
                    if c == a || c == b {
                        continue;
                    }
                    for value in grid.values() {
                        let link = Atom::Derived(Fact::conjugate(id, value, b, c));
                        grounding.rule(
                            [Atom::Derived(Fact::opposite_color(value, a, b)), link],
                            [Fact::same_color(value, a, c)],
                        );
                        grounding.rule(
                            [Atom::Derived(Fact::same_color(value, a, b)), link],
                            [Fact::opposite_color(value, a, c)],
                        );
                    }
                }
            }
        }
    }
}

/// A coloring rule that strikes the value from cells seeing both colors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorTrap;

impl ColorTrap {
    /// Creates a new `ColorTrap` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ColorTrap {
    fn name(&self) -> &'static str {
        "Color Trap"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[
            FactKind::Conjugate,
            FactKind::SameColor,
            FactKind::OppositeColor,
            FactKind::Strike,
        ]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_colors(eval);

        let scope = eval.scope();
        for fact in eval.facts().of_kind(FactKind::OppositeColor) {
            if let Fact::OppositeColor(value, a, b) = *fact {
                eval.strike_all(scope.common_peers(&[a, b]), value);
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_colors(grounding);

        let scope = grounding.scope();
        let cells = scope.grid().cells().collect::<Vec<_>>();
        for (i, &a) in cells.iter().enumerate() {
            for &b in &cells[i + 1..] {
                let common = scope.common_peers(&[a, b]);
                if common.is_empty() {
                    continue;
                }
                for value in scope.grid().values() {
                    grounding.rule(
                        [Atom::Derived(Fact::opposite_color(value, a, b))],
                        strikes(common.iter().copied(), value),
                    );
                }
            }
        }
    }
}

/// A coloring rule that rejects a color once it contradicts itself or the
/// grid.
///
/// - Two cells of the same color that see each other cannot both hold the
///   value, so neither does.
/// - A struck cell strikes its whole color.
/// - A struck cell places the value in every cell of the opposite color.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorWrap;

impl ColorWrap {
    /// Creates a new `ColorWrap` rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ColorWrap {
    fn name(&self) -> &'static str {
        "Color Wrap"
    }

    fn clone_box(&self) -> BoxedRule {
        Box::new(*self)
    }

    fn produces(&self) -> &'static [FactKind] {
        &[
            FactKind::Conjugate,
            FactKind::SameColor,
            FactKind::OppositeColor,
            FactKind::Strike,
            FactKind::Solution,
        ]
    }

    fn apply(&self, eval: &mut Evaluation<'_>) {
        derive_colors(eval);

        let scope = eval.scope();
        let facts = eval.facts();
        for kind in [FactKind::SameColor, FactKind::OppositeColor] {
            for fact in facts.of_kind(kind) {
                let (Fact::SameColor(value, x, y) | Fact::OppositeColor(value, x, y)) = *fact
                else {
                    continue;
                };
                let same = kind == FactKind::SameColor;
                if same && scope.sees(x, y) {
                    eval.strike_all([x, y], value);
                }
                for (a, c) in [(x, y), (y, x)] {
                    if !facts.is_struck(a, value) {
                        continue;
                    }
                    if same {
                        eval.derive(Fact::Strike(c, value));
                    } else {
                        eval.derive(Fact::Solution(c, value));
                    }
                }
            }
        }
    }

    fn ground(&self, grounding: &mut Grounding<'_>) {
        ground_colors(grounding);

        let scope = grounding.scope();
        let grid = scope.grid();
        for a in grid.cells() {
            for c in grid.cells().filter(|c| *c != a) {
                for value in grid.values() {
                    let same = Fact::same_color(value, a, c);
                    if a < c && scope.sees(a, c) {
                        grounding.rule([Atom::Derived(same)], strikes([a, c], value));
                    }
                    let struck = Atom::Derived(Fact::Strike(a, value));
                    grounding.rule([struck, Atom::Derived(same)], [Fact::Strike(c, value)]);
                    grounding.rule(
                        [struck, Atom::Derived(Fact::opposite_color(value, a, c))],
                        [Fact::Solution(c, value)],
                    );
                }
            }
        }
    }
}

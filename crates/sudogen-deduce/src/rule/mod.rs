//! The rule catalog.
//!
//! Each rule is a unit-like struct implementing [`Rule`]. A rule is written
//! twice, in two shapes that must agree: [`Rule::apply`] matches the rule's
//! guard against a concrete fact store, and [`Rule::ground`] enumerates its
//! ground instances over a scope for symbolic evaluation. Meta rules add a
//! stability [`Condition`] through [`Rule::requirement`] instead of (or in
//! addition to) deriving facts.

use std::fmt::Debug;

use sudogen_core::{Cell, Grid, Value};

pub use self::{
    coloring::{ColorTrap, ColorWrap},
    elementary::ElementaryClosure,
    empty_rectangle::EmptyRectangle,
    fish::Fish,
    hidden_pair::HiddenPairs,
    hidden_single::HiddenSingles,
    hidden_triple::HiddenTriples,
    interface::{RevealHighlightStrike, RevealInputCell, RevealOutputValueOrDecoy},
    locked_candidates::LockedCandidates,
    mask::{MaskDerived, MaskNotDerived},
    naked_pair::NakedPairs,
    naked_single::NakedSingles,
    naked_triple::NakedTriples,
    skyscraper::Skyscraper,
    stability::{
        ClosedUnderHiddenSingles, ClosedUnderNakedSingles, ForbidDerived,
        HighlightStrikeDerivable, HighlightStrikeNotDerivable, NoHiddenDerived,
        OutputCellDerivable, OutputCellNotDerivable, OutputDecoyNotRuledOut, Solved, Trivial,
        Unsolved,
    },
    w_wing::WWing,
    x_chain::XChain,
    xy_wing::XyWing,
    xyz_wing::XyzWing,
};
use crate::{Condition, Fact, FactKind, FactStore, Grounding, PuzzleView, Scope, ground::Atom};

mod coloring;
mod elementary;
mod empty_rectangle;
mod fish;
mod hidden_pair;
mod hidden_single;
mod hidden_triple;
mod interface;
mod links;
mod locked_candidates;
mod mask;
mod naked_pair;
mod naked_single;
mod naked_triple;
mod skyscraper;
mod stability;
mod w_wing;
mod x_chain;
mod xy_wing;
mod xyz_wing;

/// Evaluation layer of a rule.
///
/// Rules reading the *absence* of a fact must sit in a strictly higher
/// stratum than every rule producing that fact, so that absence is final
/// when they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stratum {
    /// Ordinary deductions.
    Inference,
    /// Rules judging the completed inference closure.
    Verdict,
}

impl Stratum {
    /// All strata in evaluation order.
    pub const ALL: [Self; 2] = [Self::Inference, Self::Verdict];
}

/// Returns every solving technique, ordered from easiest to hardest.
///
/// Interface reveal rules and meta rules are not included; add them to a
/// stage explicitly.
///
/// # Examples
///
/// ```
/// use sudogen_deduce::rule;
///
/// let rules = rule::all_rules();
/// assert_eq!(rules[0].name(), "Elementary Closure");
/// assert!(rules.iter().any(|r| r.name() == "X-Wing"));
/// ```
#[must_use]
pub fn all_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(ElementaryClosure::new()),
        Box::new(NakedSingles::new()),
        Box::new(HiddenSingles::new()),
        Box::new(LockedCandidates::new()),
        Box::new(NakedPairs::new()),
        Box::new(HiddenPairs::new()),
        Box::new(NakedTriples::new()),
        Box::new(HiddenTriples::new()),
        Box::new(Fish::x_wing()),
        Box::new(Fish::swordfish()),
        Box::new(Skyscraper::new()),
        Box::new(EmptyRectangle::new()),
        Box::new(XyWing::new()),
        Box::new(XyzWing::new()),
        Box::new(WWing::new()),
        Box::new(XChain::new()),
        Box::new(ColorTrap::new()),
        Box::new(ColorWrap::new()),
    ]
}

/// Returns the elementary closure alone.
#[must_use]
pub fn elementary_rules() -> Vec<BoxedRule> {
    vec![Box::new(ElementaryClosure::new())]
}

/// Returns the elementary closure with naked and hidden singles.
///
/// This set stays fixed as the catalog grows, which makes it a stable
/// baseline for "easy" strategies.
#[must_use]
pub fn singles_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(ElementaryClosure::new()),
        Box::new(NakedSingles::new()),
        Box::new(HiddenSingles::new()),
    ]
}

/// Looks up a technique, interface rule or parameterless meta rule by name.
///
/// Matching ignores case and any character that is not a letter or digit,
/// so `"naked_pairs"`, `"Naked Pairs"` and `"naked-pairs"` are equivalent.
///
/// ```
/// use sudogen_deduce::rule;
///
/// assert_eq!(rule::rule_by_name("hidden_singles").unwrap().name(), "Hidden Singles");
/// assert_eq!(rule::rule_by_name("solved").unwrap().name(), "Solved");
/// assert!(rule::rule_by_name("bowman bingo").is_none());
/// ```
#[must_use]
pub fn rule_by_name(name: &str) -> Option<BoxedRule> {
    fn normalize(name: &str) -> String {
        name.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    let wanted = normalize(name);
    let extra: Vec<BoxedRule> = vec![
        Box::new(RevealInputCell::new()),
        Box::new(RevealOutputValueOrDecoy::new()),
        Box::new(RevealHighlightStrike::new()),
        Box::new(Solved::new()),
        Box::new(Unsolved::new()),
        Box::new(NoHiddenDerived::new()),
        Box::new(Trivial::new()),
        Box::new(ClosedUnderNakedSingles::new()),
        Box::new(ClosedUnderHiddenSingles::new()),
        Box::new(OutputCellDerivable::new()),
        Box::new(OutputCellNotDerivable::new()),
        Box::new(OutputDecoyNotRuledOut::new()),
        Box::new(HighlightStrikeDerivable::new()),
        Box::new(HighlightStrikeNotDerivable::new()),
    ];
    all_rules()
        .into_iter()
        .chain(extra)
        .find(|r| normalize(r.name()) == wanted)
}

/// A named inference rule or stability condition.
pub trait Rule: Debug + Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &'static str;

    /// Returns a boxed clone of the rule.
    fn clone_box(&self) -> BoxedRule;

    /// Returns the stratum the rule is evaluated in.
    fn stratum(&self) -> Stratum {
        Stratum::Inference
    }

    /// Returns the kinds of fact the rule may derive.
    fn produces(&self) -> &'static [FactKind] {
        &[]
    }

    /// Returns the kinds of fact whose absence the rule reads.
    fn negates(&self) -> &'static [FactKind] {
        &[]
    }

    /// Returns `true` if the rule can be used on `grid`.
    fn supports(&self, grid: &Grid) -> bool {
        let _ = grid;
        true
    }

    /// Derives every consequence whose guard holds on the current facts.
    ///
    /// Consequences are collected in `eval` and inserted by the caller, so a
    /// single call sees a snapshot of the store.
    fn apply(&self, eval: &mut Evaluation<'_>) {
        let _ = eval;
    }

    /// Emits the rule's ground instances over the grounding scope.
    fn ground(&self, grounding: &mut Grounding<'_>) {
        let _ = grounding;
    }

    /// Returns the rule's contribution to the stage's stability predicate.
    fn requirement(&self, scope: &Scope<'_>) -> Option<Condition> {
        let _ = scope;
        None
    }
}

/// A boxed rule.
pub type BoxedRule = Box<dyn Rule>;

impl Clone for BoxedRule {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The inputs of one [`Rule::apply`] call and the facts it derives.
#[derive(Debug)]
pub struct Evaluation<'a> {
    scope: &'a Scope<'a>,
    puzzle: &'a PuzzleView<'a>,
    facts: &'a FactStore,
    derived: Vec<Fact>,
}

impl<'a> Evaluation<'a> {
    /// Starts an evaluation against a snapshot of `facts`.
    #[must_use]
    pub fn new(scope: &'a Scope<'a>, puzzle: &'a PuzzleView<'a>, facts: &'a FactStore) -> Self {
        Self {
            scope,
            puzzle,
            facts,
            derived: Vec::new(),
        }
    }

    /// Returns the stage scope.
    #[must_use]
    pub fn scope(&self) -> &'a Scope<'a> {
        self.scope
    }

    /// Returns the puzzle view.
    #[must_use]
    pub fn puzzle(&self) -> &'a PuzzleView<'a> {
        self.puzzle
    }

    /// Returns the fact snapshot.
    #[must_use]
    pub fn facts(&self) -> &'a FactStore {
        self.facts
    }

    /// Records a consequence. Facts already in the snapshot are ignored.
    pub fn derive(&mut self, fact: Fact) {
        if !self.facts.contains(&fact) {
            self.derived.push(fact);
        }
    }

    /// Records `Strike(cell, value)` for every cell.
    pub fn strike_all<I>(&mut self, cells: I, value: Value)
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in cells {
            self.derive(Fact::Strike(cell, value));
        }
    }

    /// Returns the derived facts.
    #[must_use]
    pub fn into_derived(self) -> Vec<Fact> {
        self.derived
    }
}

/// All `k`-element subsets of `items`, preserving order.
pub(crate) fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    fn go<T: Copy>(items: &[T], k: usize, start: usize, current: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..items.len() {
            if items.len() - i < k - current.len() {
                break;
            }
            current.push(items[i]);
            go(items, k, i + 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    go(items, k, 0, &mut Vec::with_capacity(k), &mut out);
    out
}

/// All sorted `k`-element subsets of `universe` that contain every element of
/// `required`.
///
/// A cell whose candidates are `{a}` lies in every naked pair `{a, x}`; this
/// enumerates exactly the subsets a ground rule over "all other values
/// struck" would fire for.
pub(crate) fn supersets<T: Copy + Ord>(required: &[T], universe: &[T], k: usize) -> Vec<Vec<T>> {
    if required.len() > k {
        return Vec::new();
    }
    let rest = universe
        .iter()
        .copied()
        .filter(|x| !required.contains(x))
        .collect::<Vec<_>>();
    combinations(&rest, k - required.len())
        .into_iter()
        .map(|extra| {
            let mut set = required.to_vec();
            set.extend(extra);
            set.sort_unstable();
            set
        })
        .collect()
}

/// `Derived(Strike(cell, value))` atoms for every cell.
pub(crate) fn struck_in<I>(cells: I, value: Value) -> impl Iterator<Item = Atom>
where
    I: IntoIterator<Item = Cell>,
{
    cells
        .into_iter()
        .map(move |c| Atom::Derived(Fact::Strike(c, value)))
}

/// `Strike(cell, value)` heads for every cell.
pub(crate) fn strikes<I>(cells: I, value: Value) -> impl Iterator<Item = Fact>
where
    I: IntoIterator<Item = Cell>,
{
    cells.into_iter().map(move |c| Fact::Strike(c, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations() {
        assert_eq!(combinations(&[1, 2, 3], 2), [vec![1, 2], vec![1, 3], vec![2, 3]]);
        assert_eq!(combinations(&[1, 2], 0), [Vec::<i32>::new()]);
        assert!(combinations(&[1, 2], 3).is_empty());
    }

    #[test]
    fn test_supersets() {
        assert_eq!(supersets(&[2], &[1, 2, 3], 2), [vec![1, 2], vec![2, 3]]);
        assert_eq!(supersets(&[1, 3], &[1, 2, 3], 2), [vec![1, 3]]);
        assert!(supersets(&[1, 2, 3], &[1, 2, 3], 2).is_empty());
        assert_eq!(supersets::<i32>(&[], &[1, 2, 3], 2).len(), 3);
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names = all_rules().iter().map(|r| r.name()).collect::<Vec<_>>();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
        assert!(rule_by_name("NAKED-PAIRS").is_some());
        assert!(rule_by_name("x wing").is_some());
    }
}

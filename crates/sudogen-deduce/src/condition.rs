//! Stability conditions over a stage closure.

use crate::{Fact, FactStore, PuzzleAtom, PuzzleView};

/// A boolean condition over derived facts and puzzle atoms, kept in negation
/// normal form.
///
/// Meta rules contribute conditions; a stage is *stable* when the
/// conjunction of its rules' conditions holds on its closure. The
/// synthesizer compiles `Derived` leaves against an under-approximation of
/// the closure and `NotDerived` leaves against an over-approximation, which
/// is sound precisely because negation only appears at the leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Always holds.
    True,
    /// Never holds.
    False,
    /// The fact is in the closure.
    Derived(Fact),
    /// The fact is not in the closure.
    NotDerived(Fact),
    /// The puzzle atom holds.
    Puzzle(PuzzleAtom),
    /// The puzzle atom does not hold.
    NotPuzzle(PuzzleAtom),
    /// Every operand holds.
    All(Vec<Condition>),
    /// Some operand holds.
    Any(Vec<Condition>),
}

impl Condition {
    /// The conjunction of `conditions`, flattened and simplified.
    #[must_use]
    pub fn all<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut operands = Vec::new();
        for condition in conditions {
            match condition {
                Self::True => {}
                Self::False => return Self::False,
                Self::All(inner) => operands.extend(inner),
                other => operands.push(other),
            }
        }
        match operands.len() {
            0 => Self::True,
            1 => operands.pop().unwrap_or(Self::True),
            _ => Self::All(operands),
        }
    }

    /// The disjunction of `conditions`, flattened and simplified.
    #[must_use]
    pub fn any<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut operands = Vec::new();
        for condition in conditions {
            match condition {
                Self::False => {}
                Self::True => return Self::True,
                Self::Any(inner) => operands.extend(inner),
                other => operands.push(other),
            }
        }
        match operands.len() {
            0 => Self::False,
            1 => operands.pop().unwrap_or(Self::False),
            _ => Self::Any(operands),
        }
    }

    /// The negation, pushed down to the leaves.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Derived(f) => Self::NotDerived(f),
            Self::NotDerived(f) => Self::Derived(f),
            Self::Puzzle(a) => Self::NotPuzzle(a),
            Self::NotPuzzle(a) => Self::Puzzle(a),
            Self::All(cs) => Self::any(cs.into_iter().map(Self::negate)),
            Self::Any(cs) => Self::all(cs.into_iter().map(Self::negate)),
        }
    }

    /// Evaluates the condition on a concrete closure.
    #[must_use]
    pub fn eval(&self, facts: &FactStore, puzzle: &PuzzleView<'_>) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Derived(f) => facts.contains(f),
            Self::NotDerived(f) => !facts.contains(f),
            Self::Puzzle(a) => puzzle.holds(*a),
            Self::NotPuzzle(a) => !puzzle.holds(*a),
            Self::All(cs) => cs.iter().all(|c| c.eval(facts, puzzle)),
            Self::Any(cs) => cs.iter().any(|c| c.eval(facts, puzzle)),
        }
    }

    /// Returns whether the condition mentions `Derived` and `NotDerived`
    /// leaves, respectively.
    #[must_use]
    pub fn leaf_polarities(&self) -> (bool, bool) {
        match self {
            Self::Derived(_) => (true, false),
            Self::NotDerived(_) => (false, true),
            Self::True | Self::False | Self::Puzzle(_) | Self::NotPuzzle(_) => (false, false),
            Self::All(cs) | Self::Any(cs) => cs.iter().fold((false, false), |(p, n), c| {
                let (cp, cn) = c.leaf_polarities();
                (p || cp, n || cn)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Clues, Value};

    use super::*;

    fn solution(x: u8) -> Fact {
        Fact::Solution(Cell::new(x, 0), Value::new(1))
    }

    #[test]
    fn test_simplification() {
        assert_eq!(Condition::all([]), Condition::True);
        assert_eq!(Condition::any([]), Condition::False);
        assert_eq!(
            Condition::all([Condition::True, Condition::Derived(solution(0))]),
            Condition::Derived(solution(0))
        );
        assert_eq!(
            Condition::any([Condition::Derived(solution(0)), Condition::True]),
            Condition::True
        );
        assert_eq!(
            Condition::all([
                Condition::All(vec![Condition::Derived(solution(0)), Condition::Derived(solution(1))]),
                Condition::Derived(solution(2)),
            ]),
            Condition::All(vec![
                Condition::Derived(solution(0)),
                Condition::Derived(solution(1)),
                Condition::Derived(solution(2)),
            ])
        );
    }

    #[test]
    fn test_negate_and_eval() {
        let clues = Clues::empty(4);
        let puzzle = PuzzleView::new(&clues);
        let mut facts = FactStore::new(4);
        facts.insert(solution(0));

        let condition = Condition::all([
            Condition::Derived(solution(0)),
            Condition::any([Condition::Derived(solution(1)), Condition::Puzzle(PuzzleAtom::Hidden(Cell::new(1, 0)))]),
        ]);
        assert!(condition.eval(&facts, &puzzle));
        assert!(!condition.clone().negate().eval(&facts, &puzzle));
        assert_eq!(condition.leaf_polarities(), (true, false));
        assert_eq!(condition.negate().leaf_polarities(), (false, true));
    }
}

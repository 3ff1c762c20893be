//! Ground rule instances and a reference evaluator over them.
//!
//! Every rule can describe itself as a finite set of ground Horn rules over a
//! [`Scope`]. The synthesizer compiles these into solver constraints; the
//! [`GroundProgram::closure`] evaluator computes the same least fixpoint the
//! [`DerivationEngine`](crate::DerivationEngine) does, by counter-based
//! propagation instead of pattern matching, so the two can be checked
//! against each other.

use std::collections::{HashMap, HashSet};

use crate::{Fact, FactStore, PuzzleAtom, PuzzleView, Scope, Stratum};

/// A body atom of a ground rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    /// The fact has been derived.
    Derived(Fact),
    /// The fact is absent from the closure of the lower strata.
    Absent(Fact),
    /// A puzzle atom holds.
    Puzzle(PuzzleAtom),
}

/// One ground instance: when every body atom holds, every head is derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundRule {
    stratum: Stratum,
    body: Vec<Atom>,
    heads: Vec<Fact>,
}

impl GroundRule {
    /// Returns the stratum the rule is evaluated in.
    #[must_use]
    pub fn stratum(&self) -> Stratum {
        self.stratum
    }

    /// Returns the body atoms, sorted and deduplicated.
    #[must_use]
    pub fn body(&self) -> &[Atom] {
        &self.body
    }

    /// Returns the head facts, sorted and deduplicated.
    #[must_use]
    pub fn heads(&self) -> &[Fact] {
        &self.heads
    }
}

/// Collects the ground instances of one rule.
#[derive(Debug)]
pub struct Grounding<'a> {
    scope: &'a Scope<'a>,
    stratum: Stratum,
    rules: Vec<GroundRule>,
}

impl<'a> Grounding<'a> {
    /// Starts grounding a rule of `stratum` over `scope`.
    #[must_use]
    pub fn new(scope: &'a Scope<'a>, stratum: Stratum) -> Self {
        Self {
            scope,
            stratum,
            rules: Vec::new(),
        }
    }

    /// Returns the scope being grounded over.
    #[must_use]
    pub fn scope(&self) -> &'a Scope<'a> {
        self.scope
    }

    /// Adds a ground rule. Rules without heads are dropped.
    pub fn rule<B, H>(&mut self, body: B, heads: H)
    where
        B: IntoIterator<Item = Atom>,
        H: IntoIterator<Item = Fact>,
    {
        let mut heads = heads.into_iter().collect::<Vec<_>>();
        if heads.is_empty() {
            return;
        }
        heads.sort_unstable();
        heads.dedup();
        let mut body = body.into_iter().collect::<Vec<_>>();
        body.sort_unstable();
        body.dedup();
        self.rules.push(GroundRule {
            stratum: self.stratum,
            body,
            heads,
        });
    }

    /// Returns the collected rules.
    #[must_use]
    pub fn into_rules(self) -> Vec<GroundRule> {
        self.rules
    }
}

/// A stage's rules, fully instantiated over its scope.
#[derive(Debug, Clone, Default)]
pub struct GroundProgram {
    rules: Vec<GroundRule>,
}

impl GroundProgram {
    /// Creates a program, dropping duplicate rules.
    #[must_use]
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = GroundRule>,
    {
        let mut seen = HashSet::new();
        let rules = rules
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .collect();
        Self { rules }
    }

    /// Returns the rules.
    #[must_use]
    pub fn rules(&self) -> &[GroundRule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the program has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns every fact some rule can derive.
    #[must_use]
    pub fn produced(&self) -> HashSet<Fact> {
        self.rules.iter().flat_map(|r| r.heads.iter().copied()).collect()
    }

    /// Computes the least fixpoint of the program from `seeds`, stratum by
    /// stratum.
    ///
    /// Absent and puzzle atoms are fixed when a stratum starts; the remaining
    /// body atoms are tracked with per-rule counters of facts still missing.
    #[must_use]
    pub fn closure(&self, puzzle: &PuzzleView<'_>, seeds: &FactStore) -> FactStore {
        fn fire(rule: &GroundRule, facts: &mut FactStore, queue: &mut Vec<Fact>) {
            for head in &rule.heads {
                if facts.insert(*head) {
                    queue.push(*head);
                }
            }
        }

        let mut facts = seeds.clone();
        for stratum in Stratum::ALL {
            let rules = self
                .rules
                .iter()
                .filter(|r| r.stratum == stratum)
                .filter(|r| {
                    r.body.iter().all(|atom| match atom {
                        Atom::Derived(_) => true,
                        Atom::Absent(f) => !facts.contains(f),
                        Atom::Puzzle(p) => puzzle.holds(*p),
                    })
                })
                .collect::<Vec<_>>();

            let mut missing = Vec::with_capacity(rules.len());
            let mut watchers = HashMap::<Fact, Vec<usize>>::new();
            let mut queue = Vec::new();
            for (i, rule) in rules.iter().enumerate() {
                let mut pending = 0;
                for atom in &rule.body {
                    if let Atom::Derived(f) = atom
                        && !facts.contains(f)
                    {
                        watchers.entry(*f).or_default().push(i);
                        pending += 1;
                    }
                }
                missing.push(pending);
                if pending == 0 {
                    fire(rule, &mut facts, &mut queue);
                }
            }
            while let Some(fact) = queue.pop() {
                for &i in watchers.get(&fact).into_iter().flatten() {
                    missing[i] -= 1;
                    if missing[i] == 0 {
                        fire(rules[i], &mut facts, &mut queue);
                    }
                }
            }
            log::trace!("ground closure: {stratum:?} stratum done, {} facts", facts.len());
        }
        facts
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Clues, Grid, Value};

    use super::*;
    use crate::GroupFilter;

    #[test]
    fn test_closure_propagates_and_respects_strata() {
        let grid = Grid::regular(4).unwrap();
        let scope = Scope::new(&grid, &GroupFilter::All);
        let (a, b) = (Cell::new(0, 0), Cell::new(1, 0));
        let one = Value::new(1);

        let mut inference = Grounding::new(&scope, Stratum::Inference);
        inference.rule(
            [Atom::Puzzle(PuzzleAtom::Clue(a, one))],
            [Fact::Solution(a, one)],
        );
        inference.rule([Atom::Derived(Fact::Solution(a, one))], [Fact::Strike(b, one)]);
        // Never fires: its body is never derived.
        inference.rule([Atom::Derived(Fact::Decided(b))], [Fact::Decided(a)]);
        // Dropped: no heads.
        inference.rule([Atom::Derived(Fact::Decided(a))], std::iter::empty());

        let mut verdict = Grounding::new(&scope, Stratum::Verdict);
        verdict.rule([Atom::Absent(Fact::Decided(a))], [Fact::Decided(b)]);

        let program = GroundProgram::new(inference.into_rules().into_iter().chain(verdict.into_rules()));
        assert_eq!(program.len(), 4);

        let clues: Clues = "1... .... .... ....".parse().unwrap();
        let closure = program.closure(&PuzzleView::new(&clues), &FactStore::new(4));
        assert!(closure.contains(&Fact::Solution(a, one)));
        assert!(closure.contains(&Fact::Strike(b, one)));
        // The verdict rule saw `Decided(a)` absent, and its own head does not
        // feed back into the inference stratum.
        assert!(closure.contains(&Fact::Decided(b)));
        assert!(!closure.contains(&Fact::Decided(a)));
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let grid = Grid::regular(4).unwrap();
        let scope = Scope::new(&grid, &GroupFilter::All);
        let mut grounding = Grounding::new(&scope, Stratum::Inference);
        let fact = Fact::Decided(Cell::new(0, 0));
        grounding.rule(std::iter::empty(), [fact, fact]);
        grounding.rule(std::iter::empty(), [fact]);
        let program = GroundProgram::new(grounding.into_rules());
        assert_eq!(program.len(), 1);
        assert_eq!(program.rules()[0].heads(), [fact]);
        assert_eq!(program.produced().len(), 1);
    }
}

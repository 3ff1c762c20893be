//! Propositional formulas in conjunctive normal form.

use std::{fmt, ops::Not};

/// A literal: a variable or its negation.
///
/// Literals use the DIMACS convention: variables are numbered from 1, and a
/// negative number is the negated variable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Returns the variable number, starting at 1.
    #[must_use]
    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Returns `true` for a non-negated literal.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns the DIMACS integer of the literal.
    #[must_use]
    pub fn to_dimacs(self) -> i32 {
        self.0
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "x{}", self.var())
        } else {
            write!(f, "!x{}", self.var())
        }
    }
}

/// A CNF formula under construction.
///
/// Besides plain clauses, the builder offers the gadgets the puzzle encoding
/// needs: Tseitin conjunction and disjunction, and cardinality constraints
/// (pairwise or sequential-counter `at_most_one`, sequential-counter
/// `at_most` / `at_least`).
///
/// # Examples
///
/// ```
/// use sudogen_synth::Formula;
///
/// let mut formula = Formula::new();
/// let xs = (0..4).map(|_| formula.new_var()).collect::<Vec<_>>();
/// formula.exactly_one(xs.iter().copied());
/// let both = formula.and([xs[0], xs[1]]);
/// formula.require(!both);
/// assert!(formula.num_clauses() > 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formula {
    num_vars: i32,
    clauses: Vec<Vec<Lit>>,
    truth: Option<Lit>,
    has_empty_clause: bool,
}

impl Formula {
    /// Creates an empty formula.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh variable and returns its positive literal.
    pub fn new_var(&mut self) -> Lit {
        self.num_vars += 1;
        Lit(self.num_vars)
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars.unsigned_abs() as usize
    }

    /// Returns the number of clauses.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len() + usize::from(self.has_empty_clause)
    }

    /// Returns the clauses.
    #[must_use]
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Returns `true` if an empty clause was added, making the formula
    /// trivially unsatisfiable.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.has_empty_clause
    }

    /// Adds a clause. Duplicate literals are merged and tautologies dropped.
    pub fn add_clause<I>(&mut self, lits: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        let mut clause = lits.into_iter().collect::<Vec<_>>();
        clause.sort_unstable_by_key(|l| (l.var(), l.is_positive()));
        clause.dedup();
        if clause.windows(2).any(|w| w[0].var() == w[1].var()) {
            return;
        }
        if clause.is_empty() {
            self.has_empty_clause = true;
            return;
        }
        self.clauses.push(clause);
    }

    /// Requires `lit` to be true.
    pub fn require(&mut self, lit: Lit) {
        self.add_clause([lit]);
    }

    /// Adds `a => b`.
    pub fn implies(&mut self, a: Lit, b: Lit) {
        self.add_clause([!a, b]);
    }

    /// Returns a literal fixed to `value`.
    pub fn constant(&mut self, value: bool) -> Lit {
        let truth = match self.truth {
            Some(truth) => truth,
            None => {
                let truth = self.new_var();
                self.require(truth);
                self.truth = Some(truth);
                truth
            }
        };
        if value { truth } else { !truth }
    }

    /// Returns a literal equivalent to the conjunction of `lits`.
    ///
    /// The empty conjunction is true; a single literal is returned as is.
    pub fn and<I>(&mut self, lits: I) -> Lit
    where
        I: IntoIterator<Item = Lit>,
    {
        let mut lits = lits.into_iter().collect::<Vec<_>>();
        lits.sort_unstable();
        lits.dedup();
        match lits.as_slice() {
            [] => return self.constant(true),
            [lit] => return *lit,
            _ => {}
        }
        let gate = self.new_var();
        for &lit in &lits {
            self.add_clause([!gate, lit]);
        }
        self.add_clause(lits.iter().map(|l| !*l).chain([gate]));
        gate
    }

    /// Returns a literal equivalent to the disjunction of `lits`.
    ///
    /// The empty disjunction is false.
    pub fn or<I>(&mut self, lits: I) -> Lit
    where
        I: IntoIterator<Item = Lit>,
    {
        !self.and(lits.into_iter().map(|l| !l))
    }

    /// Requires at most one of `lits` to be true.
    pub fn at_most_one<I>(&mut self, lits: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        let lits = lits.into_iter().collect::<Vec<_>>();
        if lits.len() <= 6 {
            for (i, &a) in lits.iter().enumerate() {
                for &b in &lits[i + 1..] {
                    self.add_clause([!a, !b]);
                }
            }
        } else {
            self.at_most(lits, 1);
        }
    }

    /// Requires exactly one of `lits` to be true.
    pub fn exactly_one<I>(&mut self, lits: I)
    where
        I: IntoIterator<Item = Lit>,
    {
        let lits = lits.into_iter().collect::<Vec<_>>();
        self.add_clause(lits.iter().copied());
        self.at_most_one(lits);
    }

    /// Requires at most `k` of `lits` to be true (sequential counter).
    pub fn at_most<I>(&mut self, lits: I, k: usize)
    where
        I: IntoIterator<Item = Lit>,
    {
        let xs = lits.into_iter().collect::<Vec<_>>();
        let n = xs.len();
        if k >= n {
            return;
        }
        if k == 0 {
            for x in xs {
                self.require(!x);
            }
            return;
        }

        // s[i][j]: at least j + 1 of xs[..=i] are true.
        let mut prev: Vec<Lit> = Vec::new();
        for (i, &x) in xs.iter().enumerate().take(n - 1) {
            let row = (0..k).map(|_| self.new_var()).collect::<Vec<_>>();
            self.add_clause([!x, row[0]]);
            if i == 0 {
                for &s in &row[1..] {
                    self.require(!s);
                }
            } else {
                self.add_clause([!prev[0], row[0]]);
                for j in 1..k {
                    self.add_clause([!x, !prev[j - 1], row[j]]);
                    self.add_clause([!prev[j], row[j]]);
                }
                self.add_clause([!x, !prev[k - 1]]);
            }
            prev = row;
        }
        self.add_clause([!xs[n - 1], !prev[k - 1]]);
    }

    /// Requires at least `k` of `lits` to be true.
    pub fn at_least<I>(&mut self, lits: I, k: usize)
    where
        I: IntoIterator<Item = Lit>,
    {
        let negated = lits.into_iter().map(|l| !l).collect::<Vec<_>>();
        let n = negated.len();
        if k > n {
            self.add_clause([]);
            return;
        }
        self.at_most(negated, n - k);
    }

    /// Returns the clauses as DIMACS integer vectors.
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<Vec<i32>> {
        self.clauses
            .iter()
            .map(|c| c.iter().map(|l| l.to_dimacs()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute-forces every assignment, auxiliary variables included.
    fn satisfiable_with(formula: &Formula, fixed: &[(Lit, bool)]) -> bool {
        let n = formula.num_vars();
        (0..1u64 << n).any(|bits| {
            let value = |l: Lit| {
                let v = bits >> (l.var() - 1) & 1 == 1;
                if l.is_positive() { v } else { !v }
            };
            !formula.has_empty_clause()
                && fixed.iter().all(|(l, b)| value(*l) == *b)
                && formula.clauses().iter().all(|c| c.iter().any(|l| value(*l)))
        })
    }

    fn assignments(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0..1u32 << n).map(move |bits| (0..n).map(|i| bits >> i & 1 == 1).collect())
    }

    #[test]
    fn test_and_or_gates() {
        let mut formula = Formula::new();
        let a = formula.new_var();
        let b = formula.new_var();
        let and = formula.and([a, b]);
        let or = formula.or([a, b]);
        for values in assignments(2) {
            let fixed = [(a, values[0]), (b, values[1])];
            let expect_and = values[0] && values[1];
            let expect_or = values[0] || values[1];
            let mut with = fixed.to_vec();
            with.extend([(and, expect_and), (or, expect_or)]);
            assert!(satisfiable_with(&formula, &with));
            let mut wrong = fixed.to_vec();
            wrong.push((and, !expect_and));
            assert!(!satisfiable_with(&formula, &wrong));
        }
    }

    #[test]
    fn test_empty_gates_are_constants() {
        let mut formula = Formula::new();
        let t = formula.and([]);
        let f = formula.or([]);
        assert!(satisfiable_with(&formula, &[(t, true), (f, false)]));
        assert!(!satisfiable_with(&formula, &[(t, false)]));
        assert!(!satisfiable_with(&formula, &[(f, true)]));
    }

    #[test]
    fn test_cardinality_matches_counting() {
        for n in 1..=5 {
            for k in 0..=n + 1 {
                let mut at_most = Formula::new();
                let xs = (0..n).map(|_| at_most.new_var()).collect::<Vec<_>>();
                at_most.at_most(xs.iter().copied(), k);

                let mut at_least = Formula::new();
                let ys = (0..n).map(|_| at_least.new_var()).collect::<Vec<_>>();
                at_least.at_least(ys.iter().copied(), k);

                for values in assignments(n) {
                    let count = values.iter().filter(|v| **v).count();
                    let fix = |lits: &[Lit]| {
                        lits.iter().copied().zip(values.iter().copied()).collect::<Vec<_>>()
                    };
                    assert_eq!(satisfiable_with(&at_most, &fix(&xs)), count <= k, "n={n} k={k}");
                    assert_eq!(satisfiable_with(&at_least, &fix(&ys)), count >= k, "n={n} k={k}");
                }
            }
        }
    }

    #[test]
    fn test_exactly_one_long() {
        let mut formula = Formula::new();
        let xs = (0..8).map(|_| formula.new_var()).collect::<Vec<_>>();
        formula.exactly_one(xs.iter().copied());
        assert!(!satisfiable_with(&formula, &xs.iter().map(|x| (*x, false)).collect::<Vec<_>>()));
        assert!(satisfiable_with(&formula, &[(xs[3], true), (xs[5], false)]));
        assert!(!satisfiable_with(&formula, &[(xs[3], true), (xs[7], true)]));
    }

    #[test]
    fn test_tautologies_are_dropped() {
        let mut formula = Formula::new();
        let a = formula.new_var();
        formula.add_clause([a, !a]);
        assert_eq!(formula.num_clauses(), 0);
        formula.add_clause([]);
        assert!(formula.has_empty_clause());
    }
}

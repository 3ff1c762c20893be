//! Uniqueness checks by guess and saturation.
//!
//! "The clues have exactly one solution" quantifies over every alternative
//! grid, which plain CNF cannot say. The oracle refines instead: after the
//! main problem proposes a candidate, it searches for a *guess*, a valid grid
//! that agrees with every visible clue but differs from the candidate's
//! solution. If one exists, a saturation clause is added to the main problem
//! stating that every future candidate must *violate* that guess: disagree
//! with it at some visible cell, or have it as its own solution. Each such
//! clause removes exactly the candidates the guess refutes, so the loop only
//! ever discards non-unique puzzles.
//!
//! The same scheme checks the other properties that quantify over every
//! assignment agreeing with the clues: that the input cell takes no value
//! beyond its true value and its alternatives, and that each alternative
//! value completes in only one way.

use std::time::Duration;

use sudogen_core::{Cell, Clues, Grid, Solution};

use crate::{
    BackendError, Formula, Lit, SatBackend, SolveOutcome,
    encoder::{CellValueVars, PuzzleVars},
};

/// A property of every assignment agreeing with the clues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Universal {
    /// The intended solution is the only one.
    UniqueSolution,
    /// The input cell holds its true value or an alternative value.
    InputExclusive,
    /// The alternative with this index is the only assignment with its
    /// value in the input cell.
    AlternativeUnique(usize),
}

/// A decoded candidate puzzle.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) clues: Clues,
    pub(crate) solution: Solution,
    pub(crate) input: Option<Cell>,
    pub(crate) alternatives: Vec<Solution>,
}

/// The result of a uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Verdict {
    /// The intended solution is the only one.
    Unique,
    /// Another solution agrees with the clues.
    Alternative(Solution),
    /// The solver ran out of time.
    Undecided,
}

/// Decides whether clues determine their solution.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Clues, Grid, Solution};
/// use sudogen_synth::{SplrBackend, UniquenessOracle, Verdict};
///
/// let grid = Grid::regular(4)?;
/// let solution: Solution = "1423 3214 2341 4132".parse()?;
/// let oracle = UniquenessOracle::new(&grid, &SplrBackend);
///
/// let clues: Clues = "1... ..1. .3.. ...2".parse()?;
/// assert_eq!(oracle.alternative(&clues, &solution, None)?, Verdict::Unique);
///
/// let clues: Clues = "1... .... .... ...2".parse()?;
/// assert!(oracle.alternative(&clues, &solution, None)?.is_alternative());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UniquenessOracle<'a, B> {
    grid: &'a Grid,
    backend: &'a B,
}

impl<'a, B> UniquenessOracle<'a, B>
where
    B: SatBackend,
{
    /// Creates an oracle for `grid`.
    #[must_use]
    pub fn new(grid: &'a Grid, backend: &'a B) -> Self {
        Self { grid, backend }
    }

    pub(crate) fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Searches for a solution of `clues` other than `solution`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn alternative(
        &self,
        clues: &Clues,
        solution: &Solution,
        timeout: Option<Duration>,
    ) -> Result<Verdict, BackendError> {
        self.search(clues, timeout, |formula, guess| {
            formula.add_clause(differs(clues, guess, solution));
        })
    }

    /// Searches for an assignment agreeing with the candidate's clues that
    /// breaks `universal`.
    pub(crate) fn counterexample(
        &self,
        universal: Universal,
        candidate: &Candidate,
        timeout: Option<Duration>,
    ) -> Result<Verdict, BackendError> {
        let clues = &candidate.clues;
        match universal {
            Universal::UniqueSolution => self.alternative(clues, &candidate.solution, timeout),
            Universal::InputExclusive => {
                let Some(input) = candidate.input else {
                    return Ok(Verdict::Unique);
                };
                self.search(clues, timeout, |formula, guess| {
                    let allowed = [&candidate.solution]
                        .into_iter()
                        .chain(&candidate.alternatives)
                        .map(|s| s.get(input));
                    for value in allowed {
                        formula.require(!guess.get(input, value));
                    }
                })
            }
            Universal::AlternativeUnique(i) => {
                let (Some(input), Some(alternative)) = (candidate.input, candidate.alternatives.get(i))
                else {
                    return Ok(Verdict::Unique);
                };
                self.search(clues, timeout, |formula, guess| {
                    formula.require(guess.get(input, alternative.get(input)));
                    formula.add_clause(differs(clues, guess, alternative));
                })
            }
        }
    }

    fn search<F>(&self, clues: &Clues, timeout: Option<Duration>, restrict: F) -> Result<Verdict, BackendError>
    where
        F: FnOnce(&mut Formula, &CellValueVars),
    {
        let mut formula = Formula::new();
        let guess = CellValueVars::new(&mut formula, self.grid);
        for (cell, value) in clues.given() {
            formula.require(guess.get(cell, value));
        }
        restrict(&mut formula, &guess);

        match self.backend.solve(&formula, timeout)? {
            SolveOutcome::Satisfiable(model) => {
                let alternative = guess.decode(&model, self.grid)?;
                log::trace!("alternative solution {}", alternative.to_short_string());
                Ok(Verdict::Alternative(alternative))
            }
            SolveOutcome::Unsatisfiable => Ok(Verdict::Unique),
            SolveOutcome::TimedOut => Ok(Verdict::Undecided),
        }
    }

    /// Adds the saturation clause of `guess` to the main problem: the
    /// candidate hides none of the cells where it differs from `guess`, or
    /// its solution is `guess`.
    pub(crate) fn saturate(&self, formula: &mut Formula, vars: &PuzzleVars, guess: &Solution) {
        self.refute(Universal::UniqueSolution, formula, vars, guess);
    }

    /// Adds the clause excluding every candidate that `guess` shows to
    /// break `universal`: the candidate disagrees with `guess` at a visible
    /// cell, or `guess` is not a counterexample for it.
    pub(crate) fn refute(&self, universal: Universal, formula: &mut Formula, vars: &PuzzleVars, guess: &Solution) {
        let mut violations = Vec::with_capacity(2 * self.grid.num_cells() + 1);
        for (cell, value) in guess.iter() {
            violations.push(formula.and([!vars.hidden(cell), !vars.sol(cell, value)]));
        }
        match universal {
            Universal::UniqueSolution => {
                violations.push(reproduces(formula, &vars.solution, guess));
            }
            Universal::InputExclusive => {
                for (cell, value) in guess.iter() {
                    let Some(at) = vars.input_at(cell) else {
                        continue;
                    };
                    let allowed = [vars.sol(cell, value)]
                        .into_iter()
                        .chain(vars.alternatives().iter().map(|alt| alt.get(cell, value)))
                        .collect::<Vec<_>>();
                    let allowed = formula.or(allowed);
                    violations.push(formula.and([at, allowed]));
                }
            }
            Universal::AlternativeUnique(i) => {
                let Some(alt) = vars.alternatives().get(i) else {
                    return;
                };
                for (cell, value) in guess.iter() {
                    if let Some(at) = vars.input_at(cell) {
                        violations.push(formula.and([at, !alt.get(cell, value)]));
                    }
                }
                violations.push(reproduces(formula, alt, guess));
            }
        }
        formula.add_clause(violations);
    }
}

/// The clause "some hidden cell of `clues` differs from `reference`".
fn differs(clues: &Clues, guess: &CellValueVars, reference: &Solution) -> Vec<Lit> {
    clues
        .hidden()
        .iter()
        .map(|cell| !guess.get(cell, reference.get(cell)))
        .collect()
}

/// A literal for "`vars` spell out `guess`".
fn reproduces(formula: &mut Formula, vars: &CellValueVars, guess: &Solution) -> Lit {
    let lits = guess
        .iter()
        .map(|(cell, value)| vars.get(cell, value))
        .collect::<Vec<_>>();
    formula.and(lits)
}

#[cfg(test)]
mod tests {
    use sudogen_core::Value;

    use super::*;
    use crate::SplrBackend;

    #[test]
    fn test_full_grid_is_unique() {
        let grid = Grid::with_blocks(3, 2).unwrap();
        let solution: Solution = "123456 456123 231564 564231 312645 645312".parse().unwrap();
        let clues = solution.to_clues(&sudogen_core::CellSet::new(6));
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        assert_eq!(oracle.alternative(&clues, &solution, None).unwrap(), Verdict::Unique);
    }

    #[test]
    fn test_alternative_agrees_with_clues() {
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let clues: Clues = "1... .... .... ...2".parse().unwrap();
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        let Verdict::Alternative(other) = oracle.alternative(&clues, &solution, None).unwrap() else {
            panic!("expected an alternative");
        };
        assert_ne!(other, solution);
        assert!(other.agrees_with(&clues));
        other.validate(&grid).unwrap();
    }

    #[test]
    fn test_saturation_excludes_refuted_candidates() {
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let clues: Clues = "1... .... .... ...2".parse().unwrap();
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        let Verdict::Alternative(guess) = oracle.alternative(&clues, &solution, None).unwrap() else {
            panic!("expected an alternative");
        };

        let mut formula = Formula::new();
        let vars = PuzzleVars::new(&mut formula, &grid);
        for (cell, value) in solution.iter() {
            formula.require(vars.sol(cell, value));
            let hidden = vars.hidden(cell);
            formula.require(if clues.get(cell).is_some() { !hidden } else { hidden });
        }
        assert!(SplrBackend.solve(&formula, None).unwrap().is_satisfiable());
        oracle.saturate(&mut formula, &vars, &guess);
        assert_eq!(SplrBackend.solve(&formula, None).unwrap(), SolveOutcome::Unsatisfiable);
    }

    #[test]
    fn test_input_exclusive_counterexample() {
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let clues: Clues = "1... .... .... ...2".parse().unwrap();
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        let input = Cell::new(1, 0);
        let candidate = Candidate {
            clues: clues.clone(),
            solution: solution.clone(),
            input: Some(input),
            alternatives: Vec::new(),
        };
        let Verdict::Alternative(guess) = oracle
            .counterexample(Universal::InputExclusive, &candidate, None)
            .unwrap()
        else {
            panic!("expected a counterexample");
        };
        assert_ne!(guess.get(input), solution.get(input));
        assert!(guess.agrees_with(&clues));

        // Every value but 1 is allowed, and the clue r1c1 rules 1 out.
        let others = grid
            .values()
            .filter(|v| *v != solution.get(input) && *v != Value::new(1))
            .map(|v| {
                let mut values = solution.iter().map(|(_, w)| w).collect::<Vec<_>>();
                values[input.index(4)] = v;
                Solution::from_values(values).unwrap()
            })
            .collect();
        let candidate = Candidate {
            alternatives: others,
            ..candidate
        };
        assert_eq!(
            oracle
                .counterexample(Universal::InputExclusive, &candidate, None)
                .unwrap(),
            Verdict::Unique
        );
    }

    #[test]
    fn test_refuting_an_undeducible_input() {
        // Pin the candidate to the solution and clues, with r1c2 as input.
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let clues: Clues = "1... .... .... ...2".parse().unwrap();
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        let candidate = Candidate {
            clues: clues.clone(),
            solution: solution.clone(),
            input: Some(Cell::new(1, 0)),
            alternatives: Vec::new(),
        };
        let Verdict::Alternative(guess) = oracle
            .counterexample(Universal::InputExclusive, &candidate, None)
            .unwrap()
        else {
            panic!("expected a counterexample");
        };

        let mut formula = Formula::new();
        let mut vars = PuzzleVars::new(&mut formula, &grid);
        vars.designate_input(&mut formula, &grid, Some(Cell::new(1, 0)), None, None);
        for (cell, value) in solution.iter() {
            formula.require(vars.sol(cell, value));
            let hidden = vars.hidden(cell);
            formula.require(if clues.get(cell).is_some() { !hidden } else { hidden });
        }
        assert!(SplrBackend.solve(&formula, None).unwrap().is_satisfiable());
        oracle.refute(Universal::InputExclusive, &mut formula, &vars, &guess);
        assert_eq!(SplrBackend.solve(&formula, None).unwrap(), SolveOutcome::Unsatisfiable);
    }
}

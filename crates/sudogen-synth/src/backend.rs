//! SAT solver backends.

use std::time::{Duration, Instant};

use splr::{Certificate, Config, SatSolverIF as _, SolveIF as _, Solver, SolverError};

use crate::{Formula, Lit};

/// A satisfying assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    /// Builds a model from DIMACS literals; variables not listed are false.
    #[must_use]
    pub fn from_dimacs(num_vars: usize, lits: &[i32]) -> Self {
        let mut values = vec![false; num_vars];
        for &lit in lits {
            let index = lit.unsigned_abs() as usize;
            if lit > 0
                && let Some(value) = values.get_mut(index - 1)
            {
                *value = true;
            }
        }
        Self { values }
    }

    /// Returns the truth value of a literal.
    #[must_use]
    pub fn value(&self, lit: Lit) -> bool {
        let var = self
            .values
            .get(lit.var() as usize - 1)
            .copied()
            .unwrap_or(false);
        var == lit.is_positive()
    }
}

/// The result of one solver call.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SolveOutcome {
    /// The formula is satisfiable.
    Satisfiable(Model),
    /// The formula is unsatisfiable.
    Unsatisfiable,
    /// The time limit was reached first.
    TimedOut,
}

/// A failure inside the solver.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BackendError {
    /// The solver reported an error.
    #[display("SAT solver failed: {message}")]
    Solver {
        /// The solver's description of the failure.
        message: String,
    },
}

/// A SAT solver that decides [`Formula`]s.
pub trait SatBackend: Send + Sync {
    /// Returns the backend's name, for logs.
    fn name(&self) -> &'static str;

    /// Decides `formula`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver fails for a reason other than the
    /// formula being unsatisfiable or the time limit.
    fn solve(&self, formula: &Formula, timeout: Option<Duration>)
    -> Result<SolveOutcome, BackendError>;

    /// Opens a session for deciding one formula as it grows.
    ///
    /// The default session decides the whole formula again on every call.
    fn session(&self) -> Box<dyn SatSession + '_> {
        Box::new(Resolving { backend: self })
    }
}

/// Decides a formula repeatedly while clauses are appended to it.
///
/// Between two calls the caller may only add variables and clauses; a
/// backend may keep what it learned from earlier calls. Once a call reports
/// [`SolveOutcome::Unsatisfiable`], every later call does too.
pub trait SatSession {
    /// Decides `formula`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver fails for a reason other than the
    /// formula being unsatisfiable or the time limit.
    fn solve(
        &mut self,
        formula: &Formula,
        timeout: Option<Duration>,
    ) -> Result<SolveOutcome, BackendError>;
}

struct Resolving<'a, B: ?Sized> {
    backend: &'a B,
}

impl<B> SatSession for Resolving<'_, B>
where
    B: SatBackend + ?Sized,
{
    fn solve(
        &mut self,
        formula: &Formula,
        timeout: Option<Duration>,
    ) -> Result<SolveOutcome, BackendError> {
        self.backend.solve(formula, timeout)
    }
}

/// The [`splr`] CDCL solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplrBackend;

impl SplrBackend {
    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SatBackend for SplrBackend {
    fn name(&self) -> &'static str {
        "splr"
    }

    fn solve(
        &self,
        formula: &Formula,
        timeout: Option<Duration>,
    ) -> Result<SolveOutcome, BackendError> {
        SplrSession::new().solve(formula, timeout)
    }

    fn session(&self) -> Box<dyn SatSession + '_> {
        Box::new(SplrSession::new())
    }
}

/// An incremental [`splr`] search.
///
/// The first call loads the whole formula; later calls feed the solver only
/// the variables and clauses added since, so learnt clauses carry over.
#[derive(Default)]
pub struct SplrSession {
    solver: Option<Solver>,
    loaded: usize,
    unsatisfiable: bool,
}

impl SplrSession {
    /// Creates a session with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn extend(&mut self, formula: &Formula, timeout: f64) -> Result<Certificate, SolverError> {
        let clauses = formula.clauses();
        if let Some(solver) = self.solver.as_mut() {
            solver.reset();
            while solver.asg.num_vars < formula.num_vars() {
                solver.add_var();
            }
            for clause in &clauses[self.loaded..] {
                solver.add_clause(clause.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>())?;
            }
            self.loaded = clauses.len();
            solver.state.config.c_timeout = timeout;
            solver.state.start = Instant::now();
            solver.solve()
        } else {
            let mut config = Config::default();
            config.quiet_mode = true;
            config.c_timeout = timeout;
            let dimacs = formula.to_dimacs();
            self.loaded = dimacs.len();
            match Solver::try_from((config, dimacs.as_slice())) {
                Ok(solver) => self.solver.insert(solver).solve(),
                Err(result) => result,
            }
        }
    }
}

impl SatSession for SplrSession {
    fn solve(
        &mut self,
        formula: &Formula,
        timeout: Option<Duration>,
    ) -> Result<SolveOutcome, BackendError> {
        if self.unsatisfiable || formula.has_empty_clause() {
            return Ok(SolveOutcome::Unsatisfiable);
        }
        if timeout.is_some_and(|t| t.is_zero()) {
            return Ok(SolveOutcome::TimedOut);
        }
        if formula.clauses().is_empty() {
            return Ok(SolveOutcome::Satisfiable(Model::from_dimacs(
                formula.num_vars(),
                &[],
            )));
        }

        // splr counts its limit in whole seconds.
        let limit = timeout.map_or(Config::default().c_timeout, |t| t.as_secs_f64().ceil());
        let start = Instant::now();
        let incremental = self.solver.is_some();
        let result = self.extend(formula, limit);
        log::debug!(
            "splr{}: {} vars, {} clauses, {:.3}s",
            if incremental { " (incremental)" } else { "" },
            formula.num_vars(),
            formula.clauses().len(),
            start.elapsed().as_secs_f64()
        );

        match result {
            Ok(Certificate::SAT(lits)) => Ok(SolveOutcome::Satisfiable(Model::from_dimacs(
                formula.num_vars(),
                &lits,
            ))),
            Ok(Certificate::UNSAT)
            | Err(
                SolverError::EmptyClause
                | SolverError::Inconsistent
                | SolverError::RootLevelConflict(_),
            ) => {
                self.unsatisfiable = true;
                Ok(SolveOutcome::Unsatisfiable)
            }
            Err(SolverError::TimeOut) => Ok(SolveOutcome::TimedOut),
            Err(e) => Err(BackendError::Solver {
                message: format!("{e:?}"),
            }),
        }
    }
}

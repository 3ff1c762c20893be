//! Concrete evaluation of stages and strategies.

use sudogen_core::{ConsistencyError, Grid};

use crate::{
    Evaluation, FactStore, PuzzleView, Stage, Strategy, StrategyReport,
    rule::Stratum,
};

/// An error evaluating a stage.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DerivationError {
    /// The clues already violate a group constraint.
    #[display("inconsistent seed: {_0}")]
    InconsistentSeed(#[from] ConsistencyError),
}

/// The closure of one stage and whether its stability predicate holds.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Every fact derived by the stage, seeds included.
    pub closure: FactStore,
    /// `true` if the stage's stability predicate holds on the closure.
    pub stable: bool,
}

impl StageReport {
    /// Returns `true` if the closure places a value in every cell.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.closure.is_solved()
    }
}

/// Computes stage closures by repeatedly applying rules until nothing new is
/// derived.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Clues, Grid};
/// use sudogen_deduce::{DerivationEngine, FactStore, PuzzleView, Stage, rule};
///
/// let grid = Grid::regular(4)?;
/// let clues: Clues = "12.. 34.. .... ....".parse()?;
/// let stage = Stage::new("singles", rule::singles_rules())?;
///
/// let engine = DerivationEngine::new(&grid);
/// let report = engine.close(&stage, &PuzzleView::new(&clues), &FactStore::new(4))?;
/// assert!(report.stable);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DerivationEngine<'g> {
    grid: &'g Grid,
}

impl<'g> DerivationEngine<'g> {
    /// Creates an engine for `grid`.
    #[must_use]
    pub fn new(grid: &'g Grid) -> Self {
        Self { grid }
    }

    /// Returns the grid.
    #[must_use]
    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    /// Computes the closure of `stage` from `seeds`.
    ///
    /// Strata are evaluated in order; within a stratum, every rule is applied
    /// in turn until a full pass derives nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::InconsistentSeed`] if two clues of a group
    /// share a value.
    pub fn close(
        &self,
        stage: &Stage,
        puzzle: &PuzzleView<'_>,
        seeds: &FactStore,
    ) -> Result<StageReport, DerivationError> {
        puzzle.clues().check_consistency(self.grid)?;

        let scope = stage.scope(self.grid);
        let mut facts = seeds.clone();
        for stratum in Stratum::ALL {
            let mut passes = 0;
            loop {
                passes += 1;
                let mut changed = false;
                for rule in stage.rules_in(stratum) {
                    let derived = {
                        let mut eval = Evaluation::new(&scope, puzzle, &facts);
                        rule.apply(&mut eval);
                        eval.into_derived()
                    };
                    for fact in derived {
                        changed |= facts.insert(fact);
                    }
                }
                if !changed {
                    break;
                }
            }
            log::trace!(
                "stage `{}`: {stratum:?} stratum closed after {passes} passes, {} facts",
                stage.name(),
                facts.len()
            );
        }
        if let Some(cell) = facts.contradiction() {
            log::debug!("stage `{}`: contradiction at {cell}", stage.name());
        }

        let stable = stage.stability(&scope).eval(&facts, puzzle);
        Ok(StageReport {
            closure: facts,
            stable,
        })
    }

    /// Evaluates every stage of `strategy` in order.
    ///
    /// Each stage starts from the union of the facts its incoming edges
    /// forward.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::InconsistentSeed`] if two clues of a group
    /// share a value.
    pub fn run(
        &self,
        strategy: &Strategy,
        puzzle: &PuzzleView<'_>,
    ) -> Result<StrategyReport, DerivationError> {
        let mut reports: Vec<StageReport> = Vec::with_capacity(strategy.len());
        for id in strategy.ids() {
            let mut seeds = FactStore::new(self.grid.size());
            for edge in strategy.incoming(id) {
                seeds.extend(
                    reports[edge.source.0]
                        .closure
                        .filtered(edge.forward)
                        .to_sorted_vec(),
                );
            }
            reports.push(self.close(strategy.stage(id), puzzle, &seeds)?);
        }
        Ok(StrategyReport::new(reports))
    }
}

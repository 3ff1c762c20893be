//! The synthesis loop: encode, solve, refine for uniqueness, tighten the
//! objective.
//!
//! Requests with strategy requirements first pick a solution grid from the
//! cheap constraints alone and search for a mask on that grid, where the
//! strategy encoding is far smaller. If a few grids admit no puzzle, the
//! joint search over grids and masks runs instead.

use std::time::{Duration, Instant};

use sudogen_core::Grid;

use crate::{
    BackendError, Constraint, Formula, Model, PuzzleResult, SatBackend, SatSession, SolveOutcome,
    SplrBackend, SynthError,
    derivation::StrategyEncoder,
    encoder::PuzzleVars,
    uniqueness::{Candidate, UniquenessOracle, Universal, Verdict},
    validate::validate,
};

/// Tuning knobs of a [`Synthesizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Rounds unrolled in the lower copy of each stage. Deductions needing
    /// more rounds are not credited to the stage.
    pub derivation_rounds: usize,
    /// Refinements allowed per candidate search, or `None` to refine until
    /// the search is decided. Exceeding the limit is an error.
    pub max_refinements: Option<usize>,
    /// Extra improvement each tightening step demands beyond one cell.
    pub objective_slack: usize,
    /// Search masks on a fixed solution grid before searching jointly.
    ///
    /// Applies to requests with a strategy requirement and no objective or
    /// fixed solution.
    pub solution_first: bool,
    /// Solution grids tried before falling back to the joint search.
    pub solution_attempts: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            derivation_rounds: 24,
            max_refinements: None,
            objective_slack: 0,
            solution_first: true,
            solution_attempts: 4,
        }
    }
}

impl SynthesisConfig {
    /// Sets [`Self::derivation_rounds`].
    #[must_use]
    pub const fn with_derivation_rounds(mut self, rounds: usize) -> Self {
        self.derivation_rounds = rounds;
        self
    }

    /// Sets [`Self::max_refinements`].
    #[must_use]
    pub const fn with_max_refinements(mut self, refinements: Option<usize>) -> Self {
        self.max_refinements = refinements;
        self
    }

    /// Sets [`Self::objective_slack`].
    #[must_use]
    pub const fn with_objective_slack(mut self, slack: usize) -> Self {
        self.objective_slack = slack;
        self
    }

    /// Sets [`Self::solution_first`].
    #[must_use]
    pub const fn with_solution_first(mut self, enabled: bool) -> Self {
        self.solution_first = enabled;
        self
    }

    /// Sets [`Self::solution_attempts`].
    #[must_use]
    pub const fn with_solution_attempts(mut self, attempts: usize) -> Self {
        self.solution_attempts = attempts;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objective {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, Copy)]
struct Deadline(Option<Instant>);

impl Deadline {
    fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    fn remaining(self) -> Option<Duration> {
        self.0.map(|d| d.saturating_duration_since(Instant::now()))
    }

    fn expired(self) -> bool {
        self.0.is_some_and(|d| Instant::now() >= d)
    }
}

/// What the encoded formula leaves to the synthesis loop.
#[derive(Debug, Default)]
struct Plan {
    universals: Vec<Universal>,
    objective: Option<Objective>,
}

/// The outcome of searching on fixed solution grids.
#[derive(Debug)]
enum Pinned {
    Found(PuzzleResult),
    /// Every solution of the cheap constraints was tried.
    Impossible,
    Inconclusive,
}

/// Synthesizes puzzles from constraint sets.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sudogen_core::Grid;
/// use sudogen_synth::{Constraint, Synthesizer};
///
/// let grid = Grid::regular(4)?;
/// let constraints = [
///     Constraint::HiddenCount { min: 8, max: 8 },
///     Constraint::UniqueSolution,
/// ];
/// let result = Synthesizer::new()
///     .synthesize(&grid, &constraints, Some(Duration::from_secs(30)))?
///     .expect("a 4x4 puzzle with 8 clues exists");
/// assert_eq!(result.hidden_count(), 8);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Synthesizer<B = SplrBackend> {
    backend: B,
    config: SynthesisConfig,
}

impl Synthesizer {
    /// Creates a synthesizer using [`SplrBackend`] and the default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(SplrBackend::new())
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Synthesizer<B>
where
    B: SatBackend,
{
    /// Creates a synthesizer using `backend`.
    #[must_use]
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            config: SynthesisConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Finds a puzzle on `grid` meeting every constraint.
    ///
    /// With an objective, the hidden-cell count is tightened until no better
    /// puzzle exists or `timeout` expires, and the best puzzle found is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Malformed`] if the constraints are contradictory
    /// on their face, before any solver call, [`SynthError::Backend`] if
    /// the solver fails, and [`SynthError::RefinementLimit`] if a candidate
    /// search exceeds [`SynthesisConfig::max_refinements`].
    pub fn synthesize(
        &self,
        grid: &Grid,
        constraints: &[Constraint],
        timeout: Option<Duration>,
    ) -> Result<Option<PuzzleResult>, SynthError> {
        validate(grid, constraints)?;
        let deadline = Deadline::after(timeout);

        let best = if self.config.solution_first && wants_solution_first(constraints) {
            match self.pinned(grid, constraints, deadline)? {
                Pinned::Found(result) => Some(result),
                Pinned::Impossible => None,
                Pinned::Inconclusive if deadline.expired() => None,
                Pinned::Inconclusive => {
                    log::debug!("no puzzle on the tried solutions, searching jointly");
                    self.search(grid, constraints, deadline)?
                }
            }
        } else {
            self.search(grid, constraints, deadline)?
        };

        match &best {
            Some(result) => log::info!(
                "synthesized puzzle with {} hidden cells",
                result.hidden_count()
            ),
            None => log::info!("no puzzle found"),
        }
        Ok(best)
    }

    /// Picks solution grids from the cheap constraints and searches masks
    /// on each in turn.
    fn pinned(
        &self,
        grid: &Grid,
        constraints: &[Constraint],
        deadline: Deadline,
    ) -> Result<Pinned, SynthError> {
        let (mut sketch, vars, _) = self.encode(grid, constraints, true);
        let mut session = self.backend.session();
        for attempt in 0..self.config.solution_attempts {
            let model = match session.solve(&sketch, deadline.remaining())? {
                SolveOutcome::Satisfiable(model) => model,
                SolveOutcome::Unsatisfiable => return Ok(Pinned::Impossible),
                SolveOutcome::TimedOut => break,
            };
            let solution = vars.solution.decode(&model, grid)?;
            log::debug!("solution {}: {}", attempt + 1, solution.to_short_string());

            let mut fixed = constraints.to_vec();
            fixed.push(Constraint::FixSolution(solution.clone()));
            if let Some(result) = self.search(grid, &fixed, deadline)? {
                return Ok(Pinned::Found(result));
            }
            if deadline.expired() {
                break;
            }
            sketch.add_clause(solution.iter().map(|(cell, value)| !vars.sol(cell, value)));
        }
        Ok(Pinned::Inconclusive)
    }

    /// Encodes `constraints`. A sketch leaves out every constraint that is
    /// expensive to encode or checked by refinement.
    fn encode(&self, grid: &Grid, constraints: &[Constraint], sketch: bool) -> (Formula, PuzzleVars, Plan) {
        let mut formula = Formula::new();
        let mut vars = PuzzleVars::new(&mut formula, grid);
        let mut plan = Plan::default();

        // Designations and the solution first: later constraints read them.
        let (designations, rest): (Vec<_>, Vec<_>) = constraints.iter().partition(|c| {
            matches!(
                c,
                Constraint::InputCell { .. }
                    | Constraint::OutputCell { .. }
                    | Constraint::HighlightStrike { .. }
                    | Constraint::FixSolution(_)
            )
        });
        for constraint in designations.into_iter().chain(rest) {
            match constraint {
                Constraint::UniqueSolution
                | Constraint::MaximizeHidden
                | Constraint::MinimizeHidden
                | Constraint::Strategy(_)
                | Constraint::InputCellUndeducible(_)
                | Constraint::NoForcedHiddenCell
                    if sketch => {}
                Constraint::UniqueSolution => plan.universals.push(Universal::UniqueSolution),
                Constraint::MaximizeHidden => plan.objective = Some(Objective::Maximize),
                Constraint::MinimizeHidden => plan.objective = Some(Objective::Minimize),
                Constraint::Strategy(requirement) => {
                    StrategyEncoder::new(grid, self.config.derivation_rounds).encode(
                        &mut formula,
                        &mut vars,
                        requirement,
                    );
                }
                Constraint::InterfaceAllDifferent => vars.interface_all_different(&mut formula, grid),
                Constraint::InputCellUndeducible(options) => {
                    vars.input_undeducible(&mut formula, grid, *options);
                    if options.exclusive {
                        plan.universals.push(Universal::InputExclusive);
                    }
                    if options.unique_alternatives {
                        plan.universals
                            .extend((0..options.alternatives).map(Universal::AlternativeUnique));
                    }
                }
                Constraint::NoForcedHiddenCell => vars.no_forced_hidden_cell(&mut formula, grid),
                other => vars.encode(&mut formula, grid, other),
            }
        }
        log::debug!(
            "encoded {} constraints{}: {} vars, {} clauses",
            constraints.len(),
            if sketch { " as a sketch" } else { "" },
            formula.num_vars(),
            formula.num_clauses()
        );
        (formula, vars, plan)
    }

    /// Searches for a puzzle, tightening the objective if there is one.
    fn search(
        &self,
        grid: &Grid,
        constraints: &[Constraint],
        deadline: Deadline,
    ) -> Result<Option<PuzzleResult>, SynthError> {
        let (mut formula, vars, plan) = self.encode(grid, constraints, false);
        let oracle = UniquenessOracle::new(grid, &self.backend);
        let mut session = self.backend.session();
        let mut best: Option<PuzzleResult> = None;
        while let Some(model) = self.candidate(
            session.as_mut(),
            &mut formula,
            &vars,
            &oracle,
            &plan.universals,
            deadline,
        )? {
            let result = decode(&model, &vars, grid)?;
            let hidden = result.hidden_count();
            log::debug!("candidate with {hidden} hidden cells: {}", result.to_short_string());
            best = Some(result);

            let step = 1 + self.config.objective_slack;
            match plan.objective {
                None => break,
                Some(Objective::Maximize) => {
                    if hidden + step > grid.num_cells() {
                        break;
                    }
                    formula.at_least(vars.hidden_lits(), hidden + step);
                }
                Some(Objective::Minimize) => {
                    let Some(bound) = hidden.checked_sub(step) else {
                        break;
                    };
                    formula.at_most(vars.hidden_lits(), bound);
                }
            }
        }
        Ok(best)
    }

    /// Solves the main problem and refines it until the candidate passes
    /// every universal check.
    fn candidate(
        &self,
        session: &mut dyn SatSession,
        formula: &mut Formula,
        vars: &PuzzleVars,
        oracle: &UniquenessOracle<'_, B>,
        universals: &[Universal],
        deadline: Deadline,
    ) -> Result<Option<Model>, SynthError> {
        let mut refinements = 0;
        'solve: loop {
            let model = match session.solve(formula, deadline.remaining())? {
                SolveOutcome::Satisfiable(model) => model,
                SolveOutcome::Unsatisfiable => {
                    log::debug!("unsatisfiable after {refinements} refinements");
                    return Ok(None);
                }
                SolveOutcome::TimedOut => {
                    log::info!("timed out after {refinements} refinements");
                    return Ok(None);
                }
            };
            if universals.is_empty() {
                return Ok(Some(model));
            }

            let candidate = decode_candidate(&model, vars, oracle.grid())?;
            for &universal in universals {
                match oracle.counterexample(universal, &candidate, deadline.remaining())? {
                    Verdict::Unique => {}
                    Verdict::Alternative(guess) => {
                        if let Some(limit) = self.config.max_refinements
                            && refinements >= limit
                        {
                            log::info!("gave up after {limit} refinements");
                            return Err(SynthError::RefinementLimit { limit });
                        }
                        refinements += 1;
                        log::debug!("refinement {refinements}: candidate breaks {universal:?}");
                        oracle.refute(universal, formula, vars, &guess);
                        continue 'solve;
                    }
                    Verdict::Undecided => {
                        log::info!("timed out checking {universal:?}");
                        return Ok(None);
                    }
                }
            }
            return Ok(Some(model));
        }
    }
}

/// Whether the request gains from fixing the solution grid first.
fn wants_solution_first(constraints: &[Constraint]) -> bool {
    constraints.iter().any(|c| matches!(c, Constraint::Strategy(_)))
        && !constraints
            .iter()
            .any(|c| c.is_objective() || matches!(c, Constraint::FixSolution(_)))
}

fn decode(model: &Model, vars: &PuzzleVars, grid: &Grid) -> Result<PuzzleResult, BackendError> {
    Ok(PuzzleResult {
        solution: vars.solution.decode(model, grid)?,
        mask: vars.decode_mask(model, grid),
        interface: vars.decode_interface(model, grid),
        highlight: vars.decode_highlight(model, grid),
    })
}

fn decode_candidate(model: &Model, vars: &PuzzleVars, grid: &Grid) -> Result<Candidate, BackendError> {
    let solution = vars.solution.decode(model, grid)?;
    let alternatives = vars
        .alternatives()
        .iter()
        .map(|alt| alt.decode(model, grid))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Candidate {
        clues: solution.to_clues(&vars.decode_mask(model, grid)),
        input: vars.decode_interface(model, grid).input.map(|i| i.cell),
        solution,
        alternatives,
    })
}

/// Finds a puzzle on `grid` meeting every constraint, using the default
/// [`Synthesizer`].
///
/// Returns `Ok(None)` when no puzzle exists or none was found before
/// `timeout`.
///
/// # Errors
///
/// See [`Synthesizer::synthesize`].
pub fn synthesize(
    grid: &Grid,
    constraints: &[Constraint],
    timeout: Option<Duration>,
) -> Result<Option<PuzzleResult>, SynthError> {
    Synthesizer::new().synthesize(grid, constraints, timeout)
}

#[cfg(test)]
mod tests {
    use sudogen_core::{Cell, Clues, Solution, Value};
    use sudogen_deduce::{DerivationEngine, PuzzleView, Stage, Strategy, StrategyRequirement, rule};

    use super::*;
    use crate::{Contradiction, Symmetry, Undeducibility};

    fn grid() -> Grid {
        Grid::regular(4).unwrap()
    }

    fn run(constraints: &[Constraint]) -> Option<PuzzleResult> {
        Synthesizer::new()
            .synthesize(&grid(), constraints, Some(Duration::from_secs(60)))
            .unwrap()
    }

    #[test]
    fn test_plain_grid_is_valid() {
        let result = run(&[]).unwrap();
        result.solution.validate(&grid()).unwrap();
    }

    #[test]
    fn test_mask_constraints() {
        let result = run(&[
            Constraint::HiddenCount { min: 6, max: 6 },
            Constraint::Symmetry(Symmetry::Point),
            Constraint::FixCell {
                cell: Cell::new(0, 0),
                value: Value::new(3),
            },
            Constraint::OpenCell(Cell::new(1, 0)),
        ])
        .unwrap();
        let clues = result.clues();
        assert_eq!(result.hidden_count(), 6);
        assert!(result.mask.contains(Cell::new(1, 0)));
        assert!(result.mask.contains(Cell::new(2, 3)));
        assert_eq!(clues.get(Cell::new(0, 0)), Some(Value::new(3)));
        for cell in grid().cells() {
            let mirror = Symmetry::Point.mirror(cell, 4);
            assert_eq!(result.mask.contains(cell), result.mask.contains(mirror));
        }
    }

    #[test]
    fn test_canonical_top_row_clashes_with_fixed_cell() {
        // Fixing r1c1 to 3 contradicts a top row reading 1234.
        let result = run(&[
            Constraint::CanonicalTopRow,
            Constraint::FixCell {
                cell: Cell::new(0, 0),
                value: Value::new(3),
            },
        ]);
        assert_eq!(result, None);
    }

    #[test]
    fn test_forbid_values() {
        let result = run(&[Constraint::ForbidValues(vec![Value::new(2), Value::new(4)])]).unwrap();
        for (cell, value) in result.solution.iter() {
            if value == Value::new(2) || value == Value::new(4) {
                assert!(result.mask.contains(cell));
            }
        }
    }

    #[test]
    fn test_objectives() {
        // A unique 4x4 Sudoku needs at least 4 clues.
        let most = run(&[Constraint::UniqueSolution, Constraint::MaximizeHidden]).unwrap();
        assert!((10..=12).contains(&most.hidden_count()));
        let grid = grid();
        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        assert_eq!(
            oracle.alternative(&most.clues(), &most.solution, None).unwrap(),
            Verdict::Unique
        );
        let least = run(&[Constraint::HiddenCount { min: 3, max: 16 }, Constraint::MinimizeHidden]).unwrap();
        assert_eq!(least.hidden_count(), 3);
    }

    #[test]
    fn test_interface_cells() {
        let input = Cell::new(2, 1);
        let result = run(&[
            Constraint::InputCell {
                location: Some(input),
                solution: None,
                decoy: Some(Value::new(1)),
            },
            Constraint::OutputCell {
                location: None,
                solution: None,
                forbidden_solution: Some(Value::new(4)),
                decoy: None,
            },
            Constraint::InterfaceAllDifferent,
            Constraint::InputCellUndeducible(Undeducibility::new()),
        ])
        .unwrap();
        let input_cell = result.interface.input.unwrap();
        let output_cell = result.interface.output.unwrap();
        assert_eq!(input_cell.cell, input);
        assert_eq!(input_cell.decoy, Value::new(1));
        assert!(result.mask.contains(input));
        assert!(result.mask.contains(output_cell.cell));
        let mut values = vec![
            result.solution.get(input_cell.cell),
            input_cell.decoy,
            result.solution.get(output_cell.cell),
            output_cell.decoy,
        ];
        assert_ne!(values[2], Value::new(4));
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_malformed_before_solving() {
        let err = Synthesizer::new()
            .synthesize(
                &grid(),
                &[Constraint::HiddenCount { min: 10, max: 2 }],
                None,
            )
            .unwrap_err();
        let SynthError::Malformed(report) = err else {
            panic!("expected a malformed report");
        };
        assert_eq!(
            report.contradictions(),
            [Contradiction::HiddenBounds {
                min: 10,
                max: 2,
                cells: 16
            }]
        );
    }

    #[test]
    fn test_zero_timeout_finds_nothing() {
        let result = Synthesizer::new()
            .synthesize(&grid(), &[], Some(Duration::ZERO))
            .unwrap();
        assert_eq!(result, None);
    }

    fn singles() -> Strategy {
        let mut rules = rule::singles_rules();
        rules.push(Box::new(rule::Solved::new()));
        Strategy::single(Stage::new("singles", rules).unwrap())
    }

    /// Every completion of `clues`, by backtracking.
    fn completions(grid: &Grid, clues: &Clues) -> Vec<Solution> {
        fn fill(grid: &Grid, values: &mut Vec<Option<Value>>, found: &mut Vec<Solution>) {
            let Some(index) = values.iter().position(Option::is_none) else {
                let values = values.iter().flatten().copied().collect();
                found.push(Solution::from_values(values).unwrap());
                return;
            };
            let cell = Cell::from_index(index, grid.size());
            for value in grid.values() {
                let clash = grid
                    .peers(cell)
                    .iter()
                    .any(|peer| values[peer.index(grid.size())] == Some(value));
                if !clash {
                    values[index] = Some(value);
                    fill(grid, values, found);
                    values[index] = None;
                }
            }
        }

        let mut values = clues.iter().map(|(_, v)| v).collect::<Vec<_>>();
        let mut found = Vec::new();
        fill(grid, &mut values, &mut found);
        found
    }

    #[test]
    fn test_refinement_limit_is_an_error() {
        // Two clues never determine a 4x4 grid, so the first candidate
        // already needs a refinement.
        let err = Synthesizer::new()
            .with_config(SynthesisConfig::default().with_max_refinements(Some(0)))
            .synthesize(
                &grid(),
                &[
                    Constraint::HiddenCount { min: 14, max: 14 },
                    Constraint::UniqueSolution,
                ],
                Some(Duration::from_secs(60)),
            )
            .unwrap_err();
        assert_eq!(err, SynthError::RefinementLimit { limit: 0 });
    }

    #[test]
    fn test_fixed_solution_is_kept() {
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let result = run(&[
            Constraint::FixSolution(solution.clone()),
            Constraint::HiddenCount { min: 9, max: 16 },
            Constraint::UniqueSolution,
            Constraint::Strategy(StrategyRequirement::holds(singles())),
        ])
        .unwrap();
        assert_eq!(result.solution, solution);
        assert!(result.hidden_count() >= 9);
        let grid = grid();
        let clues = result.clues();
        let report = DerivationEngine::new(&grid)
            .run(&singles(), &PuzzleView::new(&clues))
            .unwrap();
        assert!(report.holds());
    }

    #[test]
    fn test_solution_first_and_joint_search_agree() {
        let constraints = [
            Constraint::HiddenCount { min: 9, max: 16 },
            Constraint::Strategy(StrategyRequirement::holds(singles())),
        ];
        for solution_first in [true, false] {
            let result = Synthesizer::new()
                .with_config(SynthesisConfig::default().with_solution_first(solution_first))
                .synthesize(&grid(), &constraints, Some(Duration::from_secs(60)))
                .unwrap()
                .unwrap();
            assert!(result.hidden_count() >= 9);
            assert_eq!(completions(&grid(), &result.clues()), [result.solution]);
        }
    }

    #[test]
    fn test_undeducible_input_options() {
        let options = Undeducibility::new()
            .with_alternatives(2)
            .with_exclusive(true)
            .with_unique_alternatives(true);
        let result = run(&[
            Constraint::InputCell {
                location: None,
                solution: None,
                decoy: None,
            },
            Constraint::InputCellUndeducible(options),
        ])
        .unwrap();
        let input = result.interface.input.unwrap();
        let found = completions(&grid(), &result.clues());
        let mut values = found.iter().map(|s| s.get(input.cell)).collect::<Vec<_>>();
        values.sort_unstable();
        let mut distinct = values.clone();
        distinct.dedup();

        // The true value and exactly two alternatives, each completing once.
        assert_eq!(distinct.len(), 3);
        assert!(distinct.contains(&result.solution.get(input.cell)));
        assert!(distinct.contains(&input.decoy));
        for value in distinct {
            let count = values.iter().filter(|v| **v == value).count();
            if value != result.solution.get(input.cell) {
                assert_eq!(count, 1);
            }
        }
    }

    #[test]
    fn test_highlight_strike() {
        let target = Cell::new(1, 2);
        let mut rules = rule::elementary_rules();
        rules.push(Box::new(rule::HighlightStrikeDerivable::new()));
        let spotted = Strategy::single(Stage::new("spotted", rules).unwrap());
        let result = run(&[
            Constraint::HiddenCount { min: 10, max: 10 },
            Constraint::OpenCell(target),
            Constraint::HighlightStrike {
                cell: Some(target),
                value: None,
            },
            Constraint::Strategy(StrategyRequirement::holds(spotted.clone())),
        ])
        .unwrap();
        let (cell, value) = result.highlight.unwrap();
        assert_eq!(cell, target);
        assert_ne!(result.solution.get(cell), value);

        let grid = grid();
        let clues = result.clues();
        let view = PuzzleView::new(&clues).with_highlight(cell, value);
        assert!(DerivationEngine::new(&grid).run(&spotted, &view).unwrap().holds());
    }
}

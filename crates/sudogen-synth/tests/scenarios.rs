use std::time::Duration;

use proptest::prelude::*;
use sudogen_core::{Cell, CellSet, Clues, Grid, Solution, Value};
use sudogen_deduce::{
    DerivationEngine, FactCategories, PuzzleView, Stage, Strategy as DeductionStrategy,
    StrategyRequirement, rule,
};
use sudogen_synth::{Constraint, PuzzleResult, SplrBackend, Synthesizer, UniquenessOracle, Verdict};

const TIMEOUT: Duration = Duration::from_secs(600);

fn synthesize(grid: &Grid, constraints: &[Constraint]) -> PuzzleResult {
    Synthesizer::new()
        .synthesize(grid, constraints, Some(TIMEOUT))
        .unwrap()
        .expect("a puzzle exists")
}

fn assert_unique(grid: &Grid, result: &PuzzleResult) {
    let oracle = UniquenessOracle::new(grid, &SplrBackend);
    assert_eq!(
        oracle
            .alternative(&result.clues(), &result.solution, None)
            .unwrap(),
        Verdict::Unique
    );
}

fn holds(grid: &Grid, strategy: &DeductionStrategy, clues: &Clues) -> bool {
    DerivationEngine::new(grid)
        .run(strategy, &PuzzleView::new(clues))
        .unwrap()
        .holds()
}

#[test]
fn ten_hidden_cells_with_unique_solution() {
    let grid = Grid::regular(9).unwrap();
    let result = synthesize(
        &grid,
        &[
            Constraint::HiddenCount { min: 10, max: 10 },
            Constraint::UniqueSolution,
        ],
    );
    result.solution.validate(&grid).unwrap();
    assert_eq!(result.hidden_count(), 10);
    assert_eq!(result.clues().hidden_count(), 10);
    assert_unique(&grid, &result);
}

#[test]
fn singles_solve_the_puzzle() {
    let grid = Grid::regular(9).unwrap();
    let mut rules = rule::singles_rules();
    rules.push(rule::rule_by_name("solved").unwrap());
    let singles = DeductionStrategy::single(Stage::new("singles", rules).unwrap());

    let result = synthesize(
        &grid,
        &[
            Constraint::HiddenCount { min: 40, max: 50 },
            Constraint::Strategy(StrategyRequirement::holds(singles.clone())),
        ],
    );
    assert!((40..=50).contains(&result.hidden_count()));

    let clues = result.clues();
    let report = DerivationEngine::new(&grid)
        .run(&singles, &PuzzleView::new(&clues))
        .unwrap();
    assert!(report.holds());
    assert!(report.stages()[0].is_solved());
    // A deduction that fills every cell cannot leave room for another solution.
    assert_unique(&grid, &result);
}

/// Elementary closure leaves cells open, locked candidates then unlock the
/// singles, and a final check requires the grid to be solved.
fn chain(with_locked_candidates: bool) -> DeductionStrategy {
    let mut first = rule::elementary_rules();
    first.push(rule::rule_by_name("unsolved").unwrap());
    let mut second = rule::singles_rules();
    if with_locked_candidates {
        second.push(rule::rule_by_name("locked candidates").unwrap());
    }
    let mut third = rule::elementary_rules();
    third.push(rule::rule_by_name("solved").unwrap());

    DeductionStrategy::linear(
        [
            Stage::new("elementary", first).unwrap(),
            Stage::new("technique", second).unwrap(),
            Stage::new("check", third).unwrap(),
        ],
        FactCategories::all(),
    )
}

#[test]
fn chained_technique_is_required() {
    let grid = Grid::regular(9).unwrap();
    let result = synthesize(
        &grid,
        &[
            Constraint::Strategy(StrategyRequirement::holds(chain(true))),
            Constraint::Strategy(StrategyRequirement::fails(chain(false))),
        ],
    );

    let clues = result.clues();
    assert!(holds(&grid, &chain(true), &clues));
    assert!(!holds(&grid, &chain(false), &clues));
    assert_unique(&grid, &result);
}

fn count_solutions(grid: &Grid, clues: &Clues, limit: usize) -> usize {
    fn search(grid: &Grid, values: &mut [Option<Value>], index: usize, count: &mut usize, limit: usize) {
        if *count >= limit {
            return;
        }
        let Some(offset) = values[index..].iter().position(Option::is_none) else {
            *count += 1;
            return;
        };
        let cell = Cell::from_index(index + offset, grid.size());
        for value in grid.values() {
            let clash = grid
                .peers(cell)
                .iter()
                .any(|peer| values[peer.index(grid.size())] == Some(value));
            if !clash {
                values[index + offset] = Some(value);
                search(grid, values, index + offset + 1, count, limit);
                values[index + offset] = None;
            }
        }
    }

    let mut values = clues.iter().map(|(_, v)| v).collect::<Vec<_>>();
    let mut count = 0;
    search(grid, &mut values, 0, &mut count, limit);
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn oracle_agrees_with_exhaustive_search(bits in prop::collection::vec(any::<bool>(), 16)) {
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let mut mask = CellSet::new(4);
        for (cell, hide) in grid.cells().zip(&bits) {
            if *hide {
                mask.insert(cell);
            }
        }
        let clues = solution.to_clues(&mask);

        let oracle = UniquenessOracle::new(&grid, &SplrBackend);
        let verdict = oracle.alternative(&clues, &solution, None).unwrap();
        let unique = count_solutions(&grid, &clues, 2) == 1;
        prop_assert_eq!(verdict.is_unique(), unique);
        if let Verdict::Alternative(other) = verdict {
            prop_assert!(other.agrees_with(&clues));
            prop_assert_ne!(other, solution);
        }
    }
}

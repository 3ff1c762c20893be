//! Test harness for rules.
//!
//! [`RuleTester`] evaluates rules on a small puzzle and, on every run, checks
//! that the concrete closure agrees with the closure of the rules' ground
//! instances.

use sudogen_core::{Cell, Clues, Grid, Interface, Solution, Value};

use crate::{
    DerivationEngine, Fact, FactStore, GroupFilter, PuzzleView, Stage, StageReport,
    rule::{BoxedRule, Rule},
};

#[derive(Debug)]
pub(crate) struct RuleTester {
    grid: Grid,
    clues: Clues,
    solution: Option<Solution>,
    interface: Interface,
    highlight: Option<(Cell, Value)>,
    seeds: FactStore,
    groups: GroupFilter,
    report: Option<StageReport>,
}

impl RuleTester {
    #[track_caller]
    pub(crate) fn new(grid: Grid, puzzle: &str) -> Self {
        let clues: Clues = puzzle.parse().unwrap();
        assert_eq!(clues.size(), grid.size(), "puzzle does not fit the grid");
        let seeds = FactStore::new(grid.size());
        Self {
            grid,
            clues,
            solution: None,
            interface: Interface::default(),
            highlight: None,
            seeds,
            groups: GroupFilter::All,
            report: None,
        }
    }

    #[track_caller]
    pub(crate) fn with_solution(mut self, solution: &str) -> Self {
        self.solution = Some(solution.parse().unwrap());
        self
    }

    pub(crate) fn with_interface(mut self, interface: Interface) -> Self {
        self.interface = interface;
        self
    }

    pub(crate) fn with_highlight(mut self, cell: Cell, value: u8) -> Self {
        self.highlight = Some((cell, Value::new(value)));
        self
    }

    pub(crate) fn with_groups(mut self, groups: GroupFilter) -> Self {
        self.groups = groups;
        self
    }

    /// Seeds strikes for every value of `cell` outside `values`.
    pub(crate) fn with_candidates<const N: usize>(mut self, cell: Cell, values: [u8; N]) -> Self {
        for value in self.grid.values() {
            if !values.contains(&value.get()) {
                self.seeds.insert(Fact::Strike(cell, value));
            }
        }
        self
    }

    pub(crate) fn with_strikes<const N: usize>(mut self, cell: Cell, values: [u8; N]) -> Self {
        for value in values {
            self.seeds.insert(Fact::Strike(cell, Value::new(value)));
        }
        self
    }

    pub(crate) fn with_seeds<I>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = Fact>,
    {
        self.seeds.extend(facts);
        self
    }

    #[track_caller]
    pub(crate) fn apply<R>(self, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.apply_all([rule.clone_box()])
    }

    #[track_caller]
    pub(crate) fn apply_all<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = BoxedRule>,
    {
        let stage = Stage::new("test", rules.into_iter().collect())
            .unwrap()
            .with_groups(self.groups.clone());
        stage.check_grid(&self.grid).unwrap();

        let mut view = PuzzleView::new(&self.clues).with_interface(self.interface);
        if let Some(solution) = &self.solution {
            view = view.with_solution(solution);
        }
        if let Some((cell, value)) = self.highlight {
            view = view.with_highlight(cell, value);
        }
        let report = DerivationEngine::new(&self.grid)
            .close(&stage, &view, &self.seeds)
            .unwrap();

        let scope = stage.scope(&self.grid);
        let grounded = stage.ground(&scope).closure(&view, &self.seeds);
        assert_eq!(
            report.closure.to_sorted_vec(),
            grounded.to_sorted_vec(),
            "concrete and ground closures differ"
        );

        self.report = Some(report);
        self
    }

    #[track_caller]
    fn report(&self) -> &StageReport {
        self.report.as_ref().expect("no rule applied yet")
    }

    #[track_caller]
    pub(crate) fn closure(&self) -> &FactStore {
        &self.report().closure
    }

    #[track_caller]
    pub(crate) fn assert_derived(self, fact: Fact) -> Self {
        assert!(self.closure().contains(&fact), "{fact} was not derived");
        self
    }

    #[track_caller]
    pub(crate) fn assert_not_derived(self, fact: Fact) -> Self {
        assert!(!self.closure().contains(&fact), "{fact} was derived");
        self
    }

    #[track_caller]
    pub(crate) fn assert_struck<I>(self, cell: Cell, values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        for value in values {
            let value = Value::new(value);
            assert!(
                self.closure().is_struck(cell, value),
                "{value} is not struck at {cell}"
            );
        }
        self
    }

    #[track_caller]
    pub(crate) fn assert_not_struck<I>(self, cell: Cell, values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        for value in values {
            let value = Value::new(value);
            assert!(
                !self.closure().is_struck(cell, value),
                "{value} is struck at {cell}"
            );
        }
        self
    }

    #[track_caller]
    pub(crate) fn assert_solved(self) -> Self {
        assert!(self.closure().is_solved(), "closure does not solve the puzzle");
        self
    }

    #[track_caller]
    pub(crate) fn assert_stable(self, expected: bool) -> Self {
        assert_eq!(self.report().stable, expected, "unexpected stability");
        self
    }
}

//! Strategies: stages chained by forward-only edges.

use sudogen_core::Grid;

use crate::{FactCategories, Stage, StageError, StageReport};

/// Index of a stage within a [`Strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("stage #{_0}")]
pub struct StageId(pub usize);

/// Forwards the facts of `source`'s closure in `forward` to `target`'s seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainEdge {
    /// The stage whose closure is forwarded.
    pub source: StageId,
    /// The stage receiving the facts.
    pub target: StageId,
    /// The categories of facts forwarded.
    pub forward: FactCategories,
}

/// An error building a [`Strategy`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StrategyError {
    /// An edge names a stage that does not exist.
    #[display("{stage} does not exist")]
    UnknownStage {
        /// The missing stage.
        stage: StageId,
    },
    /// An edge does not point to a later stage.
    #[display("edge from {from} to {to} does not point forward")]
    BackwardEdge {
        /// The source stage.
        from: StageId,
        /// The target stage.
        to: StageId,
    },
    /// The edge already exists.
    #[display("edge from {from} to {to} already exists")]
    DuplicateEdge {
        /// The source stage.
        from: StageId,
        /// The target stage.
        to: StageId,
    },
}

/// Stages evaluated in order, each seeded with facts forwarded from earlier
/// stages.
///
/// Edges always point from an earlier stage to a later one, so a strategy is
/// evaluated in a single pass and no stage is revisited. A stage may feed
/// several later stages.
///
/// # Examples
///
/// ```
/// use sudogen_deduce::{FactCategories, Stage, Strategy, rule};
///
/// let mut strategy = Strategy::new();
/// let easy = strategy.add_stage(Stage::new("easy", rule::singles_rules())?);
/// let hard = strategy.add_stage(Stage::new("hard", rule::all_rules())?);
/// strategy.chain(easy, hard, FactCategories::all())?;
/// assert!(strategy.chain(hard, easy, FactCategories::all()).is_err());
/// assert_eq!(strategy.incoming(hard).count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    stages: Vec<Stage>,
    edges: Vec<ChainEdge>,
}

impl Strategy {
    /// Creates an empty strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A strategy of one stage.
    #[must_use]
    pub fn single(stage: Stage) -> Self {
        Self {
            stages: vec![stage],
            edges: Vec::new(),
        }
    }

    /// Stages chained one after another, each forwarding `forward` to the
    /// next.
    #[must_use]
    pub fn linear<I>(stages: I, forward: FactCategories) -> Self
    where
        I: IntoIterator<Item = Stage>,
    {
        let stages = stages.into_iter().collect::<Vec<_>>();
        let edges = (1..stages.len())
            .map(|i| ChainEdge {
                source: StageId(i - 1),
                target: StageId(i),
                forward,
            })
            .collect();
        Self { stages, edges }
    }

    /// Appends a stage and returns its id.
    pub fn add_stage(&mut self, stage: Stage) -> StageId {
        self.stages.push(stage);
        StageId(self.stages.len() - 1)
    }

    /// Adds an edge forwarding `forward` facts from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if either stage does not exist, if `target` does not
    /// come after `source`, or if the edge already exists.
    pub fn chain(
        &mut self,
        source: StageId,
        target: StageId,
        forward: FactCategories,
    ) -> Result<(), StrategyError> {
        for stage in [source, target] {
            if stage.0 >= self.stages.len() {
                return Err(StrategyError::UnknownStage { stage });
            }
        }
        if target <= source {
            return Err(StrategyError::BackwardEdge {
                from: source,
                to: target,
            });
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(StrategyError::DuplicateEdge {
                from: source,
                to: target,
            });
        }
        self.edges.push(ChainEdge {
            source,
            target,
            forward,
        });
        Ok(())
    }

    /// Returns the stages in evaluation order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns a stage.
    ///
    /// # Panics
    ///
    /// Panics if the stage does not exist.
    #[must_use]
    pub fn stage(&self, id: StageId) -> &Stage {
        &self.stages[id.0]
    }

    /// Returns the edges.
    #[must_use]
    pub fn edges(&self) -> &[ChainEdge] {
        &self.edges
    }

    /// Iterates over the edges into `target`.
    pub fn incoming(&self, target: StageId) -> impl Iterator<Item = &ChainEdge> {
        self.edges.iter().filter(move |e| e.target == target)
    }

    /// Iterates over the stage ids.
    pub fn ids(&self) -> impl Iterator<Item = StageId> + use<> {
        (0..self.stages.len()).map(StageId)
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the strategy has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Checks every stage against `grid`.
    ///
    /// # Errors
    ///
    /// Returns the first stage's error.
    pub fn check_grid(&self, grid: &Grid) -> Result<(), StageError> {
        self.stages.iter().try_for_each(|s| s.check_grid(grid))
    }
}

/// Whether a strategy's stability is required to hold or to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Expectation {
    /// Every stage's stability predicate holds.
    Holds,
    /// At least one stage's stability predicate fails.
    Fails,
}

/// A strategy together with the outcome the puzzle must produce.
#[derive(Debug, Clone)]
pub struct StrategyRequirement {
    /// The strategy.
    pub strategy: Strategy,
    /// The required outcome.
    pub expectation: Expectation,
}

impl StrategyRequirement {
    /// Requires `strategy` to hold.
    #[must_use]
    pub fn holds(strategy: Strategy) -> Self {
        Self {
            strategy,
            expectation: Expectation::Holds,
        }
    }

    /// Requires `strategy` to fail.
    #[must_use]
    pub fn fails(strategy: Strategy) -> Self {
        Self {
            strategy,
            expectation: Expectation::Fails,
        }
    }

    /// Returns `true` if `report` meets the expectation.
    #[must_use]
    pub fn is_met(&self, report: &StrategyReport) -> bool {
        report.holds() == self.expectation.is_holds()
    }
}

/// The per-stage outcome of running a [`Strategy`].
#[derive(Debug, Clone)]
pub struct StrategyReport {
    stages: Vec<StageReport>,
}

impl StrategyReport {
    pub(crate) fn new(stages: Vec<StageReport>) -> Self {
        Self { stages }
    }

    /// Returns `true` if every stage is stable.
    #[must_use]
    pub fn holds(&self) -> bool {
        self.stages.iter().all(|s| s.stable)
    }

    /// Returns the report of one stage.
    ///
    /// # Panics
    ///
    /// Panics if the stage does not exist.
    #[must_use]
    pub fn stage(&self, id: StageId) -> &StageReport {
        &self.stages[id.0]
    }

    /// Returns the reports in stage order.
    #[must_use]
    pub fn stages(&self) -> &[StageReport] {
        &self.stages
    }
}

//! Rule-based derivation over Sudoku-family grids.
//!
//! A puzzle is read as a set of [`Fact`]s: placed values, struck candidates,
//! and the composite patterns (naked sets, conjugate pairs, colors, chain
//! links) that advanced techniques reason with. Rules turn facts into more
//! facts; a [`Stage`] bundles rules with the groups they may look at, and a
//! [`Strategy`] chains stages so that each one starts from what its
//! predecessors forwarded.
//!
//! Every rule exists in two shapes. The concrete shape drives the
//! [`DerivationEngine`], which computes closures on real puzzles. The ground
//! shape ([`Grounding`], [`GroundProgram`]) spells out every instance of the
//! rule as a Horn clause, which is what a symbolic encoder needs to search for
//! puzzles whose closure behaves a certain way.
//!
//! # Examples
//!
//! ```
//! use sudogen_core::{Clues, Grid};
//! use sudogen_deduce::{DerivationEngine, PuzzleView, Stage, Strategy, rule};
//!
//! let grid = Grid::regular(4)?;
//! let clues: Clues = "1... ..1. .3.. ...2".parse()?;
//!
//! let mut rules = rule::singles_rules();
//! rules.push(Box::new(rule::Solved::new()));
//! let strategy = Strategy::single(Stage::new("singles", rules)?);
//!
//! let report = DerivationEngine::new(&grid).run(&strategy, &PuzzleView::new(&clues))?;
//! assert!(report.holds());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    condition::Condition,
    engine::{DerivationEngine, DerivationError, StageReport},
    fact::{Fact, FactCategories, FactKind, FactStore, MaskTag},
    ground::{Atom, GroundProgram, GroundRule, Grounding},
    puzzle_view::{PuzzleAtom, PuzzleView},
    rule::{BoxedRule, Evaluation, Rule, Stratum},
    scope::{GroupFilter, Scope},
    stage::{Stage, StageError},
    strategy::{
        ChainEdge, Expectation, StageId, Strategy, StrategyError, StrategyReport,
        StrategyRequirement,
    },
};

mod condition;
mod engine;
mod fact;
mod ground;
mod puzzle_view;
pub mod rule;
mod scope;
mod stage;
mod strategy;

#[cfg(test)]
mod testing;

//! Puzzle synthesis through a SAT solver.
//!
//! A request is a list of [`Constraint`]s: the shape of the mask, fixed
//! cells, a unique solution, interface cells, and strategy requirements
//! ("solvable with singles", "not solvable with singles but solvable once
//! pairs are allowed"). Everything is compiled into one CNF [`Formula`] over
//! the solution and mask variables and handed to a [`SatBackend`]; the model
//! is decoded into a [`PuzzleResult`].
//!
//! - Strategy requirements are encoded symbolically from the ground rules of
//!   each stage, so the solver searches for puzzles whose closures behave as
//!   required instead of testing candidates one by one.
//! - Uniqueness is checked by the [`UniquenessOracle`], whose saturation
//!   clauses are added to the main formula until a candidate has no
//!   alternative solution. The main formula only grows, so one
//!   [`SatSession`] decides it across refinements and objective steps.
//! - Objectives tighten the hidden-cell count until the solver gives up or
//!   the deadline passes.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use sudogen_core::Grid;
//! use sudogen_deduce::{Stage, Strategy, StrategyRequirement, rule};
//! use sudogen_synth::{Constraint, synthesize};
//!
//! let grid = Grid::regular(4)?;
//! let mut rules = rule::singles_rules();
//! rules.push(Box::new(rule::Solved::new()));
//! let singles = Strategy::single(Stage::new("singles", rules)?);
//!
//! let constraints = [
//!     Constraint::HiddenCount { min: 10, max: 16 },
//!     Constraint::UniqueSolution,
//!     Constraint::Strategy(StrategyRequirement::holds(singles)),
//! ];
//! if let Some(result) = synthesize(&grid, &constraints, Some(Duration::from_secs(30)))? {
//!     assert!(result.hidden_count() >= 10);
//!     println!("{}", result.to_pretty_string(&grid));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    backend::{BackendError, Model, SatBackend, SatSession, SolveOutcome, SplrBackend, SplrSession},
    cnf::{Formula, Lit},
    constraint::{Constraint, Symmetry, Undeducibility},
    error::SynthError,
    result::{PuzzleResult, ShuffleError},
    synthesizer::{SynthesisConfig, Synthesizer, synthesize},
    uniqueness::{UniquenessOracle, Verdict},
    validate::{Contradiction, ContradictionReport, validate},
};

mod backend;
mod cnf;
mod constraint;
mod derivation;
mod encoder;
mod error;
mod result;
mod synthesizer;
mod uniqueness;
mod validate;

//! Grid model for Sudoku-family puzzles.
//!
//! This crate defines the fixed geometry every other part of sudogen reads:
//!
//! - [`Cell`] and [`Value`]: coordinates and domain values.
//! - [`Group`], [`GroupKind`], [`GroupId`]: all-different constraints, typed
//!   so rules and stages can select rows, columns, blocks or variant shapes.
//! - [`Grid`] and [`GridBuilder`]: regular grids, rectangular blocks
//!   (RokuDoku, DozenDoku), diagonals, anti-king and anti-knight pairs, and
//!   custom groups.
//! - [`Variant`]: named shapes (X, Y, four-square, CrossDoku, TriangleDoku
//!   and rectangular-block grids) ready to build or extend.
//! - [`Solution`], [`Clues`], [`CellSet`]: full assignments, playable
//!   puzzles and masks of hidden cells, with short and pretty text forms.
//! - [`MaskPattern`]: per-cell visibility requirements used both as
//!   synthesis constraints and as stability targets, with a small library
//!   of named 9x9 layouts.
//! - [`Interface`]: designated input and output cells of composable puzzles.
//!
//! # Examples
//!
//! ```
//! use sudogen_core::{Cell, CellSet, Grid, Solution};
//!
//! let grid = Grid::regular(4)?;
//! let solution: Solution = "1234 3412 2143 4321".parse()?;
//! solution.validate(&grid)?;
//!
//! let mut mask = CellSet::new(grid.size());
//! mask.insert(Cell::new(1, 1));
//! let clues = solution.to_clues(&mask);
//! clues.check_consistency(&grid)?;
//! assert_eq!(clues.to_short_string(), "12343.1221434321");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell;
pub mod cell_set;
pub mod grid;
pub mod group;
pub mod interface;
pub mod mask_pattern;
pub mod puzzle;
pub mod value;
pub mod variant;

pub use self::{
    cell::Cell,
    cell_set::CellSet,
    grid::{BlockShape, Grid, GridBuilder, GridError},
    group::{Group, GroupId, GroupKind},
    interface::{Interface, InterfaceCell},
    mask_pattern::{LIBRARY as MASK_LIBRARY, MaskPattern, MaskSymbol},
    puzzle::{Clues, ConsistencyError, ParseError, Solution},
    value::{MAX_SIZE, Value},
    variant::Variant,
};

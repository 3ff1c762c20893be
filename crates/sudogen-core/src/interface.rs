//! Designated input and output cells of "interface" puzzles.

use crate::{Cell, Value};

/// A hidden cell singled out by an interface puzzle, together with a decoy
/// value that differs from the cell's true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceCell {
    /// Location of the designated cell.
    pub cell: Cell,
    /// A plausible wrong value for the cell.
    pub decoy: Value,
}

/// The input and output cells of an interface puzzle.
///
/// An interface puzzle is meant to be composed with other puzzles: the value
/// of the input cell is supplied from outside, and the value of the output
/// cell is what the solver hands on. Either side may be absent.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, Interface, InterfaceCell, Value};
///
/// let interface = Interface {
///     input: Some(InterfaceCell { cell: Cell::new(0, 0), decoy: Value::new(2) }),
///     output: None,
/// };
/// assert!(interface.is_input(Cell::new(0, 0)));
/// assert!(!interface.is_output(Cell::new(0, 0)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interface {
    /// The input cell, if any.
    pub input: Option<InterfaceCell>,
    /// The output cell, if any.
    pub output: Option<InterfaceCell>,
}

impl Interface {
    /// Returns `true` if `cell` is the input cell.
    #[must_use]
    pub fn is_input(&self, cell: Cell) -> bool {
        self.input.is_some_and(|i| i.cell == cell)
    }

    /// Returns `true` if `cell` is the output cell.
    #[must_use]
    pub fn is_output(&self, cell: Cell) -> bool {
        self.output.is_some_and(|o| o.cell == cell)
    }
}

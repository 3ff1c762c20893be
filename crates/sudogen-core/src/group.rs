//! Groups of cells constrained to all-different values.

use std::fmt::{self, Display};

use crate::Cell;

/// The shape family a group belongs to.
///
/// Rules that only make sense for particular shapes (fish patterns need rows
/// and columns) select groups by kind; stages can restrict the groups they
/// consider by kind as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKind {
    /// A full row.
    Row,
    /// A full column.
    Column,
    /// A rectangular block.
    Block,
    /// A main diagonal (X-Sudoku).
    Diagonal,
    /// A pair of cells related by a move (anti-king, anti-knight variants).
    Adjacency,
    /// Any other user-supplied shape.
    Custom,
}

impl Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Block => "block",
            Self::Diagonal => "diagonal",
            Self::Adjacency => "adjacency",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Index of a group within its [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display("g{_0}")]
pub struct GroupId(pub u16);

impl GroupId {
    /// Returns the index as `usize`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named, typed set of cells whose values must all differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    kind: GroupKind,
    name: String,
    cells: Vec<Cell>,
}

impl Group {
    pub(crate) fn new(kind: GroupKind, name: String, mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        Self { kind, name, cells }
    }

    /// Returns the group kind.
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Returns the group name, e.g. `"row 3"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the number of member cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the group has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if the cell belongs to this group.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }
}

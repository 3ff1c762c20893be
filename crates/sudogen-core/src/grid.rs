//! Grid model: cells, groups, and the peer relation.

use std::collections::HashSet;

use crate::{Cell, Group, GroupId, GroupKind, Value, value::MAX_SIZE, variant::square_root};

/// An error building a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// The grid side is zero or too large for single-character values.
    #[display("grid size {size} is outside 1..={MAX_SIZE}")]
    InvalidSize {
        /// The rejected side.
        size: u8,
    },
    /// The requested blocks do not tile the grid.
    #[display("{width}x{height} blocks do not tile a {size}x{size} grid")]
    InvalidBlockShape {
        /// Grid side.
        size: u8,
        /// Block width.
        width: u8,
        /// Block height.
        height: u8,
    },
    /// A group mentions a cell outside the grid.
    #[display("group {name:?} contains {cell}, which lies outside the grid")]
    CellOutOfBounds {
        /// Group name.
        name: String,
        /// Offending cell.
        cell: Cell,
    },
    /// A group lists the same cell twice.
    #[display("group {name:?} lists {cell} twice")]
    DuplicateCell {
        /// Group name.
        name: String,
        /// Offending cell.
        cell: Cell,
    },
    /// A group has no cells.
    #[display("group {name:?} has no cells")]
    EmptyGroup {
        /// Group name.
        name: String,
    },
    /// A named variant does not exist at this size.
    #[display("{variant} grids cannot have side {size}")]
    UnsupportedSize {
        /// Variant name.
        variant: &'static str,
        /// The rejected side.
        size: u8,
    },
    /// A group has more cells than there are values.
    #[display("group {name:?} has {len} cells but only {size} values exist")]
    GroupTooLarge {
        /// Group name.
        name: String,
        /// Number of cells in the group.
        len: usize,
        /// Domain size.
        size: u8,
    },
}

/// Block dimensions of a grid with rectangular blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockShape {
    /// Block width in cells.
    pub width: u8,
    /// Block height in cells.
    pub height: u8,
}

/// A square grid of side `size` with value domain `1..=size` and a list of
/// all-different groups.
///
/// Grids are immutable once built. Every rule and constraint reads its
/// geometry from here: group membership, peers (cells sharing at least one
/// group) and whether a group is *full* (has exactly `size` cells, so every
/// value must appear in it).
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, Grid, GroupKind};
///
/// let grid = Grid::regular(9)?;
/// assert_eq!(grid.num_cells(), 81);
/// assert_eq!(grid.groups().len(), 27);
/// assert_eq!(grid.peers(Cell::new(0, 0)).len(), 20);
/// assert!(grid.share_group(Cell::new(0, 0), Cell::new(2, 2)));
///
/// let roku = Grid::with_blocks(3, 2)?;
/// assert_eq!(roku.size(), 6);
/// assert_eq!(
///     roku.groups().iter().filter(|g| g.kind() == GroupKind::Block).count(),
///     6
/// );
/// # Ok::<(), sudogen_core::GridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    size: u8,
    block_shape: Option<BlockShape>,
    groups: Vec<Group>,
    memberships: Vec<Vec<GroupId>>,
    peers: Vec<Vec<Cell>>,
}

impl Grid {
    /// A standard grid: rows, columns and square blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not a perfect square in range.
    pub fn regular(size: u8) -> Result<Self, GridError> {
        let root = square_root(size)?;
        Self::with_blocks(root, root)
    }

    /// A grid of side `width * height` with rows, columns and
    /// `width`×`height` blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting size is out of range.
    pub fn with_blocks(width: u8, height: u8) -> Result<Self, GridError> {
        let size = width
            .checked_mul(height)
            .ok_or(GridError::InvalidSize { size: 0 })?;
        GridBuilder::new(size)
            .rows()
            .columns()
            .blocks(width, height)
            .build()
    }

    /// A Latin square: rows and columns only.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is out of range.
    pub fn latin(size: u8) -> Result<Self, GridError> {
        GridBuilder::new(size).rows().columns().build()
    }

    /// Returns the side length, which is also the domain size.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the block shape, if the grid was built with blocks.
    #[must_use]
    pub fn block_shape(&self) -> Option<BlockShape> {
        self.block_shape
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + Clone + use<> {
        let size = self.size;
        (0..self.num_cells()).map(move |i| Cell::from_index(i, size))
    }

    /// Iterates over the value domain.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = Value> + ExactSizeIterator + Clone + use<> {
        Value::domain(self.size)
    }

    /// Returns `true` if the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x() < self.size && cell.y() < self.size
    }

    /// Returns `true` if the value belongs to the domain.
    #[must_use]
    pub fn contains_value(&self, value: Value) -> bool {
        value.get() <= self.size
    }

    /// Returns the row-major index of a cell.
    #[must_use]
    pub fn index_of(&self, cell: Cell) -> usize {
        cell.index(self.size)
    }

    /// Returns the cell at a row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::from_index(index, self.size)
    }

    /// Returns all groups.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Iterates over group ids together with their groups.
    pub fn groups_with_ids(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId(u16::try_from(i).unwrap_or(u16::MAX)), g))
    }

    /// Returns a group by id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this grid.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    /// Returns `true` if the group has exactly one cell per value.
    #[must_use]
    pub fn is_full(&self, id: GroupId) -> bool {
        self.group(id).len() == usize::from(self.size)
    }

    /// Returns the ids of the groups containing a cell.
    #[must_use]
    pub fn groups_of(&self, cell: Cell) -> &[GroupId] {
        &self.memberships[self.index_of(cell)]
    }

    /// Returns every other cell sharing at least one group with `cell`.
    #[must_use]
    pub fn peers(&self, cell: Cell) -> &[Cell] {
        &self.peers[self.index_of(cell)]
    }

    /// Returns `true` if two distinct cells share a group.
    #[must_use]
    pub fn share_group(&self, a: Cell, b: Cell) -> bool {
        a != b && self.peers(a).binary_search(&b).is_ok()
    }

    /// Returns `true` if the cell permutation `map` sends every group onto a
    /// group, i.e. it is a symmetry of the grid.
    pub fn admits<F>(&self, map: F) -> bool
    where
        F: Fn(Cell) -> Cell,
    {
        let shapes = self
            .groups
            .iter()
            .map(|g| g.cells().to_vec())
            .collect::<HashSet<_>>();
        self.groups.iter().all(|g| {
            let mut image = g.cells().iter().map(|c| map(*c)).collect::<Vec<_>>();
            image.sort_unstable();
            shapes.contains(&image)
        })
    }
}

/// Incremental construction of a [`Grid`].
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, GridBuilder};
///
/// // X-Sudoku with anti-knight constraint.
/// let grid = GridBuilder::new(9)
///     .rows()
///     .columns()
///     .blocks(3, 3)
///     .diagonals()
///     .anti_knight()
///     .build()?;
/// assert!(grid.share_group(Cell::new(0, 0), Cell::new(8, 8)));
/// assert!(grid.share_group(Cell::new(0, 0), Cell::new(1, 2)));
/// # Ok::<(), sudogen_core::GridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridBuilder {
    size: u8,
    block_shape: Option<BlockShape>,
    groups: Vec<(GroupKind, String, Vec<Cell>)>,
}

impl GridBuilder {
    /// Starts a grid of side `size` with no groups.
    #[must_use]
    pub fn new(size: u8) -> Self {
        Self {
            size,
            block_shape: None,
            groups: Vec::new(),
        }
    }

    /// Adds one group per row.
    #[must_use]
    pub fn rows(mut self) -> Self {
        for y in 0..self.size {
            let cells = (0..self.size).map(|x| Cell::new(x, y)).collect();
            self.groups
                .push((GroupKind::Row, format!("row {}", y + 1), cells));
        }
        self
    }

    /// Adds one group per column.
    #[must_use]
    pub fn columns(mut self) -> Self {
        for x in 0..self.size {
            let cells = (0..self.size).map(|y| Cell::new(x, y)).collect();
            self.groups
                .push((GroupKind::Column, format!("column {}", x + 1), cells));
        }
        self
    }

    /// Adds `width`×`height` blocks. Validated in [`GridBuilder::build`].
    #[must_use]
    pub fn blocks(mut self, width: u8, height: u8) -> Self {
        self.block_shape = Some(BlockShape { width, height });
        if width == 0 || height == 0 || self.size % width != 0 || self.size % height != 0 {
            return self;
        }
        let mut index = 0;
        for by in 0..self.size / height {
            for bx in 0..self.size / width {
                index += 1;
                let cells = (0..height)
                    .flat_map(|dy| (0..width).map(move |dx| Cell::new(bx * width + dx, by * height + dy)))
                    .collect();
                self.groups
                    .push((GroupKind::Block, format!("block {index}"), cells));
            }
        }
        self
    }

    /// Adds both main diagonals.
    #[must_use]
    pub fn diagonals(mut self) -> Self {
        let last = self.size.saturating_sub(1);
        let main = (0..self.size).map(|i| Cell::new(i, i)).collect();
        let anti = (0..self.size).map(|i| Cell::new(last - i, i)).collect();
        self.groups
            .push((GroupKind::Diagonal, "main diagonal".to_owned(), main));
        self.groups
            .push((GroupKind::Diagonal, "anti diagonal".to_owned(), anti));
        self
    }

    /// Forbids equal values a king's move apart.
    #[must_use]
    pub fn anti_king(self) -> Self {
        self.move_pairs("king", &[(1, 0), (0, 1), (1, 1), (1, -1)])
    }

    /// Forbids equal values a knight's move apart.
    #[must_use]
    pub fn anti_knight(self) -> Self {
        self.move_pairs("knight", &[(1, 2), (2, 1), (2, -1), (1, -2)])
    }

    /// Adds a custom group.
    #[must_use]
    pub fn group<I>(mut self, kind: GroupKind, name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        self.groups
            .push((kind, name.into(), cells.into_iter().collect()));
        self
    }

    fn move_pairs(mut self, label: &str, offsets: &[(i16, i16)]) -> Self {
        for index in 0..usize::from(self.size) * usize::from(self.size) {
            let cell = Cell::from_index(index, self.size);
            for &(dx, dy) in offsets {
                if let Some(other) = cell.offset(dx, dy, self.size) {
                    self.groups.push((
                        GroupKind::Adjacency,
                        format!("{label} {cell}-{other}"),
                        vec![cell, other],
                    ));
                }
            }
        }
        self
    }

    /// Validates the groups and computes memberships and peers.
    ///
    /// Adjacency pairs whose cells already share another group are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the size or block shape is invalid, or a group is
    /// empty, too large, out of bounds, or repeats a cell.
    pub fn build(self) -> Result<Grid, GridError> {
        let size = self.size;
        if size == 0 || size > MAX_SIZE {
            return Err(GridError::InvalidSize { size });
        }
        if let Some(BlockShape { width, height }) = self.block_shape
            && (width == 0 || height == 0 || u16::from(width) * u16::from(height) != u16::from(size))
        {
            return Err(GridError::InvalidBlockShape {
                size,
                width,
                height,
            });
        }

        let num_cells = usize::from(size) * usize::from(size);
        let mut groups = Vec::with_capacity(self.groups.len());
        let mut peer_sets = vec![Vec::<Cell>::new(); num_cells];
        let (regions, pairs): (Vec<_>, Vec<_>) = self
            .groups
            .into_iter()
            .partition(|(kind, _, _)| *kind != GroupKind::Adjacency);

        for (kind, name, cells) in regions.into_iter().chain(pairs) {
            let group = validate_group(size, kind, name, cells)?;
            if kind == GroupKind::Adjacency {
                let (a, b) = (group.cells()[0], group.cells()[group.len() - 1]);
                if peer_sets[a.index(size)].contains(&b) {
                    continue;
                }
            }
            for &a in group.cells() {
                for &b in group.cells() {
                    if a != b {
                        peer_sets[a.index(size)].push(b);
                    }
                }
            }
            groups.push(group);
        }

        let mut memberships = vec![Vec::new(); num_cells];
        for (i, group) in groups.iter().enumerate() {
            let id = GroupId(u16::try_from(i).unwrap_or(u16::MAX));
            for cell in group.cells() {
                memberships[cell.index(size)].push(id);
            }
        }
        for peers in &mut peer_sets {
            peers.sort_unstable();
            peers.dedup();
        }

        Ok(Grid {
            size,
            block_shape: self.block_shape,
            groups,
            memberships,
            peers: peer_sets,
        })
    }
}

fn validate_group(
    size: u8,
    kind: GroupKind,
    name: String,
    cells: Vec<Cell>,
) -> Result<Group, GridError> {
    if cells.is_empty() {
        return Err(GridError::EmptyGroup { name });
    }
    if cells.len() > usize::from(size) {
        return Err(GridError::GroupTooLarge {
            name,
            len: cells.len(),
            size,
        });
    }
    if let Some(&cell) = cells.iter().find(|c| c.x() >= size || c.y() >= size) {
        return Err(GridError::CellOutOfBounds { name, cell });
    }
    let group = Group::new(kind, name, cells);
    if let Some(pair) = group.cells().windows(2).find(|w| w[0] == w[1]) {
        return Err(GridError::DuplicateCell {
            name: group.name().to_owned(),
            cell: pair[0],
        });
    }
    Ok(group)
}

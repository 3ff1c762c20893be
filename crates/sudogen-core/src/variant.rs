//! Named grid shapes from the Sudoku family.

use crate::{Cell, Grid, GridBuilder, GridError, GroupKind};

/// Regions of CrossDoku, as `(x, y)` pairs. Four corners and a plus sign.
const CROSS_REGIONS: [[(u8, u8); 5]; 5] = [
    [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)],
    [(3, 0), (4, 0), (3, 1), (4, 1), (4, 2)],
    [(3, 3), (4, 3), (2, 4), (3, 4), (4, 4)],
    [(0, 2), (0, 3), (1, 3), (0, 4), (1, 4)],
    [(2, 1), (1, 2), (2, 2), (3, 2), (2, 3)],
];

/// Regions of TriangleDoku: corner triangles and two inner trapezoids.
const TRIANGLE_REGIONS: [[(u8, u8); 6]; 6] = [
    [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (0, 2)],
    [(3, 0), (4, 0), (5, 0), (4, 1), (5, 1), (5, 2)],
    [(2, 1), (3, 1), (1, 2), (2, 2), (3, 2), (4, 2)],
    [(0, 3), (0, 4), (1, 4), (0, 5), (1, 5), (2, 5)],
    [(1, 3), (2, 3), (3, 3), (4, 3), (2, 4), (3, 4)],
    [(5, 3), (4, 4), (5, 4), (3, 5), (4, 5), (5, 5)],
];

/// A named grid shape.
///
/// Every variant starts from rows and columns. [`Variant::builder`] returns
/// the unfinished [`GridBuilder`], so move constraints can be layered on top
/// of any shape.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, Variant};
///
/// let x = Variant::X(9).grid()?;
/// assert_eq!(x.groups().len(), 29);
/// assert!(x.share_group(Cell::new(0, 0), Cell::new(8, 8)));
///
/// // Anti-knight RokuDoku.
/// let grid = Variant::ROKUDOKU.builder()?.anti_knight().build()?;
/// assert_eq!(grid.size(), 6);
/// assert!(grid.share_group(Cell::new(0, 0), Cell::new(1, 2)));
/// # Ok::<(), sudogen_core::GridError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Square blocks on a grid whose side is a perfect square.
    Regular(u8),
    /// Rectangular blocks, `width` cells across and `height` cells down.
    Blocks {
        /// Block width.
        width: u8,
        /// Block height.
        height: u8,
    },
    /// Regular grid whose two main diagonals are groups as well.
    X(u8),
    /// Regular grid of odd side with a Y: two arms from the top corners to
    /// the center, sharing the stem down to the bottom edge.
    Y(u8),
    /// 9x9 regular grid with four extra 3x3 windows offset by one cell.
    FourSquare,
    /// 5x5 grid with irregular regions.
    CrossDoku,
    /// 6x6 grid with irregular regions.
    TriangleDoku,
}

impl Variant {
    /// 6x6 with 3x2 blocks.
    pub const ROKUDOKU: Self = Self::Blocks { width: 3, height: 2 };
    /// 12x12 with 4x3 blocks.
    pub const DOZENDOKU: Self = Self::Blocks { width: 4, height: 3 };

    /// Returns the grid side.
    #[must_use]
    pub const fn size(self) -> u8 {
        match self {
            Self::Regular(size) | Self::X(size) | Self::Y(size) => size,
            Self::Blocks { width, height } => width.saturating_mul(height),
            Self::FourSquare => 9,
            Self::CrossDoku => 5,
            Self::TriangleDoku => 6,
        }
    }

    /// Returns a builder holding the groups of this variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the side does not suit the variant: regular, X and
    /// Y grids need a perfect square, and Y grids need an odd one.
    pub fn builder(self) -> Result<GridBuilder, GridError> {
        let size = self.size();
        let lines = GridBuilder::new(size).rows().columns();
        let builder = match self {
            Self::Regular(_) => {
                let root = square_root(size)?;
                lines.blocks(root, root)
            }
            Self::Blocks { width, height } => lines.blocks(width, height),
            Self::X(_) => {
                let root = square_root(size)?;
                lines.blocks(root, root).diagonals()
            }
            Self::Y(_) => {
                let root = square_root(size)?;
                if size % 2 == 0 {
                    return Err(GridError::UnsupportedSize { variant: "Y", size });
                }
                let middle = size / 2;
                let stem = (middle..size).map(|y| Cell::new(middle, y)).collect::<Vec<_>>();
                let left = (0..middle).map(|i| Cell::new(i, i));
                let right = (0..middle).map(|i| Cell::new(size - 1 - i, i));
                lines
                    .blocks(root, root)
                    .group(GroupKind::Custom, "left arm", left.chain(stem.iter().copied()))
                    .group(GroupKind::Custom, "right arm", right.chain(stem))
            }
            Self::FourSquare => {
                let mut builder = lines.blocks(3, 3);
                for (index, (ox, oy)) in [(1, 1), (5, 1), (1, 5), (5, 5)].into_iter().enumerate() {
                    let cells = (0..3).flat_map(|dy| (0..3).map(move |dx| Cell::new(ox + dx, oy + dy)));
                    builder = builder.group(GroupKind::Custom, format!("window {}", index + 1), cells);
                }
                builder
            }
            Self::CrossDoku => regions(lines, &CROSS_REGIONS),
            Self::TriangleDoku => regions(lines, &TRIANGLE_REGIONS),
        };
        Ok(builder)
    }

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// See [`Variant::builder`] and [`GridBuilder::build`].
    pub fn grid(self) -> Result<Grid, GridError> {
        self.builder()?.build()
    }
}

pub(crate) fn square_root(size: u8) -> Result<u8, GridError> {
    (1..=size)
        .find(|r| u16::from(*r) * u16::from(*r) == u16::from(size))
        .ok_or(GridError::InvalidBlockShape {
            size,
            width: 0,
            height: 0,
        })
}

fn regions<const N: usize>(mut builder: GridBuilder, regions: &[[(u8, u8); N]]) -> GridBuilder {
    for (index, region) in regions.iter().enumerate() {
        let cells = region.iter().map(|&(x, y)| Cell::new(x, y));
        builder = builder.group(GroupKind::Block, format!("region {}", index + 1), cells);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Solution;

    fn assert_partitioned(grid: &Grid) {
        for cell in grid.cells() {
            let regions = grid
                .groups_of(cell)
                .iter()
                .filter(|id| grid.group(**id).kind() == GroupKind::Block)
                .count();
            assert_eq!(regions, 1, "{cell}");
        }
        assert!(grid.groups_with_ids().all(|(id, _)| grid.is_full(id)));
    }

    #[test]
    fn test_irregular_regions_partition_the_grid() {
        let cross = Variant::CrossDoku.grid().unwrap();
        assert_eq!(cross.groups().len(), 15);
        assert_partitioned(&cross);
        let triangle = Variant::TriangleDoku.grid().unwrap();
        assert_eq!(triangle.groups().len(), 18);
        assert_partitioned(&triangle);
        assert!(triangle.share_group(Cell::new(2, 1), Cell::new(4, 2)));
        assert_eq!(triangle.block_shape(), None);
    }

    #[test]
    fn test_x_sudoku_checks_diagonals() {
        let grid = Variant::X(4).grid().unwrap();
        let x: Solution = "1234 3412 4321 2143".parse().unwrap();
        assert!(x.validate(&grid).is_ok());
        let plain: Solution = "1234 3412 2143 4321".parse().unwrap();
        assert!(plain.validate(&Variant::Regular(4).grid().unwrap()).is_ok());
        assert!(plain.validate(&grid).is_err());
    }

    #[test]
    fn test_y_sudoku() {
        let grid = Variant::Y(9).grid().unwrap();
        assert_eq!(grid.groups().len(), 29);
        let arms = grid
            .groups()
            .iter()
            .filter(|g| g.kind() == GroupKind::Custom)
            .collect::<Vec<_>>();
        assert!(arms.iter().all(|g| g.len() == 9));
        assert!(arms.iter().all(|g| g.contains(Cell::new(4, 8))));
        assert!(grid.share_group(Cell::new(0, 0), Cell::new(4, 8)));
        assert!(grid.share_group(Cell::new(8, 0), Cell::new(4, 6)));
        assert_eq!(
            Variant::Y(4).grid().unwrap_err(),
            GridError::UnsupportedSize { variant: "Y", size: 4 }
        );
    }

    #[test]
    fn test_four_square_windows() {
        let grid = Variant::FourSquare.grid().unwrap();
        assert_eq!(grid.groups().len(), 31);
        assert_eq!(grid.groups_of(Cell::new(1, 1)).len(), 4);
        assert_eq!(grid.groups_of(Cell::new(4, 4)).len(), 3);
        assert!(grid.share_group(Cell::new(1, 1), Cell::new(3, 3)));
        assert!(grid.share_group(Cell::new(3, 1), Cell::new(1, 3)));
    }

    #[test]
    fn test_named_shapes() {
        assert_eq!(Variant::ROKUDOKU.size(), 6);
        assert_eq!(Variant::DOZENDOKU.grid().unwrap().groups().len(), 36);
        assert!(matches!(
            Variant::Regular(6).grid(),
            Err(GridError::InvalidBlockShape { .. })
        ));
        let grid = Variant::Regular(9).builder().unwrap().anti_king().build().unwrap();
        assert!(grid.share_group(Cell::new(2, 2), Cell::new(3, 3)));
    }
}

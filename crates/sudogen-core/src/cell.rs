//! Cell coordinates.

use std::fmt::{self, Display};

/// A cell coordinate: column `x` and row `y`, both zero-based.
///
/// Cells order row-major (`y` first, then `x`), which matches the order in
/// which grids are rendered and parsed.
///
/// # Examples
///
/// ```
/// use sudogen_core::Cell;
///
/// let cell = Cell::new(2, 0);
/// assert_eq!((cell.x(), cell.y()), (2, 0));
/// assert_eq!(cell.to_string(), "r1c3");
/// assert!(Cell::new(8, 0) < Cell::new(0, 1));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    /// Creates a cell coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns the column.
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row.
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the row-major index of this cell in a grid of side `size`.
    #[must_use]
    pub const fn index(self, size: u8) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Inverse of [`Cell::index`].
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize, size: u8) -> Self {
        let size = size as usize;
        Self::new((index % size) as u8, (index / size) as u8)
    }

    /// Returns the cell at the given offset, if it stays inside a grid of side `size`.
    #[must_use]
    pub fn offset(self, dx: i16, dy: i16, size: u8) -> Option<Self> {
        let x = i16::from(self.x) + dx;
        let y = i16::from(self.y) + dy;
        let range = 0..i16::from(size);
        if range.contains(&x) && range.contains(&y) {
            Some(Self::new(u8::try_from(x).ok()?, u8::try_from(y).ok()?))
        } else {
            None
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", u16::from(self.y) + 1, u16::from(self.x) + 1)
    }
}

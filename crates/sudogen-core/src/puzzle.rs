//! Solutions, clue grids and their text forms.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{BlockShape, Cell, CellSet, Grid, Value};

/// A violation of a group's all-different constraint, or a shape mismatch
/// between a grid and a value assignment.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConsistencyError {
    /// Two cells of one group hold the same value.
    #[display("{first} and {second} both hold {value} in {group}")]
    DuplicateValue {
        /// Name of the violated group.
        group: String,
        /// First cell.
        first: Cell,
        /// Second cell.
        second: Cell,
        /// Shared value.
        value: Value,
    },
    /// A value is outside the grid's domain.
    #[display("{value} at {cell} is outside the domain 1..={size}")]
    ValueOutOfRange {
        /// Offending cell.
        cell: Cell,
        /// Offending value.
        value: Value,
        /// Domain size.
        size: u8,
    },
    /// The assignment was made for a grid of another size.
    #[display("assignment has side {found} but the grid has side {expected}")]
    SizeMismatch {
        /// Grid side.
        expected: u8,
        /// Assignment side.
        found: u8,
    },
}

/// An error parsing a grid string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    /// A character that is neither a value, an empty marker nor a separator.
    #[display("unexpected character {ch:?} at position {position}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// Byte position in the input.
        position: usize,
    },
    /// The number of cells is not a perfect square.
    #[display("{found} cells do not form a square grid")]
    NotSquare {
        /// Number of cells read.
        found: usize,
    },
    /// A solution string contains an empty cell.
    #[display("{cell} is empty")]
    MissingValue {
        /// The empty cell.
        cell: Cell,
    },
}

/// A partial assignment of values to cells: the playable puzzle.
///
/// # Text format
///
/// One character per cell in row-major order. Values use
/// [`Value::to_char`]; `.`, `_` and `0` mark empty cells. Whitespace and the
/// separators `|`, `-`, `+` are ignored, so [`Clues::to_pretty_string`]
/// output parses back.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, Clues, Value};
///
/// let clues: Clues = "1.3. ..1. 2... ...1".parse()?;
/// assert_eq!(clues.size(), 4);
/// assert_eq!(clues.get(Cell::new(2, 0)), Some(Value::new(3)));
/// assert_eq!(clues.hidden_count(), 11);
/// assert_eq!(clues.to_short_string(), "1.3...1.2......1");
/// # Ok::<(), sudogen_core::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clues {
    size: u8,
    cells: Vec<Option<Value>>,
}

impl Clues {
    /// Creates a clue grid with every cell empty.
    #[must_use]
    pub fn empty(size: u8) -> Self {
        Self {
            size,
            cells: vec![None; usize::from(size) * usize::from(size)],
        }
    }

    /// Returns the grid side.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the clue at a cell.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<Value> {
        self.cells[cell.index(self.size)]
    }

    /// Sets or clears the clue at a cell.
    pub fn set(&mut self, cell: Cell, value: Option<Value>) {
        self.cells[cell.index(self.size)] = value;
    }

    /// Iterates over every cell with its clue.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<Value>)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (Cell::from_index(i, size), *v))
    }

    /// Iterates over the visible clues.
    pub fn given(&self) -> impl Iterator<Item = (Cell, Value)> + '_ {
        self.iter().filter_map(|(c, v)| v.map(|v| (c, v)))
    }

    /// Returns the set of empty cells.
    #[must_use]
    pub fn hidden(&self) -> CellSet {
        let mut set = CellSet::new(self.size);
        set.extend(self.iter().filter(|(_, v)| v.is_none()).map(|(c, _)| c));
        set
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_none()).count()
    }

    /// Checks that the clues fit the grid and no group repeats a value.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, scanning groups in grid order.
    pub fn check_consistency(&self, grid: &Grid) -> Result<(), ConsistencyError> {
        if self.size != grid.size() {
            return Err(ConsistencyError::SizeMismatch {
                expected: grid.size(),
                found: self.size,
            });
        }
        if let Some((cell, value)) = self.given().find(|(_, v)| !grid.contains_value(*v)) {
            return Err(ConsistencyError::ValueOutOfRange {
                cell,
                value,
                size: grid.size(),
            });
        }
        for group in grid.groups() {
            let mut seen: Vec<Option<Cell>> = vec![None; usize::from(grid.size())];
            for &cell in group.cells() {
                let Some(value) = self.get(cell) else {
                    continue;
                };
                if let Some(first) = seen[value.index()] {
                    return Err(ConsistencyError::DuplicateValue {
                        group: group.name().to_owned(),
                        first,
                        second: cell,
                        value,
                    });
                }
                seen[value.index()] = Some(cell);
            }
        }
        Ok(())
    }

    /// Renders one character per cell, row-major, `.` for empty cells.
    #[must_use]
    pub fn to_short_string(&self) -> String {
        self.cells
            .iter()
            .map(|v| v.map_or('.', Value::to_char))
            .collect()
    }

    /// Renders a multi-line grid with block separators when a block shape
    /// is given.
    ///
    /// ```
    /// use sudogen_core::{BlockShape, Clues};
    ///
    /// let clues: Clues = "1234341221434321".parse()?;
    /// let shape = BlockShape { width: 2, height: 2 };
    /// assert_eq!(
    ///     clues.to_pretty_string(Some(shape)),
    ///     "1 2 | 3 4\n3 4 | 1 2\n----+----\n2 1 | 4 3\n4 3 | 2 1\n"
    /// );
    /// # Ok::<(), sudogen_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn to_pretty_string(&self, block: Option<BlockShape>) -> String {
        let (width, height) = block.map_or((self.size, self.size), |b| (b.width, b.height));
        let render_row = |y: u8| {
            let mut line = String::new();
            for x in 0..self.size {
                if x > 0 && x % width == 0 {
                    line.push_str("| ");
                }
                line.push(self.get(Cell::new(x, y)).map_or('.', Value::to_char));
                line.push(' ');
            }
            line.truncate(line.trim_end().len());
            line
        };
        let separator = render_row(0)
            .chars()
            .map(|c| if c == '|' { '+' } else { '-' })
            .collect::<String>();

        let mut out = String::new();
        for y in 0..self.size {
            if y > 0 && y % height == 0 {
                out.push_str(&separator);
                out.push('\n');
            }
            out.push_str(&render_row(y));
            out.push('\n');
        }
        out
    }
}

impl Display for Clues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_string())
    }
}

impl FromStr for Clues {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        for (position, ch) in s.char_indices() {
            match ch {
                c if c.is_whitespace() => {}
                '|' | '-' | '+' => {}
                '.' | '_' | '0' => cells.push(None),
                c => match Value::from_char(c) {
                    Some(value) => cells.push(Some(value)),
                    None => return Err(ParseError::UnexpectedChar { ch, position }),
                },
            }
        }
        let size = square_side(cells.len())?;
        Ok(Self { size, cells })
    }
}

fn square_side(found: usize) -> Result<u8, ParseError> {
    let side = (1..=usize::from(crate::value::MAX_SIZE)).find(|s| s * s >= found);
    match side {
        Some(side) if side * side == found => {
            u8::try_from(side).map_err(|_| ParseError::NotSquare { found })
        }
        _ => Err(ParseError::NotSquare { found }),
    }
}

/// A complete assignment of values to cells.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, CellSet, Grid, Solution};
///
/// let grid = Grid::regular(4)?;
/// let solution: Solution = "1234 3412 2143 4321".parse()?;
/// solution.validate(&grid)?;
///
/// let mut mask = CellSet::new(4);
/// mask.insert(Cell::new(0, 0));
/// let clues = solution.to_clues(&mask);
/// assert_eq!(clues.hidden_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    size: u8,
    values: Vec<Value>,
}

impl Solution {
    /// Creates a solution from row-major values.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of values is not a perfect square.
    pub fn from_values(values: Vec<Value>) -> Result<Self, ParseError> {
        let size = square_side(values.len())?;
        Ok(Self { size, values })
    }

    /// Returns the grid side.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the value at a cell.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Value {
        self.values[cell.index(self.size)]
    }

    /// Iterates over every cell with its value.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Value)> + '_ {
        let size = self.size;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (Cell::from_index(i, size), *v))
    }

    /// Checks every group's all-different constraint.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, grid: &Grid) -> Result<(), ConsistencyError> {
        self.to_clues(&CellSet::new(self.size)).check_consistency(grid)
    }

    /// Returns the clues left visible when `mask` is hidden.
    #[must_use]
    pub fn to_clues(&self, mask: &CellSet) -> Clues {
        let cells = self
            .iter()
            .map(|(c, v)| (!mask.contains(c)).then_some(v))
            .collect();
        Clues {
            size: self.size,
            cells,
        }
    }

    /// Returns `true` if every visible clue agrees with this solution.
    #[must_use]
    pub fn agrees_with(&self, clues: &Clues) -> bool {
        clues.size() == self.size && clues.given().all(|(c, v)| self.get(c) == v)
    }

    /// Renders one character per cell, row-major.
    #[must_use]
    pub fn to_short_string(&self) -> String {
        self.values.iter().map(|v| v.to_char()).collect()
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_string())
    }
}

impl FromStr for Solution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clues = Clues::from_str(s)?;
        let values = clues
            .iter()
            .map(|(cell, v)| v.ok_or(ParseError::MissingValue { cell }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            size: clues.size(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_reports_duplicate() {
        let grid = Grid::regular(4).unwrap();
        let clues: Clues = "1..1 .... .... ....".parse().unwrap();
        let err = clues.check_consistency(&grid).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::DuplicateValue {
                group: "row 1".to_owned(),
                first: Cell::new(0, 0),
                second: Cell::new(3, 0),
                value: Value::new(1),
            }
        );
    }

    #[test]
    fn test_consistency_rejects_out_of_range() {
        let grid = Grid::regular(4).unwrap();
        let clues: Clues = "5... .... .... ....".parse().unwrap();
        assert!(matches!(
            clues.check_consistency(&grid),
            Err(ConsistencyError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "12?".parse::<Clues>().unwrap_err(),
            ParseError::UnexpectedChar { ch: '?', position: 2 }
        );
        assert_eq!(
            "123".parse::<Clues>().unwrap_err(),
            ParseError::NotSquare { found: 3 }
        );
        assert!(matches!(
            "1.3. ..1. 2... ...1".parse::<Solution>(),
            Err(ParseError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_pretty_round_trip() {
        let clues: Clues = "
            53. .7. ...
            6.. 195 ...
            .98 ... .6.
            8.. .6. ..3
            4.. 8.3 ..1
            7.. .2. ..6
            .6. ... 28.
            ... 419 ..5
            ... .8. .79
        "
        .parse()
        .unwrap();
        let shape = BlockShape {
            width: 3,
            height: 3,
        };
        let pretty = clues.to_pretty_string(Some(shape));
        assert!(pretty.starts_with("5 3 . | . 7 . | . . .\n"));
        assert!(pretty.contains("------+-------+------\n"));
        assert_eq!(pretty.parse::<Clues>().unwrap(), clues);
    }

    #[test]
    fn test_invalid_solution() {
        let grid = Grid::regular(4).unwrap();
        let solution: Solution = "1234 3412 2143 4312".parse().unwrap();
        assert!(solution.validate(&grid).is_err());
    }
}

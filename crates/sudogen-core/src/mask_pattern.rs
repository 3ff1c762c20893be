//! Mask patterns: per-cell requirements on which clues stay visible.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::{Rng, seq::SliceRandom as _};

use crate::{Cell, Value, puzzle::ParseError};

/// Requirement on a single cell of a mask pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskSymbol {
    /// `?`: no requirement.
    Free,
    /// `0`: the cell is hidden.
    Hidden,
    /// `*`: the cell is a visible clue.
    Visible,
    /// A value character: the cell is a visible clue with this value.
    Given(Value),
}

impl MaskSymbol {
    /// Returns the character used for this symbol.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Free => '?',
            Self::Hidden => '0',
            Self::Visible => '*',
            Self::Given(v) => v.to_char(),
        }
    }

    /// Parses a symbol character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(Self::Free),
            '0' => Some(Self::Hidden),
            '*' => Some(Self::Visible),
            c => Value::from_char(c).map(Self::Given),
        }
    }
}

/// Named 9x9 layouts of visible (`*`) and hidden (`0`) cells, each
/// symmetric under a half turn.
pub const LIBRARY: [(&str, &str); 3] = [
    (
        "pretty-1",
        "*00*0*00* 0*00*00*0 00*000*00 *00*0*00* 0*00*00*0 *00*0*00* 00*000*00 0*00*00*0 *00*0*00*",
    ),
    (
        "pretty-2",
        "**00*00** *00*0*00* 00*000*00 0*00*00*0 *00***00* 0*00*00*0 00*000*00 *00*0*00* **00*00**",
    ),
    (
        "rotational-18",
        "00*00000* 000*000** 00*0*0000 00000*000 00*000*00 000*00000 0000*0*00 **000*000 *00000*00",
    ),
];

/// A row-major list of [`MaskSymbol`]s describing the intended shape of a
/// puzzle.
///
/// Patterns serve two roles: as a synthesis constraint (the returned puzzle
/// must match it) and as a stability target (a stage must derive exactly the
/// cells marked `*` or given).
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, MaskPattern, MaskSymbol, Value};
///
/// let pattern: MaskPattern = "*00* ?0?? 3??? ????".parse()?;
/// assert_eq!(pattern.size(), 4);
/// assert_eq!(pattern.get(Cell::new(1, 0)), MaskSymbol::Hidden);
/// assert_eq!(pattern.get(Cell::new(0, 2)), MaskSymbol::Given(Value::new(3)));
/// assert_eq!(pattern.to_string(), "*00*?0??3???????");
/// # Ok::<(), sudogen_core::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskPattern {
    size: u8,
    symbols: Vec<MaskSymbol>,
}

impl MaskPattern {
    /// A pattern with the same symbol everywhere.
    #[must_use]
    pub fn uniform(size: u8, symbol: MaskSymbol) -> Self {
        Self {
            size,
            symbols: vec![symbol; usize::from(size) * usize::from(size)],
        }
    }

    /// A random pattern: start from `fill` everywhere, then for each
    /// `(count, symbol)` replace `count` randomly chosen cells still holding
    /// `fill` with `symbol`. Replacements stop early when no `fill` cells
    /// remain.
    ///
    /// ```
    /// use rand::SeedableRng as _;
    /// use rand_pcg::Pcg64Mcg;
    /// use sudogen_core::{MaskPattern, MaskSymbol};
    ///
    /// let mut rng = Pcg64Mcg::seed_from_u64(7);
    /// let pattern = MaskPattern::random(9, &mut rng, MaskSymbol::Free, &[(20, MaskSymbol::Visible)]);
    /// assert_eq!(pattern.count(MaskSymbol::Visible), 20);
    /// assert_eq!(pattern.count(MaskSymbol::Free), 61);
    /// ```
    pub fn random<R>(
        size: u8,
        rng: &mut R,
        fill: MaskSymbol,
        replacements: &[(usize, MaskSymbol)],
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut pattern = Self::uniform(size, fill);
        for &(count, symbol) in replacements {
            let mut candidates = pattern
                .symbols
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == fill)
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            candidates.shuffle(rng);
            for index in candidates.into_iter().take(count) {
                pattern.symbols[index] = symbol;
            }
        }
        pattern
    }

    /// Looks up a layout from [`LIBRARY`] by name.
    ///
    /// ```
    /// use sudogen_core::{MaskPattern, MaskSymbol};
    ///
    /// let pattern = MaskPattern::named("rotational-18").unwrap();
    /// assert_eq!(pattern.count(MaskSymbol::Visible), 18);
    /// assert!(MaskPattern::named("nonexistent").is_none());
    /// ```
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        LIBRARY
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, layout)| layout.parse().ok())
    }

    /// Returns the grid side.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the symbol at a cell.
    #[must_use]
    pub fn get(&self, cell: Cell) -> MaskSymbol {
        self.symbols[cell.index(self.size)]
    }

    /// Replaces the symbol at a cell.
    pub fn set(&mut self, cell: Cell, symbol: MaskSymbol) {
        self.symbols[cell.index(self.size)] = symbol;
    }

    /// Iterates over every cell with its symbol.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, MaskSymbol)> + '_ {
        let size = self.size;
        self.symbols
            .iter()
            .enumerate()
            .map(move |(i, s)| (Cell::from_index(i, size), *s))
    }

    /// Counts the cells holding `symbol`.
    #[must_use]
    pub fn count(&self, symbol: MaskSymbol) -> usize {
        self.symbols.iter().filter(|s| **s == symbol).count()
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols
            .iter()
            .try_for_each(|s| fmt::Write::write_char(f, s.to_char()))
    }
}

impl FromStr for MaskPattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut symbols = Vec::new();
        for (position, ch) in s.char_indices() {
            if ch.is_whitespace() {
                continue;
            }
            let symbol = MaskSymbol::from_char(ch).ok_or(ParseError::UnexpectedChar { ch, position })?;
            symbols.push(symbol);
        }
        let size = (1..=crate::value::MAX_SIZE)
            .find(|s| usize::from(*s) * usize::from(*s) == symbols.len())
            .ok_or(ParseError::NotSquare {
                found: symbols.len(),
            })?;
        Ok(Self { size, symbols })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        assert_eq!(
            "??#?".parse::<MaskPattern>().unwrap_err(),
            ParseError::UnexpectedChar { ch: '#', position: 2 }
        );
    }

    #[test]
    fn test_random_stops_when_exhausted() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let pattern = MaskPattern::random(
            4,
            &mut rng,
            MaskSymbol::Free,
            &[(10, MaskSymbol::Visible), (10, MaskSymbol::Hidden)],
        );
        assert_eq!(pattern.count(MaskSymbol::Visible), 10);
        assert_eq!(pattern.count(MaskSymbol::Hidden), 6);
        assert_eq!(pattern.count(MaskSymbol::Free), 0);
    }

    #[test]
    fn test_library_layouts() {
        let counts = LIBRARY
            .iter()
            .map(|(name, _)| {
                let pattern = MaskPattern::named(name).unwrap();
                assert_eq!(pattern.size(), 9);
                assert_eq!(pattern.count(MaskSymbol::Free), 0);
                for (cell, symbol) in pattern.iter() {
                    assert_eq!(pattern.get(Cell::new(8 - cell.x(), 8 - cell.y())), symbol, "{name}");
                }
                pattern.count(MaskSymbol::Visible)
            })
            .collect::<Vec<_>>();
        assert_eq!(counts, [29, 33, 18]);
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(seed in any::<u64>(), visible in 0usize..36, hidden in 0usize..36) {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let pattern = MaskPattern::random(
                6,
                &mut rng,
                MaskSymbol::Free,
                &[(visible, MaskSymbol::Visible), (hidden, MaskSymbol::Hidden)],
            );
            prop_assert_eq!(pattern.to_string().parse::<MaskPattern>().unwrap(), pattern);
        }
    }
}

//! Cell values.

use std::fmt::{self, Display};

/// Largest grid size whose values can be written with one character each.
pub const MAX_SIZE: u8 = 35;

/// A value in the domain `1..=size` of some grid.
///
/// Values are written with a single character: `1`-`9`, then `A`-`Z` for
/// `10`-`35`. This keeps short renderings one character per cell for every
/// supported grid size.
///
/// # Examples
///
/// ```
/// use sudogen_core::Value;
///
/// let value = Value::new(7);
/// assert_eq!(value.get(), 7);
/// assert_eq!(value.index(), 6);
/// assert_eq!(value.to_char(), '7');
/// assert_eq!(Value::new(12).to_char(), 'C');
/// assert_eq!(Value::from_char('c'), Some(Value::new(12)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Value(u8);

impl Value {
    /// Creates a value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in the range `1..=MAX_SIZE`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        assert!(value >= 1 && value <= MAX_SIZE, "invalid value");
        Self(value)
    }

    /// Creates a value, returning `None` when it is out of range.
    #[must_use]
    pub const fn try_new(value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_SIZE {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a value from its zero-based index.
    ///
    /// # Panics
    ///
    /// Panics if `index + 1` is out of range.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < MAX_SIZE as usize, "invalid value index");
        Self(index as u8 + 1)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the zero-based index (`value - 1`).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Returns the character this value is written as.
    #[must_use]
    pub const fn to_char(self) -> char {
        if self.0 <= 9 {
            (b'0' + self.0) as char
        } else {
            (b'A' + self.0 - 10) as char
        }
    }

    /// Parses a value character. Letters are case-insensitive.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_char(c: char) -> Option<Self> {
        let value = c.to_digit(36)?;
        Self::try_new(value as u8)
    }

    /// Returns every value of a domain of the given size, in ascending order.
    pub fn domain(size: u8) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + Clone {
        (1..=size).map(Self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Value> for u8 {
    fn from(value: Value) -> u8 {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_round_trip() {
        for value in Value::domain(MAX_SIZE) {
            assert_eq!(Value::from_char(value.to_char()), Some(value));
        }
        assert_eq!(Value::from_char('0'), None);
        assert_eq!(Value::from_char('.'), None);
        assert_eq!(Value::from_char('a'), Some(Value::new(10)));
    }

    #[test]
    fn test_index() {
        assert_eq!(Value::from_index(0), Value::new(1));
        assert_eq!(Value::new(9).index(), 8);
        assert_eq!(format!("{}", Value::new(16)), "16");
    }

    #[test]
    fn test_domain() {
        let values = Value::domain(4).map(Value::get).collect::<Vec<_>>();
        assert_eq!(values, [1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "invalid value")]
    fn test_new_zero_panics() {
        let _ = Value::new(0);
    }
}

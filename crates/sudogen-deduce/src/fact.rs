//! Facts derived by rules and the per-stage store that accumulates them.

use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Display},
    hash::{DefaultHasher, Hash as _, Hasher as _},
};

use sudogen_core::{Cell, GroupId, MaskPattern, Solution, Value};

/// Identifies the mask pattern a [`Fact::MaskMismatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("m{_0:016x}")]
pub struct MaskTag(pub u64);

impl MaskTag {
    /// Computes the tag of a pattern from its text form.
    #[must_use]
    pub fn of(pattern: &MaskPattern) -> Self {
        let mut hasher = DefaultHasher::new();
        pattern.to_string().hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// A datum produced and consumed by rules.
///
/// Composite facts are stored in a normalized form (cells and values in
/// ascending order where the fact is symmetric); use the constructor methods
/// rather than the variants directly when building symmetric facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fact {
    /// The cell holds the value.
    Solution(Cell, Value),
    /// The cell does not hold the value.
    Strike(Cell, Value),
    /// Some solution fact is known for the cell.
    Decided(Cell),
    /// The cell's candidates are a subset of the two values.
    NakedPair(Cell, Value, Value),
    /// The cell's candidates are a subset of the three values.
    NakedTriple(Cell, [Value; 3]),
    /// Within a full group, the value can only be in one of the two cells.
    Conjugate(GroupId, Value, Cell, Cell),
    /// Within a full group, the value can only be in one of the three cells.
    Confined3(GroupId, Value, [Cell; 3]),
    /// At least one of the two cells holds the value.
    ChainLink(Value, Cell, Cell),
    /// The first cell holds the value or the second one does not.
    ChainHalf(Value, Cell, Cell),
    /// Both cells hold the value or neither does.
    SameColor(Value, Cell, Cell),
    /// Exactly one of the two cells holds the value.
    OppositeColor(Value, Cell, Cell),
    /// A cell (or, with `None`, the grid as a whole) deviates from a mask
    /// pattern.
    MaskMismatch(MaskTag, Option<Cell>),
}

fn sorted2<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Fact {
    /// A naked pair fact with the values in ascending order.
    #[must_use]
    pub fn naked_pair(cell: Cell, a: Value, b: Value) -> Self {
        let (a, b) = sorted2(a, b);
        Self::NakedPair(cell, a, b)
    }

    /// A naked triple fact with the values in ascending order.
    #[must_use]
    pub fn naked_triple(cell: Cell, mut values: [Value; 3]) -> Self {
        values.sort_unstable();
        Self::NakedTriple(cell, values)
    }

    /// A conjugate fact with the cells in ascending order.
    #[must_use]
    pub fn conjugate(group: GroupId, value: Value, a: Cell, b: Cell) -> Self {
        let (a, b) = sorted2(a, b);
        Self::Conjugate(group, value, a, b)
    }

    /// A three-cell confinement fact with the cells in ascending order.
    #[must_use]
    pub fn confined3(group: GroupId, value: Value, mut cells: [Cell; 3]) -> Self {
        cells.sort_unstable();
        Self::Confined3(group, value, cells)
    }

    /// A chain link with the cells in ascending order.
    #[must_use]
    pub fn chain_link(value: Value, a: Cell, b: Cell) -> Self {
        let (a, b) = sorted2(a, b);
        Self::ChainLink(value, a, b)
    }

    /// A same-color fact with the cells in ascending order.
    #[must_use]
    pub fn same_color(value: Value, a: Cell, b: Cell) -> Self {
        let (a, b) = sorted2(a, b);
        Self::SameColor(value, a, b)
    }

    /// An opposite-color fact with the cells in ascending order.
    #[must_use]
    pub fn opposite_color(value: Value, a: Cell, b: Cell) -> Self {
        let (a, b) = sorted2(a, b);
        Self::OppositeColor(value, a, b)
    }

    /// Returns the kind of this fact.
    #[must_use]
    pub fn kind(&self) -> FactKind {
        match self {
            Self::Solution(..) => FactKind::Solution,
            Self::Strike(..) => FactKind::Strike,
            Self::Decided(..) => FactKind::Decided,
            Self::NakedPair(..) => FactKind::NakedPair,
            Self::NakedTriple(..) => FactKind::NakedTriple,
            Self::Conjugate(..) => FactKind::Conjugate,
            Self::Confined3(..) => FactKind::Confined3,
            Self::ChainLink(..) => FactKind::ChainLink,
            Self::ChainHalf(..) => FactKind::ChainHalf,
            Self::SameColor(..) => FactKind::SameColor,
            Self::OppositeColor(..) => FactKind::OppositeColor,
            Self::MaskMismatch(..) => FactKind::MaskMismatch,
        }
    }

    /// Returns the forwarding category of this fact.
    #[must_use]
    pub fn category(&self) -> FactCategories {
        self.kind().category()
    }

    /// Returns `false` if the fact is false of `solution`.
    ///
    /// Sound rules never derive such a fact from a puzzle whose solution is
    /// `solution`. Facts that do not describe the solution, such as mask
    /// mismatches, are always consistent.
    #[must_use]
    pub fn is_consistent_with(&self, solution: &Solution) -> bool {
        let holds = |cell: Cell, value: Value| solution.get(cell) == value;
        match *self {
            Self::Solution(c, v) => holds(c, v),
            Self::Strike(c, v) => !holds(c, v),
            Self::NakedPair(c, a, b) => holds(c, a) || holds(c, b),
            Self::NakedTriple(c, values) => values.iter().any(|v| holds(c, *v)),
            Self::Conjugate(_, v, a, b) | Self::ChainLink(v, a, b) => holds(a, v) || holds(b, v),
            Self::Confined3(_, v, cells) => cells.iter().any(|c| holds(*c, v)),
            Self::ChainHalf(v, a, b) => holds(a, v) || !holds(b, v),
            Self::SameColor(v, a, b) => holds(a, v) == holds(b, v),
            Self::OppositeColor(v, a, b) => holds(a, v) != holds(b, v),
            Self::Decided(_) | Self::MaskMismatch(..) => true,
        }
    }
}

impl Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solution(c, v) => write!(f, "solution({c}, {v})"),
            Self::Strike(c, v) => write!(f, "strike({c}, {v})"),
            Self::Decided(c) => write!(f, "decided({c})"),
            Self::NakedPair(c, a, b) => write!(f, "naked_pair({c}, {a}{b})"),
            Self::NakedTriple(c, [a, b, d]) => write!(f, "naked_triple({c}, {a}{b}{d})"),
            Self::Conjugate(g, v, a, b) => write!(f, "conjugate({g}, {v}, {a}, {b})"),
            Self::Confined3(g, v, [a, b, c]) => write!(f, "confined3({g}, {v}, {a}, {b}, {c})"),
            Self::ChainLink(v, a, b) => write!(f, "chain_link({v}, {a}, {b})"),
            Self::ChainHalf(v, a, b) => write!(f, "chain_half({v}, {a}, {b})"),
            Self::SameColor(v, a, b) => write!(f, "same_color({v}, {a}, {b})"),
            Self::OppositeColor(v, a, b) => write!(f, "opposite_color({v}, {a}, {b})"),
            Self::MaskMismatch(tag, Some(c)) => write!(f, "mask_mismatch({tag}, {c})"),
            Self::MaskMismatch(tag, None) => write!(f, "mask_mismatch({tag})"),
        }
    }
}

/// The kind of a [`Fact`], without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum FactKind {
    /// [`Fact::Solution`].
    Solution,
    /// [`Fact::Strike`].
    Strike,
    /// [`Fact::Decided`].
    Decided,
    /// [`Fact::NakedPair`].
    NakedPair,
    /// [`Fact::NakedTriple`].
    NakedTriple,
    /// [`Fact::Conjugate`].
    Conjugate,
    /// [`Fact::Confined3`].
    Confined3,
    /// [`Fact::ChainLink`].
    ChainLink,
    /// [`Fact::ChainHalf`].
    ChainHalf,
    /// [`Fact::SameColor`].
    SameColor,
    /// [`Fact::OppositeColor`].
    OppositeColor,
    /// [`Fact::MaskMismatch`].
    MaskMismatch,
}

impl FactKind {
    /// Returns the forwarding category of facts of this kind.
    #[must_use]
    pub fn category(self) -> FactCategories {
        match self {
            Self::Solution | Self::Decided => FactCategories::SOLVED,
            Self::Strike => FactCategories::ELIMINATIONS,
            Self::NakedPair
            | Self::NakedTriple
            | Self::Conjugate
            | Self::Confined3
            | Self::ChainLink
            | Self::ChainHalf
            | Self::SameColor
            | Self::OppositeColor => FactCategories::LINKS,
            Self::MaskMismatch => FactCategories::empty(),
        }
    }
}

bitflags::bitflags! {
    /// Categories of facts that a chaining edge forwards between stages.
    ///
    /// Verdict facts belong to no category and are never forwarded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FactCategories: u8 {
        /// Strikes.
        const ELIMINATIONS = 0b001;
        /// Solutions and decided cells.
        const SOLVED = 0b010;
        /// Reusable composite facts: pairs, conjugates, chain links, colors.
        const LINKS = 0b100;
    }
}

/// The set of facts known within one stage.
///
/// Solutions, strikes and decided cells live in dense tables; composite facts
/// are kept per kind. Facts are only ever added.
///
/// # Examples
///
/// ```
/// use sudogen_core::{Cell, Value};
/// use sudogen_deduce::{Fact, FactStore};
///
/// let mut store = FactStore::new(4);
/// let cell = Cell::new(0, 0);
/// assert!(store.insert(Fact::Strike(cell, Value::new(1))));
/// assert!(!store.insert(Fact::Strike(cell, Value::new(1))));
/// assert!(store.is_struck(cell, Value::new(1)));
/// assert_eq!(
///     store.candidates(cell).collect::<Vec<_>>(),
///     [Value::new(2), Value::new(3), Value::new(4)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactStore {
    size: u8,
    solutions: Vec<bool>,
    strikes: Vec<bool>,
    decided: Vec<bool>,
    composites: HashMap<FactKind, HashSet<Fact>>,
    len: usize,
}

impl FactStore {
    /// Creates an empty store for a grid of side `size`.
    #[must_use]
    pub fn new(size: u8) -> Self {
        let cells = usize::from(size) * usize::from(size);
        Self {
            size,
            solutions: vec![false; cells * usize::from(size)],
            strikes: vec![false; cells * usize::from(size)],
            decided: vec![false; cells],
            composites: HashMap::new(),
            len: 0,
        }
    }

    /// Returns the grid side this store was created for.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    fn slot(&self, cell: Cell, value: Value) -> usize {
        cell.index(self.size) * usize::from(self.size) + value.index()
    }

    /// Adds a fact. Returns `true` if it was not present.
    pub fn insert(&mut self, fact: Fact) -> bool {
        let added = match fact {
            Fact::Solution(c, v) => {
                let slot = self.slot(c, v);
                !std::mem::replace(&mut self.solutions[slot], true)
            }
            Fact::Strike(c, v) => {
                let slot = self.slot(c, v);
                !std::mem::replace(&mut self.strikes[slot], true)
            }
            Fact::Decided(c) => {
                let index = c.index(self.size);
                !std::mem::replace(&mut self.decided[index], true)
            }
            _ => self.composites.entry(fact.kind()).or_default().insert(fact),
        };
        if added {
            self.len += 1;
        }
        added
    }

    /// Returns `true` if the fact is present.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        match *fact {
            Fact::Solution(c, v) => self.is_solution(c, v),
            Fact::Strike(c, v) => self.is_struck(c, v),
            Fact::Decided(c) => self.is_decided(c),
            _ => self
                .composites
                .get(&fact.kind())
                .is_some_and(|set| set.contains(fact)),
        }
    }

    /// Returns `true` if `Solution(cell, value)` is present.
    #[must_use]
    pub fn is_solution(&self, cell: Cell, value: Value) -> bool {
        self.solutions[self.slot(cell, value)]
    }

    /// Returns `true` if `Strike(cell, value)` is present.
    #[must_use]
    pub fn is_struck(&self, cell: Cell, value: Value) -> bool {
        self.strikes[self.slot(cell, value)]
    }

    /// Returns `true` if `Decided(cell)` is present.
    #[must_use]
    pub fn is_decided(&self, cell: Cell) -> bool {
        self.decided[cell.index(self.size)]
    }

    /// Returns the smallest value with a solution fact at `cell`.
    #[must_use]
    pub fn solution_at(&self, cell: Cell) -> Option<Value> {
        Value::domain(self.size).find(|v| self.is_solution(cell, *v))
    }

    /// Returns `true` if every cell has a solution fact.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let size = self.size;
        (0..usize::from(size) * usize::from(size))
            .all(|i| self.solution_at(Cell::from_index(i, size)).is_some())
    }

    /// Iterates over the values not struck at `cell`.
    pub fn candidates(&self, cell: Cell) -> impl Iterator<Item = Value> + '_ {
        Value::domain(self.size).filter(move |v| !self.is_struck(cell, *v))
    }

    /// Iterates over the composite facts of one kind, in no particular order.
    ///
    /// Yields nothing for the dense kinds (solutions, strikes, decided cells).
    pub fn of_kind(&self, kind: FactKind) -> impl Iterator<Item = &Fact> {
        self.composites.get(&kind).into_iter().flatten()
    }

    /// Returns all facts in ascending order.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<Fact> {
        let size = self.size;
        let mut facts = Vec::with_capacity(self.len);
        for index in 0..usize::from(size) * usize::from(size) {
            let cell = Cell::from_index(index, size);
            for value in Value::domain(size) {
                if self.is_solution(cell, value) {
                    facts.push(Fact::Solution(cell, value));
                }
                if self.is_struck(cell, value) {
                    facts.push(Fact::Strike(cell, value));
                }
            }
            if self.is_decided(cell) {
                facts.push(Fact::Decided(cell));
            }
        }
        facts.extend(self.composites.values().flatten().copied());
        facts.sort_unstable();
        facts
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the store holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a store holding only the facts in the given categories.
    #[must_use]
    pub fn filtered(&self, categories: FactCategories) -> Self {
        let mut store = Self::new(self.size);
        store.extend(
            self.to_sorted_vec()
                .into_iter()
                .filter(|f| categories.intersects(f.category())),
        );
        store
    }

    /// Returns `true` if every fact in `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len <= other.len && self.to_sorted_vec().iter().all(|f| other.contains(f))
    }

    /// Returns a cell whose facts contradict each other: every value struck,
    /// two different solutions, or a solution that is also struck.
    #[must_use]
    pub fn contradiction(&self) -> Option<Cell> {
        let size = self.size;
        (0..usize::from(size) * usize::from(size))
            .map(|i| Cell::from_index(i, size))
            .find(|&cell| {
                let solved = Value::domain(size)
                    .filter(|v| self.is_solution(cell, *v))
                    .collect::<Vec<_>>();
                self.candidates(cell).next().is_none()
                    || solved.len() > 1
                    || solved.iter().any(|v| self.is_struck(cell, *v))
            })
    }
}

impl Extend<Fact> for FactStore {
    fn extend<T: IntoIterator<Item = Fact>>(&mut self, iter: T) {
        for fact in iter {
            self.insert(fact);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_normalize() {
        let (a, b) = (Cell::new(3, 0), Cell::new(1, 0));
        let (x, y) = (Value::new(4), Value::new(2));
        assert_eq!(Fact::naked_pair(a, x, y), Fact::NakedPair(a, y, x));
        assert_eq!(
            Fact::conjugate(GroupId(0), x, a, b),
            Fact::Conjugate(GroupId(0), x, b, a)
        );
        assert_eq!(Fact::chain_link(x, a, b), Fact::chain_link(x, b, a));
        assert_eq!(
            Fact::naked_triple(a, [Value::new(3), Value::new(1), Value::new(2)]),
            Fact::NakedTriple(a, [Value::new(1), Value::new(2), Value::new(3)])
        );
    }

    #[test]
    fn test_categories() {
        let cell = Cell::new(0, 0);
        let v = Value::new(1);
        assert_eq!(Fact::Strike(cell, v).category(), FactCategories::ELIMINATIONS);
        assert_eq!(Fact::Decided(cell).category(), FactCategories::SOLVED);
        assert_eq!(Fact::chain_link(v, cell, Cell::new(1, 0)).category(), FactCategories::LINKS);
        assert!(Fact::MaskMismatch(MaskTag(0), None).category().is_empty());
    }

    #[test]
    fn test_consistency_with_solution() {
        let solution: Solution = "1423 3214 2341 4132".parse().unwrap();
        let (a, b) = (Cell::new(0, 0), Cell::new(1, 0));
        let (one, two, four) = (Value::new(1), Value::new(2), Value::new(4));
        assert!(Fact::Solution(a, one).is_consistent_with(&solution));
        assert!(!Fact::Solution(a, two).is_consistent_with(&solution));
        assert!(!Fact::Strike(a, one).is_consistent_with(&solution));
        assert!(Fact::naked_pair(b, two, four).is_consistent_with(&solution));
        assert!(!Fact::naked_pair(b, one, two).is_consistent_with(&solution));
        assert!(Fact::conjugate(GroupId(0), four, a, b).is_consistent_with(&solution));
        assert!(!Fact::chain_link(two, a, b).is_consistent_with(&solution));
        assert!(Fact::ChainHalf(two, a, b).is_consistent_with(&solution));
        assert!(!Fact::ChainHalf(two, b, Cell::new(1, 1)).is_consistent_with(&solution));
        assert!(Fact::opposite_color(one, a, b).is_consistent_with(&solution));
        assert!(!Fact::same_color(one, a, b).is_consistent_with(&solution));
        assert!(Fact::MaskMismatch(MaskTag(0), None).is_consistent_with(&solution));
    }

    #[test]
    fn test_filtered_and_subset() {
        let cell = Cell::new(1, 1);
        let mut store = FactStore::new(4);
        store.extend([
            Fact::Solution(cell, Value::new(2)),
            Fact::Decided(cell),
            Fact::Strike(cell, Value::new(1)),
            Fact::naked_pair(cell, Value::new(2), Value::new(3)),
        ]);
        assert_eq!(store.len(), 4);

        let solved = store.filtered(FactCategories::SOLVED);
        assert_eq!(solved.len(), 2);
        assert!(solved.is_subset(&store));
        assert!(!store.is_subset(&solved));
        assert_eq!(solved.solution_at(cell), Some(Value::new(2)));
        assert_eq!(store.of_kind(FactKind::NakedPair).count(), 1);
        assert_eq!(store.of_kind(FactKind::Conjugate).count(), 0);
    }

    #[test]
    fn test_contradiction() {
        let cell = Cell::new(2, 3);
        let mut store = FactStore::new(4);
        assert_eq!(store.contradiction(), None);
        store.insert(Fact::Solution(cell, Value::new(1)));
        assert_eq!(store.contradiction(), None);
        store.insert(Fact::Solution(cell, Value::new(3)));
        assert_eq!(store.contradiction(), Some(cell));

        let mut store = FactStore::new(4);
        store.extend(Value::domain(4).map(|v| Fact::Strike(cell, v)));
        assert_eq!(store.contradiction(), Some(cell));
    }

    #[test]
    fn test_sorted_vec_is_sorted() {
        let mut store = FactStore::new(4);
        store.extend([
            Fact::chain_link(Value::new(1), Cell::new(0, 0), Cell::new(3, 3)),
            Fact::Strike(Cell::new(3, 3), Value::new(4)),
            Fact::Solution(Cell::new(0, 1), Value::new(2)),
        ]);
        let facts = store.to_sorted_vec();
        assert_eq!(facts.len(), 3);
        assert!(facts.windows(2).all(|w| w[0] < w[1]));
    }
}

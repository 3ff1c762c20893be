//! Pre-solve validation of constraint sets.

use std::{
    collections::HashMap,
    fmt::{self, Display},
};

use sudogen_core::{Cell, ConsistencyError, Grid, MaskSymbol, Solution, Value};
use sudogen_deduce::StageError;

use crate::Constraint;

/// One reason a constraint set can never be satisfied, or is ill-formed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Contradiction {
    /// A cell lies outside the grid.
    #[display("{cell} is outside the grid")]
    CellOutOfRange {
        /// The cell.
        cell: Cell,
    },
    /// A value lies outside the grid's domain.
    #[display("value {value} is outside the domain 1..={size}")]
    ValueOutOfRange {
        /// The value.
        value: Value,
        /// The grid side.
        size: u8,
    },
    /// One cell is fixed to two values.
    #[display("{cell} is fixed to both {first} and {second}")]
    ConflictingValues {
        /// The cell.
        cell: Cell,
        /// One value.
        first: Value,
        /// The other value.
        second: Value,
    },
    /// Two cells sharing a group are fixed to the same value.
    #[display("{first} and {second} share a group but are both fixed to {value}")]
    GroupClash {
        /// One cell.
        first: Cell,
        /// The other cell.
        second: Cell,
        /// The shared value.
        value: Value,
    },
    /// A cell is both fixed as a clue and required to be hidden.
    #[display("{cell} is fixed as a clue but required to be hidden")]
    FixedAndOpen {
        /// The cell.
        cell: Cell,
    },
    /// A mask pattern does not match the grid side.
    #[display("mask pattern has side {actual}, grid has side {expected}")]
    PatternSize {
        /// The grid side.
        expected: u8,
        /// The pattern side.
        actual: u8,
    },
    /// The hidden-cell bounds admit no count.
    #[display("hidden-cell bounds {min}..={max} are impossible on {cells} cells")]
    HiddenBounds {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
        /// Number of cells.
        cells: usize,
    },
    /// More than one optimization objective is given.
    #[display("at most one objective may be given")]
    MultipleObjectives,
    /// The same interface cell is designated twice.
    #[display("the {side} cell is designated twice")]
    DuplicateInterface {
        /// `"input"` or `"output"`.
        side: &'static str,
    },
    /// An interface cell's decoy equals its fixed solution.
    #[display("the {side} cell's decoy equals its solution {value}")]
    DecoyIsSolution {
        /// `"input"` or `"output"`.
        side: &'static str,
        /// The value.
        value: Value,
    },
    /// The output's fixed solution is also its forbidden solution.
    #[display("the output solution {value} is also forbidden")]
    ForbiddenOutput {
        /// The value.
        value: Value,
    },
    /// A constraint refers to an interface cell no constraint designates.
    #[display("the input cell is referenced but not designated")]
    MissingInputCell,
    /// A unique solution leaves no hidden cell that admits another value.
    #[display("a unique solution with no forced hidden cell cannot hide any cell")]
    UniqueWithoutForcedCells,
    /// An undeducible input cell has other completions, so the solution
    /// cannot be unique.
    #[display("an undeducible input cell contradicts a unique solution")]
    UniqueAndUndeducible,
    /// The input cell is asked for no alternative values.
    #[display("an undeducible input cell needs at least one alternative value")]
    NoAlternatives,
    /// The input cell is asked for more alternatives than there are values
    /// besides its own.
    #[display("{alternatives} alternative values do not fit a domain of {size}")]
    TooManyAlternatives {
        /// Requested alternatives.
        alternatives: usize,
        /// The grid side.
        size: u8,
    },
    /// A fixed solution is not a valid solution of the grid.
    #[display("fixed solution is invalid: {_0}")]
    InvalidSolution(ConsistencyError),
    /// More than one highlighted strike is requested.
    #[display("at most one highlighted strike may be requested")]
    DuplicateHighlight,
    /// A strategy stage cannot be used on the grid.
    #[display("{_0}")]
    Stage(StageError),
}

/// Every [`Contradiction`] found in a constraint set.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct ContradictionReport {
    contradictions: Vec<Contradiction>,
}

impl ContradictionReport {
    /// Returns the contradictions, in the order they were found.
    #[must_use]
    pub fn contradictions(&self) -> &[Contradiction] {
        &self.contradictions
    }
}

impl Display for ContradictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed constraints: ")?;
        for (i, c) in self.contradictions.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

struct Validator<'a> {
    grid: &'a Grid,
    found: Vec<Contradiction>,
    fixed: HashMap<Cell, Value>,
    open: Vec<Cell>,
    solution: Option<&'a Solution>,
}

impl<'a> Validator<'a> {
    fn cell(&mut self, cell: Cell) -> bool {
        let ok = self.grid.contains(cell);
        if !ok {
            self.found.push(Contradiction::CellOutOfRange { cell });
        }
        ok
    }

    fn value(&mut self, value: Value) -> bool {
        let ok = self.grid.contains_value(value);
        if !ok {
            self.found.push(Contradiction::ValueOutOfRange {
                value,
                size: self.grid.size(),
            });
        }
        ok
    }

    fn fix(&mut self, cell: Cell, value: Value) {
        if !self.cell(cell) || !self.value(value) {
            return;
        }
        match self.fixed.get(&cell) {
            Some(&first) if first != value => {
                self.found.push(Contradiction::ConflictingValues {
                    cell,
                    first,
                    second: value,
                });
            }
            Some(_) => {}
            None => {
                self.fixed.insert(cell, value);
            }
        }
    }

    fn interface(
        &mut self,
        side: &'static str,
        location: Option<Cell>,
        solution: Option<Value>,
        decoy: Option<Value>,
    ) {
        if let Some(cell) = location
            && self.cell(cell)
        {
            self.open.push(cell);
        }
        for value in [solution, decoy].into_iter().flatten() {
            self.value(value);
        }
        if let (Some(s), Some(d)) = (solution, decoy)
            && s == d
        {
            self.found.push(Contradiction::DecoyIsSolution { side, value: s });
        }
    }

    /// Records a fixed solution; a second one must agree with the first.
    fn solve(&mut self, solution: &'a Solution) {
        if let Err(e) = solution.validate(self.grid) {
            self.found.push(Contradiction::InvalidSolution(e));
            return;
        }
        match self.solution {
            Some(first) => {
                for (cell, value) in solution.iter() {
                    if first.get(cell) != value {
                        self.found.push(Contradiction::ConflictingValues {
                            cell,
                            first: first.get(cell),
                            second: value,
                        });
                    }
                }
            }
            None => self.solution = Some(solution),
        }
    }

    fn finish(mut self) -> Vec<Contradiction> {
        let mut fixed = self.fixed.iter().map(|(c, v)| (*c, *v)).collect::<Vec<_>>();
        fixed.sort_unstable();
        if let Some(solution) = self.solution {
            for &(cell, value) in &fixed {
                if solution.get(cell) != value {
                    self.found.push(Contradiction::ConflictingValues {
                        cell,
                        first: solution.get(cell),
                        second: value,
                    });
                }
            }
        }
        for (i, &(a, va)) in fixed.iter().enumerate() {
            for &(b, vb) in &fixed[i + 1..] {
                if va == vb && self.grid.share_group(a, b) {
                    self.found.push(Contradiction::GroupClash {
                        first: a,
                        second: b,
                        value: va,
                    });
                }
            }
        }
        self.open.sort_unstable();
        self.open.dedup();
        for &cell in &self.open {
            if self.fixed.contains_key(&cell) {
                self.found.push(Contradiction::FixedAndOpen { cell });
            }
        }
        self.found
    }
}

/// Checks `constraints` for contradictions that can be found without a
/// solver.
///
/// # Errors
///
/// Returns every contradiction found.
pub fn validate(grid: &Grid, constraints: &[Constraint]) -> Result<(), ContradictionReport> {
    let mut v = Validator {
        grid,
        found: Vec::new(),
        fixed: HashMap::new(),
        open: Vec::new(),
        solution: None,
    };
    let cells = grid.num_cells();
    let mut min_hidden = 0;
    let objectives = constraints.iter().filter(|c| c.is_objective()).count();
    let (mut inputs, mut outputs, mut highlights) = (0, 0, 0);
    let mut unique = false;
    let mut no_forced = false;
    let mut undeducible = false;

    for constraint in constraints {
        match constraint {
            Constraint::HiddenCount { min, max } => {
                if min > max || *min > cells || *max > cells {
                    v.found.push(Contradiction::HiddenBounds {
                        min: *min,
                        max: *max,
                        cells,
                    });
                }
                min_hidden = min_hidden.max(*min);
            }
            Constraint::MaximizeHidden
            | Constraint::MinimizeHidden
            | Constraint::Symmetry(_)
            | Constraint::CanonicalTopRow
            | Constraint::InterfaceAllDifferent => {}
            Constraint::ForbidValues(values) => {
                for &value in values {
                    v.value(value);
                }
            }
            Constraint::FixCell { cell, value } => v.fix(*cell, *value),
            Constraint::OpenCell(cell) => {
                if v.cell(*cell) {
                    v.open.push(*cell);
                }
            }
            Constraint::Pattern(pattern) => {
                if pattern.size() != grid.size() {
                    v.found.push(Contradiction::PatternSize {
                        expected: grid.size(),
                        actual: pattern.size(),
                    });
                    continue;
                }
                for (cell, symbol) in pattern.iter() {
                    match symbol {
                        MaskSymbol::Given(value) => v.fix(cell, value),
                        MaskSymbol::Hidden => v.open.push(cell),
                        MaskSymbol::Free | MaskSymbol::Visible => {}
                    }
                }
            }
            Constraint::UniqueSolution => unique = true,
            Constraint::FixSolution(solution) => v.solve(solution),
            Constraint::Strategy(requirement) => {
                if let Err(e) = requirement.strategy.check_grid(grid) {
                    v.found.push(Contradiction::Stage(e));
                }
            }
            Constraint::InputCell {
                location,
                solution,
                decoy,
            } => {
                inputs += 1;
                v.interface("input", *location, *solution, *decoy);
            }
            Constraint::OutputCell {
                location,
                solution,
                forbidden_solution,
                decoy,
            } => {
                outputs += 1;
                v.interface("output", *location, *solution, *decoy);
                if let Some(value) = *forbidden_solution
                    && v.value(value)
                    && *solution == Some(value)
                {
                    v.found.push(Contradiction::ForbiddenOutput { value });
                }
            }
            Constraint::InputCellUndeducible(options) => {
                undeducible = true;
                let others = usize::from(grid.size()) - 1;
                if options.alternatives == 0 {
                    v.found.push(Contradiction::NoAlternatives);
                } else if options.alternatives > others {
                    v.found.push(Contradiction::TooManyAlternatives {
                        alternatives: options.alternatives,
                        size: grid.size(),
                    });
                }
            }
            Constraint::NoForcedHiddenCell => no_forced = true,
            Constraint::HighlightStrike { cell, value } => {
                highlights += 1;
                if let Some(cell) = *cell {
                    v.cell(cell);
                }
                if let Some(value) = *value {
                    v.value(value);
                }
            }
        }
    }

    if objectives > 1 {
        v.found.push(Contradiction::MultipleObjectives);
    }
    if inputs > 1 {
        v.found.push(Contradiction::DuplicateInterface { side: "input" });
    }
    if outputs > 1 {
        v.found.push(Contradiction::DuplicateInterface { side: "output" });
    }
    if highlights > 1 {
        v.found.push(Contradiction::DuplicateHighlight);
    }
    if undeducible && inputs == 0 {
        v.found.push(Contradiction::MissingInputCell);
    }
    if undeducible && unique {
        v.found.push(Contradiction::UniqueAndUndeducible);
    }
    let must_hide = min_hidden > 0 || inputs > 0 || outputs > 0 || !v.open.is_empty();
    if unique && no_forced && must_hide {
        v.found.push(Contradiction::UniqueWithoutForcedCells);
    }
    let contradictions = v.finish();
    if contradictions.is_empty() {
        Ok(())
    } else {
        Err(ContradictionReport { contradictions })
    }
}

//! Puzzle variables and the encoding of grid, mask and interface
//! constraints.

use std::{collections::HashMap, iter};

use sudogen_core::{Cell, CellSet, Grid, Interface, InterfaceCell, MaskSymbol, Solution, Value};
use sudogen_deduce::{Fact, PuzzleAtom};

use crate::{BackendError, Constraint, Formula, Lit, Model, Undeducibility};

/// One boolean per `(cell, value)`, constrained to a valid solution.
#[derive(Debug, Clone)]
pub(crate) struct CellValueVars {
    size: u8,
    lits: Vec<Lit>,
}

impl CellValueVars {
    /// Allocates the variables and requires them to form a valid solution of
    /// `grid`.
    pub(crate) fn new(formula: &mut Formula, grid: &Grid) -> Self {
        let size = grid.size();
        let lits = (0..grid.num_cells() * usize::from(size))
            .map(|_| formula.new_var())
            .collect();
        let vars = Self { size, lits };

        for cell in grid.cells() {
            formula.exactly_one(grid.values().map(|v| vars.get(cell, v)));
        }
        for (id, group) in grid.groups_with_ids() {
            for value in grid.values() {
                let lits = group.cells().iter().map(|c| vars.get(*c, value));
                if grid.is_full(id) {
                    let lits = lits.collect::<Vec<_>>();
                    formula.add_clause(lits.iter().copied());
                    formula.at_most_one(lits);
                } else {
                    formula.at_most_one(lits);
                }
            }
        }
        vars
    }

    pub(crate) fn get(&self, cell: Cell, value: Value) -> Lit {
        self.lits[cell.index(self.size) * usize::from(self.size) + value.index()]
    }

    pub(crate) fn decode(&self, model: &Model, grid: &Grid) -> Result<Solution, BackendError> {
        let values = grid
            .cells()
            .map(|cell| {
                grid.values()
                    .find(|v| model.value(self.get(cell, *v)))
                    .ok_or_else(|| BackendError::Solver {
                        message: format!("model assigns no value to {cell}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Solution::from_values(values).map_err(|e| BackendError::Solver {
            message: format!("model does not decode to a solution: {e}"),
        })
    }
}

/// The designated-cell variables of one interface side.
#[derive(Debug, Clone)]
struct InterfaceVars {
    at: Vec<Lit>,
    decoy: Vec<Lit>,
}

/// The variables describing a candidate puzzle: its solution, its mask,
/// its interface cells and its highlighted strike.
///
/// Once the solution is fixed with [`PuzzleVars::fix_solution`], atoms about
/// it are constants and [`PuzzleVars::consistent`] filters out facts no
/// sound rule can derive.
#[derive(Debug, Clone)]
pub(crate) struct PuzzleVars {
    size: u8,
    pub(crate) solution: CellValueVars,
    hidden: Vec<Lit>,
    clues: HashMap<(Cell, Value), Lit>,
    input: Option<InterfaceVars>,
    output: Option<InterfaceVars>,
    highlight: Option<Vec<Lit>>,
    alternatives: Vec<CellValueVars>,
    known: Option<Solution>,
}

impl PuzzleVars {
    pub(crate) fn new(formula: &mut Formula, grid: &Grid) -> Self {
        let solution = CellValueVars::new(formula, grid);
        let hidden = grid.cells().map(|_| formula.new_var()).collect();
        Self {
            size: grid.size(),
            solution,
            hidden,
            clues: HashMap::new(),
            input: None,
            output: None,
            highlight: None,
            alternatives: Vec::new(),
            known: None,
        }
    }

    /// Fixes the intended solution.
    pub(crate) fn fix_solution(&mut self, formula: &mut Formula, solution: &Solution) {
        for (cell, value) in solution.iter() {
            formula.require(self.sol(cell, value));
        }
        self.known = Some(solution.clone());
    }

    /// Returns the truth value of `atom` when it does not depend on the
    /// candidate.
    pub(crate) fn fixed(&self, atom: PuzzleAtom) -> Option<bool> {
        let known = |cell: Cell| self.known.as_ref().map(|s| s.get(cell));
        match atom {
            PuzzleAtom::Solution(c, v) => known(c).map(|w| w == v),
            PuzzleAtom::Clue(c, v) => known(c).and_then(|w| (w != v).then_some(false)),
            PuzzleAtom::Hidden(_) => None,
            PuzzleAtom::InputCell(_) => self.input.is_none().then_some(false),
            PuzzleAtom::OutputCell(_) | PuzzleAtom::OutputDecoy(_) => {
                self.output.is_none().then_some(false)
            }
            PuzzleAtom::HighlightStrike(c, v) => {
                (self.highlight.is_none() || known(c) == Some(v)).then_some(false)
            }
        }
    }

    /// Returns `false` for facts that contradict the fixed solution, which
    /// no sound rule derives. Without a fixed solution every fact passes.
    pub(crate) fn consistent(&self, fact: &Fact) -> bool {
        self.known.as_ref().is_none_or(|s| fact.is_consistent_with(s))
    }

    pub(crate) fn sol(&self, cell: Cell, value: Value) -> Lit {
        self.solution.get(cell, value)
    }

    pub(crate) fn hidden(&self, cell: Cell) -> Lit {
        self.hidden[cell.index(self.size)]
    }

    pub(crate) fn hidden_lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.hidden.iter().copied()
    }

    /// Returns a literal for "the cell is a visible clue with this value".
    pub(crate) fn clue(&mut self, formula: &mut Formula, cell: Cell, value: Value) -> Lit {
        if let Some(lit) = self.clues.get(&(cell, value)) {
            return *lit;
        }
        let lit = formula.and([self.sol(cell, value), !self.hidden(cell)]);
        self.clues.insert((cell, value), lit);
        lit
    }

    /// Returns the literal of a puzzle atom. Atoms about an interface side
    /// that was never designated are false.
    pub(crate) fn atom(&mut self, formula: &mut Formula, atom: PuzzleAtom) -> Lit {
        if let Some(value) = self.fixed(atom) {
            return formula.constant(value);
        }
        match atom {
            PuzzleAtom::Clue(c, _) if self.known.is_some() => !self.hidden(c),
            PuzzleAtom::Clue(c, v) => self.clue(formula, c, v),
            PuzzleAtom::Hidden(c) => self.hidden(c),
            PuzzleAtom::Solution(c, v) => self.sol(c, v),
            PuzzleAtom::InputCell(c) => match &self.input {
                Some(input) => input.at[c.index(self.size)],
                None => formula.constant(false),
            },
            PuzzleAtom::OutputCell(c) => match &self.output {
                Some(output) => output.at[c.index(self.size)],
                None => formula.constant(false),
            },
            PuzzleAtom::OutputDecoy(v) => match &self.output {
                Some(output) => output.decoy[v.index()],
                None => formula.constant(false),
            },
            PuzzleAtom::HighlightStrike(c, v) => match &self.highlight {
                Some(highlight) => highlight[self.pair_index(c, v)],
                None => formula.constant(false),
            },
        }
    }

    fn pair_index(&self, cell: Cell, value: Value) -> usize {
        cell.index(self.size) * usize::from(self.size) + value.index()
    }

    /// Selects exactly one `(cell, value)` whose value is not the cell's
    /// solution.
    pub(crate) fn designate_highlight(
        &mut self,
        formula: &mut Formula,
        grid: &Grid,
        cell: Option<Cell>,
        value: Option<Value>,
    ) {
        let mut lits = Vec::with_capacity(grid.num_cells() * usize::from(self.size));
        for c in grid.cells() {
            for v in grid.values() {
                let lit = formula.new_var();
                formula.implies(lit, !self.sol(c, v));
                if cell.is_some_and(|want| want != c) || value.is_some_and(|want| want != v) {
                    formula.require(!lit);
                }
                lits.push(lit);
            }
        }
        formula.exactly_one(lits.iter().copied());
        self.highlight = Some(lits);
    }

    /// Designates one hidden cell and a decoy value that differs from the
    /// cell's solution.
    fn designate(
        &self,
        formula: &mut Formula,
        grid: &Grid,
        location: Option<Cell>,
        solution: Option<Value>,
        decoy: Option<Value>,
    ) -> InterfaceVars {
        let at = grid.cells().map(|_| formula.new_var()).collect::<Vec<_>>();
        let decoys = grid.values().map(|_| formula.new_var()).collect::<Vec<_>>();
        formula.exactly_one(at.iter().copied());
        formula.exactly_one(decoys.iter().copied());
        for cell in grid.cells() {
            let here = at[cell.index(self.size)];
            formula.implies(here, self.hidden(cell));
            for value in grid.values() {
                formula.add_clause([!here, !self.sol(cell, value), !decoys[value.index()]]);
            }
            if let Some(value) = solution {
                formula.implies(here, self.sol(cell, value));
            }
        }
        if let Some(cell) = location {
            formula.require(at[cell.index(self.size)]);
        }
        if let Some(value) = decoy {
            formula.require(decoys[value.index()]);
        }
        InterfaceVars { at, decoy: decoys }
    }

    pub(crate) fn designate_input(
        &mut self,
        formula: &mut Formula,
        grid: &Grid,
        location: Option<Cell>,
        solution: Option<Value>,
        decoy: Option<Value>,
    ) {
        self.input = Some(self.designate(formula, grid, location, solution, decoy));
    }

    pub(crate) fn designate_output(
        &mut self,
        formula: &mut Formula,
        grid: &Grid,
        location: Option<Cell>,
        solution: Option<Value>,
        forbidden_solution: Option<Value>,
        decoy: Option<Value>,
    ) {
        let output = self.designate(formula, grid, location, solution, decoy);
        if let Some(value) = forbidden_solution {
            for cell in grid.cells() {
                formula.implies(output.at[cell.index(self.size)], !self.sol(cell, value));
            }
        }
        self.output = Some(output);
    }

    /// Returns, per value, literals for "the designated cell holds it" and
    /// "the decoy is it", or `None` for an undesignated side.
    fn side_values(
        &self,
        formula: &mut Formula,
        grid: &Grid,
        side: Option<&InterfaceVars>,
    ) -> Option<Vec<(Lit, Lit)>> {
        let side = side?;
        let values = grid
            .values()
            .map(|value| {
                let placements = grid
                    .cells()
                    .map(|c| formula.and([side.at[c.index(self.size)], self.sol(c, value)]))
                    .collect::<Vec<_>>();
                (formula.or(placements), side.decoy[value.index()])
            })
            .collect();
        Some(values)
    }

    /// Requires the solutions and decoys of the designated cells to be
    /// pairwise different.
    pub(crate) fn interface_all_different(&self, formula: &mut Formula, grid: &Grid) {
        let sides = [self.input.as_ref(), self.output.as_ref()]
            .into_iter()
            .filter_map(|side| self.side_values(formula, grid, side))
            .collect::<Vec<_>>();
        for value in grid.values() {
            let lits = sides
                .iter()
                .flat_map(|side| {
                    let (holds, decoy) = side[value.index()];
                    [holds, decoy]
                })
                .collect::<Vec<_>>();
            formula.at_most_one(lits);
        }
    }

    /// Adds `options.alternatives` assignments agreeing with the clues, each
    /// putting a different non-solution value in the input cell, and
    /// requires the input decoy to be one of those values.
    ///
    /// Alternatives are ordered by decreasing input value. Exclusivity and
    /// uniqueness of the alternatives quantify over every assignment and
    /// are checked by refinement.
    pub(crate) fn input_undeducible(&mut self, formula: &mut Formula, grid: &Grid, options: Undeducibility) {
        let Some(input) = self.input.clone() else {
            return;
        };
        let mut values = Vec::with_capacity(options.alternatives);
        for _ in 0..options.alternatives {
            let alt = CellValueVars::new(formula, grid);
            self.agree_on_clues(formula, grid, &alt);
            for cell in grid.cells() {
                for value in grid.values() {
                    formula.add_clause([
                        !input.at[cell.index(self.size)],
                        !self.sol(cell, value),
                        !alt.get(cell, value),
                    ]);
                }
            }
            let at_input = grid
                .values()
                .map(|value| {
                    let placements = grid
                        .cells()
                        .map(|c| formula.and([input.at[c.index(self.size)], alt.get(c, value)]))
                        .collect::<Vec<_>>();
                    formula.or(placements)
                })
                .collect::<Vec<_>>();
            values.push(at_input);
            self.alternatives.push(alt);
        }
        for (i, earlier) in values.iter().enumerate() {
            for later in &values[i + 1..] {
                for high in grid.values() {
                    for low in grid.values().filter(|low| *low <= high) {
                        formula.add_clause([!earlier[high.index()], !later[low.index()]]);
                    }
                }
            }
        }
        for value in grid.values() {
            formula.add_clause(
                iter::once(!input.decoy[value.index()]).chain(values.iter().map(|v| v[value.index()])),
            );
        }
    }

    /// Returns the alternative assignments of the input cell.
    pub(crate) fn alternatives(&self) -> &[CellValueVars] {
        &self.alternatives
    }

    /// Returns the literal for "`cell` is the input cell".
    pub(crate) fn input_at(&self, cell: Cell) -> Option<Lit> {
        self.input.as_ref().map(|input| input.at[cell.index(self.size)])
    }

    /// Requires every hidden cell to take a different value in some
    /// assignment agreeing with the clues.
    pub(crate) fn no_forced_hidden_cell(&self, formula: &mut Formula, grid: &Grid) {
        for cell in grid.cells() {
            let alt = CellValueVars::new(formula, grid);
            self.agree_on_clues(formula, grid, &alt);
            for value in grid.values() {
                formula.add_clause([!self.hidden(cell), !alt.get(cell, value), !self.sol(cell, value)]);
            }
        }
    }

    /// Requires `alt` to agree with every visible clue.
    fn agree_on_clues(&self, formula: &mut Formula, grid: &Grid, alt: &CellValueVars) {
        for cell in grid.cells() {
            for value in grid.values() {
                formula.add_clause([self.hidden(cell), !self.sol(cell, value), alt.get(cell, value)]);
            }
        }
    }

    /// Adds the clauses of a mask-shape or interface constraint.
    ///
    /// Strategy, uniqueness and objective constraints are handled by the
    /// synthesizer and ignored here.
    pub(crate) fn encode(&mut self, formula: &mut Formula, grid: &Grid, constraint: &Constraint) {
        match constraint {
            Constraint::HiddenCount { min, max } => {
                formula.at_least(self.hidden.clone(), *min);
                formula.at_most(self.hidden.clone(), *max);
            }
            Constraint::Symmetry(symmetry) => {
                for cell in grid.cells() {
                    let image = symmetry.mirror(cell, self.size);
                    if image > cell {
                        formula.implies(self.hidden(cell), self.hidden(image));
                        formula.implies(self.hidden(image), self.hidden(cell));
                    }
                }
            }
            Constraint::ForbidValues(values) => {
                for cell in grid.cells() {
                    for &value in values {
                        formula.implies(self.sol(cell, value), self.hidden(cell));
                    }
                }
            }
            Constraint::FixCell { cell, value } => {
                formula.require(self.sol(*cell, *value));
                formula.require(!self.hidden(*cell));
            }
            Constraint::OpenCell(cell) => formula.require(self.hidden(*cell)),
            Constraint::Pattern(pattern) => {
                for (cell, symbol) in pattern.iter() {
                    match symbol {
                        MaskSymbol::Free => {}
                        MaskSymbol::Hidden => formula.require(self.hidden(cell)),
                        MaskSymbol::Visible => formula.require(!self.hidden(cell)),
                        MaskSymbol::Given(value) => {
                            formula.require(self.sol(cell, value));
                            formula.require(!self.hidden(cell));
                        }
                    }
                }
            }
            Constraint::CanonicalTopRow => {
                for (x, value) in (0..self.size).zip(grid.values()) {
                    formula.require(self.sol(Cell::new(x, 0), value));
                }
            }
            Constraint::FixSolution(solution) => self.fix_solution(formula, solution),
            Constraint::InputCell {
                location,
                solution,
                decoy,
            } => self.designate_input(formula, grid, *location, *solution, *decoy),
            Constraint::HighlightStrike { cell, value } => {
                self.designate_highlight(formula, grid, *cell, *value);
            }
            Constraint::OutputCell {
                location,
                solution,
                forbidden_solution,
                decoy,
            } => self.designate_output(formula, grid, *location, *solution, *forbidden_solution, *decoy),
            Constraint::InterfaceAllDifferent
            | Constraint::InputCellUndeducible(_)
            | Constraint::NoForcedHiddenCell
            | Constraint::MaximizeHidden
            | Constraint::MinimizeHidden
            | Constraint::UniqueSolution
            | Constraint::Strategy(_) => {}
        }
    }

    pub(crate) fn decode_mask(&self, model: &Model, grid: &Grid) -> CellSet {
        let mut mask = CellSet::new(self.size);
        for cell in grid.cells() {
            if model.value(self.hidden(cell)) {
                mask.insert(cell);
            }
        }
        mask
    }

    pub(crate) fn decode_highlight(&self, model: &Model, grid: &Grid) -> Option<(Cell, Value)> {
        let highlight = self.highlight.as_ref()?;
        grid.cells()
            .flat_map(|c| grid.values().map(move |v| (c, v)))
            .find(|(c, v)| model.value(highlight[self.pair_index(*c, *v)]))
    }

    pub(crate) fn decode_interface(&self, model: &Model, grid: &Grid) -> Interface {
        let decode = |side: &Option<InterfaceVars>| {
            let side = side.as_ref()?;
            let cell = grid.cells().find(|c| model.value(side.at[c.index(self.size)]))?;
            let decoy = grid.values().find(|v| model.value(side.decoy[v.index()]))?;
            Some(InterfaceCell { cell, decoy })
        };
        Interface {
            input: decode(&self.input),
            output: decode(&self.output),
        }
    }
}

//! Symbolic encoding of stage closures and strategy requirements.
//!
//! A stage's closure is a least fixpoint, which a SAT formula cannot state
//! directly. Each stage is instead encoded in up to two copies built from
//! its ground program:
//!
//! - the *lower* copy unrolls the fixpoint for a bounded number of rounds.
//!   Every fact it holds has a derivation, so it under-approximates the
//!   closure and `Derived` leaves are sound against it.
//! - the *upper* copy is any set closed under the ground rules. The least
//!   such set is the closure, so it over-approximates the closure and
//!   `NotDerived` leaves are sound against it.
//!
//! `Absent` body atoms read the other copy: a rule that needs `g` absent
//! fires in the lower copy only when `g` is outside the upper copy, and is
//! blocked in the upper copy only when `g` is inside the lower copy. Stages
//! reject rules that read the absence of a kind produced in their own or a
//! later stratum, so absence in the final closure is absence where the rule
//! is evaluated.
//!
//! With a fixed solution both copies shrink: puzzle atoms about the
//! solution are constants, and facts contradicting it are left out of both
//! copies. The closure only holds consistent facts, so the lower copy loses
//! nothing, and the upper copy states instead that the body of a rule with
//! an inconsistent head never holds.

use std::{
    collections::{HashMap, HashSet},
    iter,
};

use sudogen_core::Grid;
use sudogen_deduce::{
    Atom, Condition, Fact, GroundProgram, GroundRule, StageId, Strategy, StrategyRequirement,
};

use crate::{Formula, Lit, encoder::PuzzleVars};

#[derive(Debug, Clone, Copy, Default)]
struct Needs {
    lower: bool,
    upper: bool,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

/// The fact literals of one stage's copies. Facts missing from a map are
/// false in that copy.
#[derive(Debug, Default)]
struct Copies {
    lower: HashMap<Fact, Lit>,
    upper: HashMap<Fact, Lit>,
}

impl Copies {
    fn side(&self, side: Side) -> &HashMap<Fact, Lit> {
        match side {
            Side::Lower => &self.lower,
            Side::Upper => &self.upper,
        }
    }
}

/// Encodes [`StrategyRequirement`]s over the puzzle variables.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StrategyEncoder<'a> {
    grid: &'a Grid,
    rounds: usize,
}

impl<'a> StrategyEncoder<'a> {
    pub(crate) fn new(grid: &'a Grid, rounds: usize) -> Self {
        Self { grid, rounds }
    }

    /// Adds clauses forcing the puzzle to meet `requirement`.
    pub(crate) fn encode(
        &self,
        formula: &mut Formula,
        vars: &mut PuzzleVars,
        requirement: &StrategyRequirement,
    ) {
        let strategy = &requirement.strategy;
        let holds = requirement.expectation.is_holds();
        let (vars_before, clauses_before) = (formula.num_vars(), formula.num_clauses());

        let mut programs = Vec::with_capacity(strategy.len());
        let mut targets = Vec::with_capacity(strategy.len());
        for stage in strategy.stages() {
            let scope = stage.scope(self.grid);
            programs.push(stage.ground(&scope));
            let stability = stage.stability(&scope);
            targets.push(if holds { stability } else { stability.negate() });
        }
        let needs = needs(strategy, &programs, &targets);

        let mut copies: Vec<Copies> = Vec::with_capacity(strategy.len());
        for id in strategy.ids() {
            let program = &programs[id.0];
            let need = needs[id.0];
            let mut stage = Copies::default();
            let upper_seeds = seeds(formula, strategy, id, &copies, Side::Upper);
            let lower_seeds = seeds(formula, strategy, id, &copies, Side::Lower);
            if need.upper {
                stage.upper = reachable(program, vars, upper_seeds.keys().copied())
                    .into_iter()
                    .map(|f| (f, formula.new_var()))
                    .collect();
            }
            if need.lower {
                stage.lower = self.lower_copy(formula, vars, program, lower_seeds, &stage.upper);
            }
            if need.upper {
                close_upper(formula, vars, program, &upper_seeds, &stage);
            }
            log::debug!(
                "{}: lower copy {} facts, upper copy {} facts",
                strategy.stage(id).name(),
                stage.lower.len(),
                stage.upper.len()
            );
            copies.push(stage);
        }

        let compiled = targets
            .iter()
            .zip(&copies)
            .map(|(target, stage)| compile(formula, vars, target, stage))
            .collect::<Vec<_>>();
        if holds {
            for lit in compiled {
                formula.require(lit);
            }
        } else {
            formula.add_clause(compiled);
        }
        log::debug!(
            "strategy of {} stages: {} vars, {} clauses",
            strategy.len(),
            formula.num_vars() - vars_before,
            formula.num_clauses() - clauses_before
        );
    }

    /// Unrolls the fixpoint from `seeds`.
    ///
    /// A round gives each fact a fresh literal that implies the fact held in
    /// the previous round or some rule fired on the previous round's facts.
    /// A fact whose supporting rule firings did not change keeps its
    /// literal, and unrolling stops early once a round changes nothing.
    fn lower_copy(
        &self,
        formula: &mut Formula,
        vars: &mut PuzzleVars,
        program: &GroundProgram,
        seeds: HashMap<Fact, Lit>,
        upper: &HashMap<Fact, Lit>,
    ) -> HashMap<Fact, Lit> {
        let mut current = seeds;
        let mut supported_by = HashMap::<Fact, Vec<Lit>>::new();
        let mut firings = HashMap::<Vec<Lit>, Lit>::new();

        for round in 0..self.rounds {
            let mut support = HashMap::<Fact, Vec<Lit>>::new();
            for rule in program.rules() {
                let heads = rule
                    .heads()
                    .iter()
                    .filter(|f| vars.consistent(f))
                    .collect::<Vec<_>>();
                if heads.is_empty() {
                    continue;
                }
                let Some(mut body) = lower_body(formula, vars, rule, &current, upper) else {
                    continue;
                };
                body.sort_unstable();
                body.dedup();
                let fire = match firings.get(&body) {
                    Some(fire) => *fire,
                    None => {
                        let fire = formula.new_var();
                        for &lit in &body {
                            formula.implies(fire, lit);
                        }
                        firings.insert(body, fire);
                        fire
                    }
                };
                for head in heads {
                    support.entry(*head).or_default().push(fire);
                }
            }

            let mut next = current.clone();
            for (fact, mut fires) in support {
                fires.sort_unstable();
                fires.dedup();
                if supported_by.get(&fact) == Some(&fires) {
                    continue;
                }
                let lit = formula.new_var();
                formula.add_clause(
                    iter::once(!lit)
                        .chain(current.get(&fact).copied())
                        .chain(fires.iter().copied()),
                );
                next.insert(fact, lit);
                supported_by.insert(fact, fires);
            }
            if next == current {
                log::trace!("lower copy settled after {round} rounds");
                break;
            }
            current = next;
        }

        for (fact, &lit) in &current {
            require_consistent(formula, vars, *fact, lit);
        }
        current
    }
}

/// Returns the literals of `rule`'s body in the lower copy, or `None` if a
/// derived body fact cannot hold yet or a puzzle atom is fixed false.
fn lower_body(
    formula: &mut Formula,
    vars: &mut PuzzleVars,
    rule: &GroundRule,
    current: &HashMap<Fact, Lit>,
    upper: &HashMap<Fact, Lit>,
) -> Option<Vec<Lit>> {
    let mut body = Vec::with_capacity(rule.body().len());
    for atom in rule.body() {
        match atom {
            Atom::Derived(f) => body.push(*current.get(f)?),
            Atom::Absent(g) => body.extend(upper.get(g).map(|u| !*u)),
            Atom::Puzzle(p) => match vars.fixed(*p) {
                Some(false) => return None,
                Some(true) => {}
                None => body.push(vars.atom(formula, *p)),
            },
        }
    }
    Some(body)
}

/// Makes the upper copy of `stage` contain its seeds and be closed under
/// every rule of `program`.
fn close_upper(
    formula: &mut Formula,
    vars: &mut PuzzleVars,
    program: &GroundProgram,
    seeds: &HashMap<Fact, Lit>,
    stage: &Copies,
) {
    for (fact, &seed) in seeds {
        if let Some(&u) = stage.upper.get(fact) {
            formula.implies(seed, u);
        }
    }
    'rules: for rule in program.rules() {
        let mut clause = Vec::with_capacity(rule.body().len() + 1);
        for atom in rule.body() {
            match atom {
                Atom::Derived(f) => match stage.upper.get(f) {
                    Some(u) => clause.push(!*u),
                    None => continue 'rules,
                },
                Atom::Absent(g) => clause.extend(stage.lower.get(g).copied()),
                Atom::Puzzle(p) => match vars.fixed(*p) {
                    Some(false) => continue 'rules,
                    Some(true) => {}
                    None => clause.push(!vars.atom(formula, *p)),
                },
            }
        }
        if rule.heads().iter().any(|f| !vars.consistent(f)) {
            formula.add_clause(clause);
            continue;
        }
        for head in rule.heads() {
            if let Some(&u) = stage.upper.get(head) {
                formula.add_clause(clause.iter().copied().chain([u]));
            }
        }
    }
    for (fact, &lit) in &stage.upper {
        require_consistent(formula, vars, *fact, lit);
    }
}

/// Techniques are sound, so a derived placement or strike agrees with the
/// intended solution in either copy.
fn require_consistent(formula: &mut Formula, vars: &PuzzleVars, fact: Fact, lit: Lit) {
    match fact {
        Fact::Solution(c, v) => formula.implies(lit, vars.sol(c, v)),
        Fact::Strike(c, v) => formula.implies(lit, !vars.sol(c, v)),
        _ => {}
    }
}

/// Consistent facts derivable from `seeds` when every absence atom and
/// every puzzle atom not fixed false holds.
fn reachable<I>(program: &GroundProgram, vars: &PuzzleVars, seeds: I) -> HashSet<Fact>
where
    I: IntoIterator<Item = Fact>,
{
    let mut facts = seeds.into_iter().collect::<HashSet<_>>();
    loop {
        let before = facts.len();
        for rule in program.rules() {
            let ready = rule.body().iter().all(|atom| match atom {
                Atom::Derived(f) => facts.contains(f),
                Atom::Absent(_) => true,
                Atom::Puzzle(p) => vars.fixed(*p) != Some(false),
            });
            if ready {
                facts.extend(rule.heads().iter().copied().filter(|f| vars.consistent(f)));
            }
        }
        if facts.len() == before {
            return facts;
        }
    }
}

/// Seeds of stage `id` in one copy: each forwarded fact holds if it holds
/// in the same copy of some source stage.
fn seeds(
    formula: &mut Formula,
    strategy: &Strategy,
    id: StageId,
    copies: &[Copies],
    side: Side,
) -> HashMap<Fact, Lit> {
    let mut sources = HashMap::<Fact, Vec<Lit>>::new();
    for edge in strategy.incoming(id) {
        for (fact, &lit) in copies[edge.source.0].side(side) {
            if fact.category().intersects(edge.forward) {
                sources.entry(*fact).or_default().push(lit);
            }
        }
    }
    sources
        .into_iter()
        .map(|(fact, lits)| (fact, formula.or(lits)))
        .collect()
}

/// Decides which copies each stage needs.
///
/// Stability targets ask for lower copies through `Derived` leaves and
/// upper copies through `NotDerived` leaves. A stage reading absence needs
/// both copies as soon as it needs one, and a stage's copies need the same
/// copies of the stages feeding it.
fn needs(strategy: &Strategy, programs: &[GroundProgram], targets: &[Condition]) -> Vec<Needs> {
    let mut needs = targets
        .iter()
        .map(|t| {
            let (lower, upper) = t.leaf_polarities();
            Needs { lower, upper }
        })
        .collect::<Vec<_>>();
    for id in strategy.ids().collect::<Vec<_>>().into_iter().rev() {
        let reads_absence = programs[id.0]
            .rules()
            .iter()
            .any(|r| r.body().iter().any(|a| matches!(a, Atom::Absent(_))));
        let need = &mut needs[id.0];
        if reads_absence && (need.lower || need.upper) {
            need.lower = true;
            need.upper = true;
        }
        let need = *need;
        for edge in strategy.incoming(id) {
            let source = &mut needs[edge.source.0];
            source.lower |= need.lower;
            source.upper |= need.upper;
        }
    }
    needs
}

/// Compiles a condition in negation normal form to a literal.
fn compile(formula: &mut Formula, vars: &mut PuzzleVars, condition: &Condition, stage: &Copies) -> Lit {
    match condition {
        Condition::True => formula.constant(true),
        Condition::False => formula.constant(false),
        Condition::Derived(f) => match stage.lower.get(f) {
            Some(&lit) => lit,
            None => formula.constant(false),
        },
        Condition::NotDerived(f) => match stage.upper.get(f) {
            Some(&lit) => !lit,
            None => formula.constant(true),
        },
        Condition::Puzzle(p) => vars.atom(formula, *p),
        Condition::NotPuzzle(p) => !vars.atom(formula, *p),
        Condition::All(cs) => {
            let lits = cs.iter().map(|c| compile(formula, vars, c, stage)).collect::<Vec<_>>();
            formula.and(lits)
        }
        Condition::Any(cs) => {
            let lits = cs.iter().map(|c| compile(formula, vars, c, stage)).collect::<Vec<_>>();
            formula.or(lits)
        }
    }
}

//! Stages: named rule sets evaluated to their own closure.

use sudogen_core::Grid;

use crate::{
    Condition, FactKind, GroundProgram, GroupFilter, Grounding, Scope,
    rule::{BoxedRule, Stratum},
};

/// An error building or using a [`Stage`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StageError {
    /// A rule reads the absence of a fact kind that a rule in the same or a
    /// higher stratum produces.
    #[display("rule `{rule}` reads the absence of {kind} facts produced in its own or a later stratum")]
    UnstratifiedNegation {
        /// The rule reading absence.
        rule: &'static str,
        /// The fact kind.
        kind: FactKind,
    },
    /// A rule cannot be used on the grid.
    #[display("rule `{rule}` does not support this grid")]
    UnsupportedGrid {
        /// The rule's name.
        rule: &'static str,
    },
}

/// One derivation pass: a set of enabled rules over a set of active groups.
///
/// # Examples
///
/// ```
/// use sudogen_deduce::{Stage, rule};
///
/// let stage = Stage::new("singles", rule::singles_rules())?;
/// assert_eq!(stage.name(), "singles");
/// assert_eq!(stage.rules().len(), 3);
/// # Ok::<(), sudogen_deduce::StageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Stage {
    name: String,
    rules: Vec<BoxedRule>,
    groups: GroupFilter,
}

impl Stage {
    /// Creates a stage over all groups.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnstratifiedNegation`] if a rule reads the
    /// absence of a fact kind produced by a rule of the same or a later
    /// stratum.
    pub fn new(name: impl Into<String>, rules: Vec<BoxedRule>) -> Result<Self, StageError> {
        for reader in &rules {
            for &kind in reader.negates() {
                let clash = rules
                    .iter()
                    .find(|r| r.produces().contains(&kind) && r.stratum() >= reader.stratum());
                if clash.is_some() {
                    return Err(StageError::UnstratifiedNegation {
                        rule: reader.name(),
                        kind,
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            rules,
            groups: GroupFilter::All,
        })
    }

    /// Restricts the stage to the groups admitted by `groups`.
    #[must_use]
    pub fn with_groups(mut self, groups: GroupFilter) -> Self {
        self.groups = groups;
        self
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the enabled rules.
    #[must_use]
    pub fn rules(&self) -> &[BoxedRule] {
        &self.rules
    }

    /// Returns the active-group filter.
    #[must_use]
    pub fn groups(&self) -> &GroupFilter {
        &self.groups
    }

    /// Iterates over the rules of one stratum.
    pub fn rules_in(&self, stratum: Stratum) -> impl Iterator<Item = &BoxedRule> {
        self.rules.iter().filter(move |r| r.stratum() == stratum)
    }

    /// Returns the stage's view of `grid`.
    #[must_use]
    pub fn scope<'a>(&self, grid: &'a Grid) -> Scope<'a> {
        Scope::new(grid, &self.groups)
    }

    /// Checks that every rule supports `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnsupportedGrid`] naming the first rule that
    /// does not.
    pub fn check_grid(&self, grid: &Grid) -> Result<(), StageError> {
        match self.rules.iter().find(|r| !r.supports(grid)) {
            Some(rule) => Err(StageError::UnsupportedGrid { rule: rule.name() }),
            None => Ok(()),
        }
    }

    /// Returns the stability predicate: the conjunction of every rule's
    /// requirement. A stage without meta rules is always stable.
    #[must_use]
    pub fn stability(&self, scope: &Scope<'_>) -> Condition {
        Condition::all(self.rules.iter().filter_map(|r| r.requirement(scope)))
    }

    /// Instantiates every rule over `scope`.
    #[must_use]
    pub fn ground(&self, scope: &Scope<'_>) -> GroundProgram {
        let mut rules = Vec::new();
        for rule in &self.rules {
            let mut grounding = Grounding::new(scope, rule.stratum());
            rule.ground(&mut grounding);
            rules.extend(grounding.into_rules());
        }
        let program = GroundProgram::new(rules);
        log::debug!("stage `{}`: {} ground rules", self.name, program.len());
        program
    }
}

#[cfg(test)]
mod tests {
    use sudogen_core::MaskPattern;

    use super::*;
    use crate::rule::{
        ElementaryClosure, MaskDerived, MaskNotDerived, Rule, Solved, singles_rules,
    };

    #[test]
    fn test_verdict_rule_may_negate_inference() {
        let pattern: MaskPattern = "?".repeat(16).parse().unwrap();
        let stage = Stage::new(
            "mask",
            vec![
                ElementaryClosure::new().clone_box(),
                MaskNotDerived::new(pattern).clone_box(),
            ],
        );
        assert!(stage.is_ok());
    }

    #[test]
    fn test_unstratified_negation() {
        #[derive(Debug, Clone, Copy)]
        struct LateSolver;

        impl Rule for LateSolver {
            fn name(&self) -> &'static str {
                "late"
            }

            fn clone_box(&self) -> BoxedRule {
                Box::new(*self)
            }

            fn stratum(&self) -> Stratum {
                Stratum::Verdict
            }

            fn produces(&self) -> &'static [FactKind] {
                &[FactKind::Solution]
            }
        }

        let pattern: MaskPattern = "?".repeat(16).parse().unwrap();
        let err = Stage::new(
            "bad",
            vec![Box::new(LateSolver), MaskNotDerived::new(pattern).clone_box()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            StageError::UnstratifiedNegation {
                rule: "Mask Not Derived",
                kind: FactKind::Solution,
            }
        );
    }

    #[test]
    fn test_check_grid() {
        let pattern: MaskPattern = "?".repeat(16).parse().unwrap();
        let stage = Stage::new("mask", vec![MaskDerived::new(pattern).clone_box()]).unwrap();
        assert!(stage.check_grid(&Grid::regular(4).unwrap()).is_ok());
        assert_eq!(
            stage.check_grid(&Grid::regular(9).unwrap()),
            Err(StageError::UnsupportedGrid {
                rule: "Mask Derived"
            })
        );
    }

    #[test]
    fn test_stability_collects_requirements() {
        let grid = Grid::regular(4).unwrap();
        let plain = Stage::new("plain", singles_rules()).unwrap();
        assert_eq!(plain.stability(&plain.scope(&grid)), Condition::True);

        let mut rules = singles_rules();
        rules.push(Box::new(Solved::new()));
        let solved = Stage::new("solved", rules).unwrap();
        assert!(matches!(solved.stability(&solved.scope(&grid)), Condition::All(_)));
    }
}

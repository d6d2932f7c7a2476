//! Advisory constraint diagnostics.
//!
//! Adding a constraint computes the range of its polynomial over the
//! hypercube. When that range alone decides the constraint (it holds for
//! every assignment, or for none), a [`Diagnostic`] is produced. Diagnostics
//! are values: they are returned from the call, kept on the model and logged
//! as warnings, but never turned into errors.

use pbo_coeff::Number;
use std::fmt;

use crate::model::ConstraintKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Satisfiability {
    AlwaysSatisfied,
    NeverSatisfied,
}

impl Satisfiability {
    pub fn description(&self) -> &'static str {
        match self {
            Satisfiability::AlwaysSatisfied => "always satisfied",
            Satisfiability::NeverSatisfied => "never satisfiable",
        }
    }

    /// Decide `P <kind> 0` from the range `[lower, upper]` of `P`, if the
    /// range is enough.
    pub fn classify(kind: ConstraintKind, lower: &Number, upper: &Number) -> Option<Self> {
        let zero = Number::zero();
        let (never, always) = match kind {
            ConstraintKind::Eq => (
                *lower > zero || *upper < zero,
                lower.is_zero() && upper.is_zero(),
            ),
            ConstraintKind::Le => (*lower > zero, *upper <= zero),
            ConstraintKind::Lt => (*lower >= zero, *upper < zero),
            ConstraintKind::Ge => (*upper < zero, *lower >= zero),
            ConstraintKind::Gt => (*upper <= zero, *lower > zero),
        };
        if never {
            Some(Satisfiability::NeverSatisfied)
        } else if always {
            Some(Satisfiability::AlwaysSatisfied)
        } else {
            None
        }
    }
}

/// One decided constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Position of the constraint in the model, in insertion order
    pub constraint: usize,
    pub kind: ConstraintKind,
    pub satisfiability: Satisfiability,
    pub lower: Number,
    pub upper: Number,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constraint {} (P {} 0) is {}: P ranges over [{}, {}]",
            self.constraint,
            self.kind.symbol(),
            self.satisfiability.description(),
            self.lower,
            self.upper
        )
    }
}

/// Diagnostics accumulated by a model, in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Constraints no assignment can satisfy
    pub fn unsatisfiable(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.satisfiability == Satisfiability::NeverSatisfied)
    }

    pub fn has_unsatisfiable(&self) -> bool {
        self.unsatisfiable().next().is_some()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Number {
        Number::from(v)
    }

    #[test]
    fn classify_each_relation() {
        use ConstraintKind::*;
        use Satisfiability::*;

        assert_eq!(Satisfiability::classify(Eq, &n(0.0), &n(0.0)), Some(AlwaysSatisfied));
        assert_eq!(Satisfiability::classify(Eq, &n(0.5), &n(1.5)), Some(NeverSatisfied));
        assert_eq!(Satisfiability::classify(Eq, &n(-1.5), &n(-0.5)), Some(NeverSatisfied));
        assert_eq!(Satisfiability::classify(Eq, &n(-1.0), &n(1.0)), None);

        assert_eq!(Satisfiability::classify(Lt, &n(0.0), &n(2.0)), Some(NeverSatisfied));
        assert_eq!(Satisfiability::classify(Lt, &n(-1.5), &n(-0.5)), Some(AlwaysSatisfied));
        assert_eq!(Satisfiability::classify(Le, &n(-1.0), &n(0.0)), Some(AlwaysSatisfied));
        assert_eq!(Satisfiability::classify(Le, &n(0.5), &n(1.5)), Some(NeverSatisfied));

        assert_eq!(Satisfiability::classify(Gt, &n(-2.0), &n(0.0)), Some(NeverSatisfied));
        assert_eq!(Satisfiability::classify(Gt, &n(0.5), &n(1.5)), Some(AlwaysSatisfied));
        assert_eq!(Satisfiability::classify(Ge, &n(0.0), &n(1.0)), Some(AlwaysSatisfied));
        assert_eq!(Satisfiability::classify(Ge, &n(-1.5), &n(-0.5)), Some(NeverSatisfied));
        assert_eq!(Satisfiability::classify(Ge, &n(-1.0), &n(1.0)), None);
    }

    #[test]
    fn container_filters_unsatisfiable() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_unsatisfiable());
        diags.push(Diagnostic {
            constraint: 0,
            kind: ConstraintKind::Le,
            satisfiability: Satisfiability::AlwaysSatisfied,
            lower: n(-2.0),
            upper: n(-1.0),
        });
        diags.push(Diagnostic {
            constraint: 1,
            kind: ConstraintKind::Eq,
            satisfiability: Satisfiability::NeverSatisfied,
            lower: n(1.0),
            upper: n(2.0),
        });
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.unsatisfiable().count(), 1);
        assert!(diags.has_unsatisfiable());
        assert_eq!(
            diags.iter().next().map(|d| d.to_string()),
            Some("constraint 0 (P <= 0) is always satisfied: P ranges over [-2, -1]".to_string())
        );
    }
}

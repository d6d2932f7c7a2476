//! Constrained models: an objective with penalty-encoded constraints.
//!
//! Every constraint `P <rel> 0` is compiled into the objective as a penalty
//! that vanishes exactly on the feasible assignments:
//!
//! - `P == 0` adds `lam * P^2`
//! - `P <= 0` adds `lam * (P + s)^2` where the slack `s` is a weighted sum of
//!   fresh ancilla bits spanning `[0, floor(-lower)]`
//! - `P < 0` is `P + 1 <= 0`, `P > 0` is `-P < 0`, `P >= 0` is `-P <= 0`
//!
//! Slack bits are binary indicators in either domain (a spin ancilla `s`
//! contributes through `(1 - s) / 2`). The original constraint polynomial is
//! kept for validity checks.

use pbo_coeff::{Coefficient, Number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::ancilla::AncillaOrigin;
use crate::bruteforce::minimize_where;
use crate::diagnostics::{Diagnostic, Diagnostics, Satisfiability};
use crate::domain::{Binary, Domain, Spin};
use crate::error::{PbError, Result};
use crate::label::Label;
use crate::polynomial::{Assignment, Polynomial, Pubo};

/// Slack used when checking float-valued constraints.
const VALIDITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ConstraintKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            ConstraintKind::Eq => "==",
            ConstraintKind::Lt => "<",
            ConstraintKind::Le => "<=",
            ConstraintKind::Gt => ">",
            ConstraintKind::Ge => ">=",
        }
    }

    /// Whether `value <rel> 0` holds. Exact values compare exactly.
    pub fn holds(&self, value: &Number) -> bool {
        let tol = if value.is_exact() { 0.0 } else { VALIDITY_TOLERANCE };
        let v = value.to_f64();
        match self {
            ConstraintKind::Eq => v.abs() <= tol,
            ConstraintKind::Lt => v < -tol,
            ConstraintKind::Le => v <= tol,
            ConstraintKind::Gt => v > tol,
            ConstraintKind::Ge => v >= -tol,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Options shared by every `add_constraint_*` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintOptions {
    /// Penalty weight; may be symbolic
    pub lam: Coefficient,
    /// Binary (1, 2, 4, ...) slack encoding instead of one bit per unit
    pub log_trick: bool,
    /// Range of the constraint polynomial, replacing the computed bounds
    pub bounds: Option<(Number, Number)>,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            lam: Coefficient::one(),
            log_trick: true,
            bounds: None,
        }
    }
}

impl ConstraintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lam(mut self, lam: impl Into<Coefficient>) -> Self {
        self.lam = lam.into();
        self
    }

    pub fn log_trick(mut self, log_trick: bool) -> Self {
        self.log_trick = log_trick;
        self
    }

    pub fn bounds(mut self, lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        self.bounds = Some((lower.into(), upper.into()));
        self
    }
}

/// A constraint as the caller stated it.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint<D: Domain> {
    pub kind: ConstraintKind,
    pub polynomial: Polynomial<D, Label>,
}

/// Slack weights spanning exactly `[0, range]`.
///
/// Logarithmic: `1, 2, ..., 2^(k-1)` with `k = floor(log2(range + 1))`, plus
/// the remainder `range - (2^k - 1)` when nonzero. Unary: `range` ones.
pub fn slack_weights(range: u64, log_trick: bool) -> Vec<u64> {
    if range == 0 {
        return Vec::new();
    }
    if !log_trick {
        return vec![1; range as usize];
    }
    let bits = 63 - (range + 1).leading_zeros();
    let mut weights: Vec<u64> = (0..bits).map(|i| 1u64 << i).collect();
    let rest = range - ((1u64 << bits) - 1);
    if rest > 0 {
        weights.push(rest);
    }
    weights
}

fn next_free_ancilla(labels: &[Label]) -> u32 {
    labels
        .iter()
        .filter_map(|l| match l {
            Label::Ancilla(n) => Some(n + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Model
// =============================================================================

#[derive(Debug, Clone)]
pub struct Model<D: Domain> {
    objective: Polynomial<D, Label>,
    constraints: Vec<Constraint<D>>,
    next_ancilla: u32,
    diagnostics: Diagnostics,
}

/// Pseudo-boolean constrained binary optimization
pub type Pcbo = Model<Binary>;
/// Higher-order Ising optimization
pub type Hoio = Model<Spin>;

impl<D: Domain> Default for Model<D> {
    fn default() -> Self {
        Self {
            objective: Polynomial::new(),
            constraints: Vec::new(),
            next_ancilla: 0,
            diagnostics: Diagnostics::new(),
        }
    }
}

impl<D: Domain> From<Polynomial<D, Label>> for Model<D> {
    fn from(objective: Polynomial<D, Label>) -> Self {
        let next_ancilla = next_free_ancilla(objective.index().labels());
        Self {
            objective,
            constraints: Vec::new(),
            next_ancilla,
            diagnostics: Diagnostics::new(),
        }
    }
}

impl<D: Domain> Model<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objective including every constraint penalty added so far.
    pub fn objective(&self) -> &Polynomial<D, Label> {
        &self.objective
    }

    pub fn into_objective(self) -> Polynomial<D, Label> {
        self.objective
    }

    pub fn constraints(&self) -> &[Constraint<D>] {
        &self.constraints
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // ===== Constraint compilation =====

    pub fn add_constraint(
        &mut self,
        kind: ConstraintKind,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        match kind {
            ConstraintKind::Eq => self.add_equality(p, opts),
            _ => self.add_inequality(kind, p, opts),
        }
    }

    /// Enforce `P == 0` with the penalty `lam * P^2`.
    pub fn add_constraint_eq_zero(
        &mut self,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        self.add_equality(p, opts)
    }

    pub fn add_constraint_lt_zero(
        &mut self,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        self.add_inequality(ConstraintKind::Lt, p, opts)
    }

    pub fn add_constraint_le_zero(
        &mut self,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        self.add_inequality(ConstraintKind::Le, p, opts)
    }

    pub fn add_constraint_gt_zero(
        &mut self,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        self.add_inequality(ConstraintKind::Gt, p, opts)
    }

    pub fn add_constraint_ge_zero(
        &mut self,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        self.add_inequality(ConstraintKind::Ge, p, opts)
    }

    fn add_equality(&mut self, p: &Polynomial<D, Label>, opts: &ConstraintOptions) -> Result<Option<Diagnostic>> {
        // symbolic constraints without explicit bounds are not diagnosed
        let range = match &opts.bounds {
            Some(bounds) => Some(bounds.clone()),
            None if p.params().is_empty() => Some(p.bounds()?),
            None => None,
        };
        let index = self.constraints.len();
        let diagnostic = range.and_then(|(lo, hi)| diagnose(index, ConstraintKind::Eq, lo, hi));

        let penalty = p.pow(2).scale(&opts.lam);
        self.objective += &penalty;
        self.finish(ConstraintKind::Eq, p, diagnostic, 0)
    }

    fn add_inequality(
        &mut self,
        kind: ConstraintKind,
        p: &Polynomial<D, Label>,
        opts: &ConstraintOptions,
    ) -> Result<Option<Diagnostic>> {
        let (lo, hi) = match &opts.bounds {
            Some(bounds) => bounds.clone(),
            None => p.bounds()?,
        };
        let index = self.constraints.len();
        let diagnostic = diagnose(index, kind, lo.clone(), hi.clone());

        // ancilla labels can reach the objective through `DerefMut`
        self.next_ancilla = self
            .next_ancilla
            .max(next_free_ancilla(self.objective.index().labels()))
            .max(next_free_ancilla(p.index().labels()));

        // rewrite as `q <= 0`, with `q_lo` the lower bound of `q`
        let (q, q_lo) = match kind {
            ConstraintKind::Le => (p.clone(), lo),
            ConstraintKind::Lt => (p + 1, lo + Number::one()),
            ConstraintKind::Ge => (-p, -hi),
            ConstraintKind::Gt => (-p + 1, -hi + Number::one()),
            ConstraintKind::Eq => return self.add_equality(p, opts),
        };

        let mut slack_bits = 0;
        match diagnostic.as_ref().map(|d| d.satisfiability) {
            Some(Satisfiability::AlwaysSatisfied) => {}
            Some(Satisfiability::NeverSatisfied) => {
                self.objective += &q.pow(2).scale(&opts.lam);
            }
            None => {
                let range = (-q_lo).floor();
                let range = range.to_i64().filter(|r| *r >= 0).ok_or_else(|| {
                    PbError::MalformedInput(format!("slack range {} is not representable", range))
                })? as u64;
                let weights = slack_weights(range, opts.log_trick);
                slack_bits = weights.len();
                let slack = self.slack(index, &weights);
                let expr = &q + &slack;
                self.objective += &expr.pow(2).scale(&opts.lam);
            }
        }
        self.finish(kind, p, diagnostic, slack_bits)
    }

    /// `sum w_i * b_i` over fresh ancilla bits, recorded as slack.
    fn slack(&mut self, constraint: usize, weights: &[u64]) -> Polynomial<D, Label> {
        let mut slack = Polynomial::new();
        for &w in weights {
            let label = Label::Ancilla(self.next_ancilla);
            self.next_ancilla += 1;
            let bit = Pubo::<Label>::var(label.clone()).to_domain::<D>();
            slack += &(bit * Number::from(w));
            self.objective.ancillas_mut().record(
                label,
                AncillaOrigin::Slack {
                    constraint,
                    weight: Number::from(w),
                },
            );
        }
        slack
    }

    fn finish(
        &mut self,
        kind: ConstraintKind,
        p: &Polynomial<D, Label>,
        diagnostic: Option<Diagnostic>,
        slack_bits: usize,
    ) -> Result<Option<Diagnostic>> {
        let index = self.constraints.len();
        self.constraints.push(Constraint {
            kind,
            polynomial: p.clone(),
        });
        debug!(
            target: "constraint",
            index,
            relation = kind.symbol(),
            slack_bits,
            terms = self.objective.num_terms(),
            "constraint compiled"
        );
        if let Some(d) = &diagnostic {
            warn!(target: "constraint", index, "{}", d);
            self.diagnostics.push(d.clone());
        }
        Ok(diagnostic)
    }

    // ===== Solutions =====

    /// Drop every slack or reduction ancilla recorded on the objective.
    pub fn remove_ancilla_from_solution(&self, solution: &Assignment) -> Assignment {
        solution
            .iter()
            .filter(|(label, _)| !self.objective.ancillas().contains(label))
            .map(|(label, value)| (label.clone(), *value))
            .collect()
    }

    /// Whether every recorded constraint holds. Missing variables and
    /// unresolved parameters count as violations.
    pub fn is_solution_valid(&self, solution: &Assignment) -> bool {
        self.constraints.iter().all(|c| match c.polynomial.value_number(solution) {
            Ok(v) => c.kind.holds(&v),
            Err(_) => false,
        })
    }

    /// Optimal objective value with its minimizers, searched only among the
    /// assignments that satisfy every constraint, so a penalty weight that
    /// is too small still yields a feasible answer. When no assignment is
    /// feasible the plain minimizers of the objective are returned instead.
    /// Ancillas are removed from the minimizers.
    pub fn bruteforce(&self, all: bool) -> Result<(Number, Vec<Assignment>)> {
        let vars = self.enumerated_variables();
        let feasible = |sol: &Assignment| self.is_solution_valid(sol);
        let (value, sols) = match minimize_where(&self.objective, &vars, all, Some(&feasible))? {
            (Some(value), sols) => (value, sols),
            (None, _) => {
                warn!(target: "constraint", "no assignment satisfies every constraint");
                let (value, sols) = minimize_where(&self.objective, &vars, all, None)?;
                (value.unwrap_or_else(Number::zero), sols)
            }
        };
        let sols = sols
            .iter()
            .map(|sol| self.remove_ancilla_from_solution(sol))
            .collect();
        Ok((value, sols))
    }

    /// One feasible minimizer of the objective, without ancillas.
    pub fn solve_bruteforce(&self) -> Result<Assignment> {
        let (_, mut sols) = self.bruteforce(false)?;
        Ok(sols.pop().unwrap_or_default())
    }

    /// Every feasible minimizer of the objective, without ancillas.
    pub fn solve_bruteforce_all(&self) -> Result<Vec<Assignment>> {
        Ok(self.bruteforce(true)?.1)
    }

    /// Mapped objective variables, then constraint variables the objective
    /// lost (an always satisfied inequality adds no penalty).
    fn enumerated_variables(&self) -> Vec<Label> {
        let mut vars = self.objective.index().labels().to_vec();
        for c in &self.constraints {
            for v in c.polynomial.variables() {
                if !vars.contains(&v) {
                    vars.push(v);
                }
            }
        }
        vars
    }

    // ===== Parameters =====

    pub fn subs(&self, name: &str, value: impl Into<Coefficient>) -> Self {
        let value = value.into();
        self.map_polynomials(|p| p.subs(name, value.clone()))
    }

    pub fn subs_many(&self, values: &BTreeMap<String, Coefficient>) -> Self {
        self.map_polynomials(|p| p.subs_many(values))
    }

    fn map_polynomials<F>(&self, f: F) -> Self
    where
        F: Fn(&Polynomial<D, Label>) -> Polynomial<D, Label>,
    {
        Self {
            objective: f(&self.objective),
            constraints: self
                .constraints
                .iter()
                .map(|c| Constraint {
                    kind: c.kind,
                    polynomial: f(&c.polynomial),
                })
                .collect(),
            next_ancilla: self.next_ancilla,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

fn diagnose(constraint: usize, kind: ConstraintKind, lower: Number, upper: Number) -> Option<Diagnostic> {
    Satisfiability::classify(kind, &lower, &upper).map(|satisfiability| Diagnostic {
        constraint,
        kind,
        satisfiability,
        lower,
        upper,
    })
}

impl<D: Domain> Deref for Model<D> {
    type Target = Polynomial<D, Label>;

    fn deref(&self) -> &Polynomial<D, Label> {
        &self.objective
    }
}

impl<D: Domain> DerefMut for Model<D> {
    fn deref_mut(&mut self) -> &mut Polynomial<D, Label> {
        &mut self.objective
    }
}

impl<D: Domain> fmt::Display for Model<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.objective)
    }
}

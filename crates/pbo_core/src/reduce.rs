//! Degree reduction by ancilla substitution (quadratization).
//!
//! While some term is longer than the target degree:
//! 1. count variable pairs over all over-degree terms
//! 2. take the most frequent pair `(x, y)` (ties: smallest pair)
//! 3. allocate the next free index `z`, replace `x*y` by `z` in every
//!    over-degree term containing both
//! 4. add `w * (x*y - 2*x*z - 2*y*z + 3*z)`
//!
//! The penalty is 0 when `z = x*y` and at least `w` otherwise. Rewriting the
//! terms moves the objective by at most the sum of their magnitudes, so
//! `w = 1 + sum |c|` keeps every minimizer of the reduced polynomial a
//! minimizer of the original with `z = x*y`.
//!
//! Reduction works on `Pubo<usize>`; labelled and spin polynomials reach it
//! through `to_pubo`/`to_hising`/`to_qubo`/`to_ising`.

use pbo_coeff::{Coefficient, Number};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ancilla::{AncillaOrigin, AncillaTable};
use crate::domain::{Binary, Domain, Spin};
use crate::error::{PbError, Result};
use crate::label::Variable;
use crate::polynomial::{HIsing, Polynomial, Pubo};
use crate::quadratic::{Ising, Qubo, QUADRATIC_DEGREE};
use crate::term::{Term, TermVars};
use crate::var_index::VariableIndex;

/// Penalty weight for each introduced ancilla.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ReductionWeight {
    /// `1 + sum |c|` over the rewritten terms; needs numeric coefficients
    #[default]
    Auto,
    /// Same weight for every ancilla; may be symbolic
    Fixed(Coefficient),
}

fn check_target(target: usize) -> Result<()> {
    if target < QUADRATIC_DEGREE {
        return Err(PbError::MalformedInput(format!(
            "target degree must be at least {}, got {}",
            QUADRATIC_DEGREE, target
        )));
    }
    Ok(())
}

impl Pubo<usize> {
    /// Reduce to at most `target` (no-op for `None`) with automatic weights.
    pub fn reduce(&self, target: Option<usize>) -> Result<Self> {
        self.reduce_with(target, &ReductionWeight::Auto)
    }

    pub fn reduce_with(&self, target: Option<usize>, weight: &ReductionWeight) -> Result<Self> {
        let Some(target) = target else {
            return Ok(self.clone());
        };
        check_target(target)?;

        let mut out = self.clone();
        let mut next = self
            .variables()
            .into_iter()
            .max()
            .map_or(0, |m| m + 1)
            .max(self.index().len());
        let start = next;

        while out.degree() > target {
            let (x, y) = most_frequent_pair(&out, target);
            let z = next;
            next += 1;

            let rewritten: Vec<(Term<usize>, Coefficient)> = out
                .terms()
                .filter(|(t, _)| t.degree() > target && t.contains(&x) && t.contains(&y))
                .map(|(t, c)| (t.clone(), c.clone()))
                .collect();

            let w = match weight {
                ReductionWeight::Fixed(w) => w.clone(),
                ReductionWeight::Auto => {
                    let mut sum = Number::one();
                    for (_, c) in &rewritten {
                        sum = sum + c.abs()?;
                    }
                    Coefficient::from(sum)
                }
            };

            for (t, c) in rewritten {
                out.set_canonical(t.clone(), Coefficient::zero());
                let vars: TermVars<usize> = t
                    .iter()
                    .copied()
                    .filter(|&v| v != x && v != y)
                    .chain(std::iter::once(z))
                    .collect();
                out.add_canonical(Term::binary(vars), c);
            }

            out.add_canonical(Term::binary([x, y]), w.clone());
            out.add_canonical(Term::binary([x, z]), &w * Coefficient::from(-2));
            out.add_canonical(Term::binary([y, z]), &w * Coefficient::from(-2));
            out.add_canonical(Term::binary([z]), &w * Coefficient::from(3));
            out.ancillas_mut().record(z, AncillaOrigin::Product(x, y));

            trace!(target: "reduce", x, y, z, weight = %w, "substituted pair");
        }

        debug!(
            target: "reduce",
            target_degree = target,
            ancillas = next - start,
            terms = out.num_terms(),
            "degree reduction finished"
        );
        Ok(out)
    }
}

/// Most frequent pair among terms longer than `target`; ties go to the
/// smallest pair.
fn most_frequent_pair(p: &Pubo<usize>, target: usize) -> (usize, usize) {
    let mut counts: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for (t, _) in p.terms().filter(|(t, _)| t.degree() > target) {
        let vars = t.vars();
        for i in 0..vars.len() {
            for j in (i + 1)..vars.len() {
                *counts.entry((vars[i], vars[j])).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then_with(|| pb.cmp(pa)))
        .map(|(pair, _)| pair)
        .unwrap_or((0, 1))
}

// =============================================================================
// Canonical forms
// =============================================================================

impl<D: Domain, V: Variable> Polynomial<D, V> {
    /// Relabel every variable by its index. Ancilla records follow.
    pub fn to_indexed(&self) -> Polynomial<D, usize> {
        let index = self.index();
        let terms = self
            .terms()
            .map(|(t, c)| {
                let vars = t.iter().filter_map(|v| index.index_of(v));
                (D::canonicalize(vars), c.clone())
            })
            .collect();
        let ancillas: AncillaTable<usize> = self.ancillas().relabel(|v| index.index_of(v));
        Polynomial::from_parts(terms, VariableIndex::identity(index.len()), ancillas)
    }

    /// Binary form with degree at most `degree` (`None` keeps the native degree).
    pub fn to_pubo(&self, degree: Option<usize>) -> Result<Pubo<usize>> {
        self.to_pubo_with(degree, &ReductionWeight::Auto)
    }

    pub fn to_pubo_with(&self, degree: Option<usize>, weight: &ReductionWeight) -> Result<Pubo<usize>> {
        if let Some(d) = degree {
            check_target(d)?;
        }
        self.to_indexed().to_domain::<Binary>().reduce_with(degree, weight)
    }

    /// Spin form with degree at most `degree`. Reduction happens in the binary
    /// domain; input already within the bound is only relabelled.
    pub fn to_hising(&self, degree: Option<usize>) -> Result<HIsing<usize>> {
        self.to_hising_with(degree, &ReductionWeight::Auto)
    }

    pub fn to_hising_with(&self, degree: Option<usize>, weight: &ReductionWeight) -> Result<HIsing<usize>> {
        if let Some(d) = degree {
            check_target(d)?;
        }
        let indexed = self.to_indexed();
        let within = degree.map_or(true, |d| indexed.degree() <= d);
        if within {
            return Ok(indexed.to_domain::<Spin>());
        }
        Ok(indexed.to_domain::<Binary>().reduce_with(degree, weight)?.to_domain::<Spin>())
    }

    pub fn to_qubo(&self) -> Result<Qubo> {
        Qubo::<usize>::try_from(self.to_pubo(Some(QUADRATIC_DEGREE))?)
    }

    pub fn to_ising(&self) -> Result<Ising> {
        Ising::<usize>::try_from(self.to_hising(Some(QUADRATIC_DEGREE))?)
    }
}

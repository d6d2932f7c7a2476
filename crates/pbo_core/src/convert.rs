//! Exact binary <-> spin conversion.
//!
//! Each variable of the source domain is replaced by the linear factor
//! `a + b*w` of the target domain (see [`Domain::substitution`]). A term of
//! arity k expands into the 2^k sub-terms of itself:
//!
//! ```text
//! c * prod(a + b*w_i) = sum over subsets S of  c * a^(k-|S|) * b^|S| * prod_{i in S} w_i
//! ```
//!
//! Sub-terms of a canonical term are already canonical in either domain, so
//! re-collection is a plain accumulate with zero pruning.

use pbo_coeff::Coefficient;
use std::collections::BTreeMap;
use tracing::trace;

use crate::domain::{Binary, Domain, Spin};
use crate::error::Result;
use crate::label::Variable;
use crate::polynomial::{HIsing, Polynomial, Pubo};
use crate::quadratic::{Ising, Qubo};
use crate::term::Term;

impl<D: Domain, V: Variable> Polynomial<D, V> {
    /// Same function expressed over domain `T`. Never mutates `self`.
    pub fn to_domain<T: Domain>(&self) -> Polynomial<T, V> {
        let mut terms: BTreeMap<Term<V>, Coefficient> = BTreeMap::new();
        if T::KIND == D::KIND {
            for (t, c) in self.terms() {
                terms.insert(t.clone(), c.clone());
            }
        } else {
            let (a, b) = D::substitution();
            for (t, c) in self.terms() {
                let k = t.degree() as u32;
                for (mask, sub) in t.subsets().enumerate() {
                    let picked = (mask as u64).count_ones();
                    let factor = a.pow(k - picked) * b.pow(picked);
                    let contribution = c * Coefficient::from(factor);
                    accumulate(&mut terms, sub, contribution);
                }
            }
            trace!(
                target: "convert",
                from = %D::KIND,
                to = %T::KIND,
                terms_in = self.num_terms(),
                terms_out = terms.len(),
                "domain substitution"
            );
        }
        Polynomial::from_parts(terms, self.index().clone(), self.ancillas().clone())
    }

    pub fn to_spin(&self) -> Polynomial<Spin, V> {
        self.to_domain::<Spin>()
    }

    pub fn to_binary(&self) -> Polynomial<Binary, V> {
        self.to_domain::<Binary>()
    }
}

fn accumulate<V: Variable>(
    terms: &mut BTreeMap<Term<V>, Coefficient>,
    term: Term<V>,
    c: Coefficient,
) {
    let sum = match terms.remove(&term) {
        Some(existing) => existing + c,
        None => c,
    };
    if !sum.is_zero() {
        terms.insert(term, sum);
    }
}

// =============================================================================
// Named converters
// =============================================================================

pub fn pubo_to_hising<V: Variable>(pubo: &Pubo<V>) -> HIsing<V> {
    pubo.to_spin()
}

pub fn hising_to_pubo<V: Variable>(hising: &HIsing<V>) -> Pubo<V> {
    hising.to_binary()
}

/// Degree is preserved by the substitution, so this cannot fail for a valid QUBO.
pub fn qubo_to_ising<V: Variable>(qubo: &Qubo<V>) -> Result<Ising<V>> {
    Ising::<V>::try_from(qubo.to_spin())
}

pub fn ising_to_qubo<V: Variable>(ising: &Ising<V>) -> Result<Qubo<V>> {
    Qubo::<V>::try_from(ising.to_binary())
}

//! Degree-2 forms: QUBO (binary) and Ising (spin).
//!
//! `Quadratic` wraps a polynomial whose terms are checked to have arity <= 2
//! at construction. Read access goes through `Deref`; mutation has to go
//! through `into_inner` and back through `try_from`, so the bound cannot be
//! broken behind the wrapper's back.

use std::ops::Deref;

use crate::domain::{Binary, Domain, Spin};
use crate::error::{PbError, Result};
use crate::label::Variable;
use crate::polynomial::Polynomial;

pub const QUADRATIC_DEGREE: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct Quadratic<D: Domain, V: Variable = usize>(Polynomial<D, V>);

pub type Qubo<V = usize> = Quadratic<Binary, V>;
pub type Ising<V = usize> = Quadratic<Spin, V>;

impl<D: Domain, V: Variable> Quadratic<D, V> {
    pub fn new() -> Self {
        Quadratic(Polynomial::new())
    }

    pub fn into_inner(self) -> Polynomial<D, V> {
        self.0
    }

    pub fn as_polynomial(&self) -> &Polynomial<D, V> {
        &self.0
    }
}

impl<D: Domain, V: Variable> Default for Quadratic<D, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Domain, V: Variable> TryFrom<Polynomial<D, V>> for Quadratic<D, V> {
    type Error = PbError;

    fn try_from(p: Polynomial<D, V>) -> Result<Self> {
        if let Some((term, _)) = p.terms().find(|(t, _)| t.degree() > QUADRATIC_DEGREE) {
            return Err(PbError::DegreeExceeded {
                term: term.to_string(),
                degree: term.degree(),
                limit: QUADRATIC_DEGREE,
            });
        }
        Ok(Quadratic(p))
    }
}

impl<D: Domain, V: Variable> Deref for Quadratic<D, V> {
    type Target = Polynomial<D, V>;

    fn deref(&self) -> &Polynomial<D, V> {
        &self.0
    }
}

impl<D: Domain, V: Variable> From<Quadratic<D, V>> for Polynomial<D, V> {
    fn from(q: Quadratic<D, V>) -> Self {
        q.0
    }
}

//! Variable domains.
//!
//! `Binary` variables take values in {0, 1}, `Spin` variables in {1, -1}.
//! The two are related by the exact linear identity
//!
//! ```text
//! x = (1 - s) / 2        s = 1 - 2x
//! ```
//!
//! so binary 0 corresponds to spin 1 and binary 1 to spin -1. Domains are
//! zero-sized marker types; polynomials carry one as a type parameter.

use pbo_coeff::Number;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::label::Variable;
use crate::term::Term;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    Binary,
    Spin,
}

impl DomainKind {
    /// Domain values indexed by enumeration bit: `values()[bit]`.
    pub fn values(self) -> [i8; 2] {
        match self {
            DomainKind::Binary => [0, 1],
            DomainKind::Spin => [1, -1],
        }
    }

    pub fn contains(self, value: i8) -> bool {
        self.values().contains(&value)
    }

    /// Bit position of `value`, if it belongs to the domain.
    pub fn bit_of(self, value: i8) -> Option<usize> {
        self.values().iter().position(|&v| v == value)
    }

    /// Map `value` from this domain to `target` through the shared bit.
    pub fn convert_value(self, value: i8, target: DomainKind) -> Option<i8> {
        self.bit_of(value).map(|bit| target.values()[bit])
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainKind::Binary => write!(f, "binary"),
            DomainKind::Spin => write!(f, "spin"),
        }
    }
}

/// Type-level domain tag.
pub trait Domain: Clone + Copy + fmt::Debug + Default + PartialEq + Eq + 'static {
    const KIND: DomainKind;

    /// Collapse a raw product into a canonical term.
    fn canonicalize<V: Variable, I: IntoIterator<Item = V>>(vars: I) -> Term<V>;

    /// Range of `c * t` as the term's variables sweep the domain.
    fn term_range(c: &Number) -> (Number, Number);

    /// Coefficients `(a, b)` of the linear substitution `v = a + b*w` that
    /// expresses a variable of this domain through one of the other domain.
    fn substitution() -> (Number, Number);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Binary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Spin;

impl Domain for Binary {
    const KIND: DomainKind = DomainKind::Binary;

    fn canonicalize<V: Variable, I: IntoIterator<Item = V>>(vars: I) -> Term<V> {
        Term::binary(vars)
    }

    fn term_range(c: &Number) -> (Number, Number) {
        if c.is_negative() {
            (c.clone(), Number::zero())
        } else {
            (Number::zero(), c.clone())
        }
    }

    // x = 1/2 - s/2
    fn substitution() -> (Number, Number) {
        (Number::ratio(1, 2), Number::ratio(-1, 2))
    }
}

impl Domain for Spin {
    const KIND: DomainKind = DomainKind::Spin;

    fn canonicalize<V: Variable, I: IntoIterator<Item = V>>(vars: I) -> Term<V> {
        Term::spin(vars)
    }

    fn term_range(c: &Number) -> (Number, Number) {
        let m = c.abs();
        (-&m, m)
    }

    // s = 1 - 2x
    fn substitution() -> (Number, Number) {
        (Number::one(), Number::from(-2))
    }
}

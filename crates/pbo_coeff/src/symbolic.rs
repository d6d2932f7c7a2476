//! Sparse multivariate polynomial over named parameters.
//!
//! Representation: map from parameter monomial to `Number`.
//! Monomial = sorted list of (parameter, exponent) with exponent >= 1.
//! BTreeMap keeps terms ordered and makes normalization a single pass.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::number::Number;

// =============================================================================
// Monomials
// =============================================================================

/// Product of parameters, e.g. `a^2*b`. The empty monomial is the constant 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamMonomial(Vec<(String, u32)>);

impl ParamMonomial {
    pub fn one() -> Self {
        Self(Vec::new())
    }

    pub fn param(name: &str) -> Self {
        Self(vec![(name.to_string(), 1)])
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(p, e)| (p.as_str(), *e))
    }

    /// Total degree (sum of exponents)
    pub fn total_degree(&self) -> u32 {
        self.0.iter().map(|(_, e)| e).sum()
    }

    /// Multiply monomials: exponents of shared parameters add up.
    pub fn mul(&self, other: &Self) -> Self {
        let mut merged: BTreeMap<&str, u32> = BTreeMap::new();
        for (p, e) in self.iter().chain(other.iter()) {
            *merged.entry(p).or_insert(0) += e;
        }
        Self(merged.into_iter().map(|(p, e)| (p.to_string(), e)).collect())
    }
}

// =============================================================================
// Symbolic
// =============================================================================

/// Polynomial in free parameters with numeric coefficients.
/// Invariant: no stored coefficient is zero.
#[derive(Clone, Debug, Default)]
pub struct Symbolic {
    terms: BTreeMap<ParamMonomial, Number>,
}

impl Symbolic {
    /// Create zero polynomial
    pub fn zero() -> Self {
        Self::default()
    }

    /// Single parameter with coefficient 1
    pub fn param(name: &str) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(ParamMonomial::param(name), Number::one());
        Self { terms }
    }

    pub fn constant(c: Number) -> Self {
        let mut s = Self::zero();
        s.accumulate(ParamMonomial::one(), c);
        s
    }

    /// Build from (monomial, coefficient) pairs, combining like terms.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (ParamMonomial, Number)>,
    {
        let mut s = Self::zero();
        for (m, c) in terms {
            s.accumulate(m, c);
        }
        s
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when no parameter occurs (possibly zero)
    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(ParamMonomial::is_one)
    }

    /// Coefficient of the empty monomial
    pub fn constant_part(&self) -> Number {
        self.terms
            .get(&ParamMonomial::one())
            .cloned()
            .unwrap_or_else(Number::zero)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&ParamMonomial, &Number)> {
        self.terms.iter()
    }

    /// Names of all parameters that occur
    pub fn params(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|m| m.iter().map(|(p, _)| p.to_string()))
            .collect()
    }

    /// Add `c * m`, dropping the entry if it cancels.
    fn accumulate(&mut self, m: ParamMonomial, c: Number) {
        if c.is_zero() {
            return;
        }
        match self.terms.get_mut(&m) {
            Some(existing) => {
                let sum = &*existing + &c;
                if sum.is_zero() {
                    self.terms.remove(&m);
                } else {
                    *existing = sum;
                }
            }
            None => {
                self.terms.insert(m, c);
            }
        }
    }

    /// Apply `f` to every coefficient, pruning zeros.
    pub fn map_coefficients<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Number) -> Number,
    {
        Self::from_terms(self.terms.iter().map(|(m, c)| (m.clone(), f(c))))
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Symbolic {
    pub fn neg(&self) -> Self {
        self.map_coefficients(|c| -c)
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.accumulate(m.clone(), c.clone());
        }
        out
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn scale(&self, k: &Number) -> Self {
        if k.is_zero() {
            return Self::zero();
        }
        self.map_coefficients(|c| c * k)
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out = Self::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                out.accumulate(m1.mul(m2), c1 * c2);
            }
        }
        out
    }

    /// Binary exponentiation
    pub fn pow(&self, exp: u32) -> Self {
        if exp == 0 {
            return Self::constant(Number::one());
        }
        if exp == 1 {
            return self.clone();
        }
        let mut result = Self::constant(Number::one());
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base);
            }
        }
        result
    }
}

impl PartialEq for Symbolic {
    fn eq(&self, other: &Self) -> bool {
        self.terms.len() == other.terms.len()
            && self
                .terms
                .iter()
                .zip(other.terms.iter())
                .all(|((m1, c1), (m2, c2))| m1 == m2 && c1 == c2)
    }
}

impl fmt::Display for ParamMonomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(p, e)| if e == 1 { p.to_string() } else { format!("{}^{}", p, e) })
            .collect();
        write!(f, "{}", parts.join("*"))
    }
}

impl fmt::Display for Symbolic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        // Highest degree first reads more naturally
        let mut ordered: Vec<_> = self.terms.iter().collect();
        ordered.sort_by(|(a, _), (b, _)| b.total_degree().cmp(&a.total_degree()).then(a.cmp(b)));
        for (i, (m, c)) in ordered.into_iter().enumerate() {
            let negative = c.is_negative();
            let magnitude = c.abs();
            if i == 0 {
                if negative {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", if negative { "-" } else { "+" })?;
            }
            if m.is_one() {
                write!(f, "{}", magnitude)?;
            } else if magnitude.is_one() {
                write!(f, "{}", m)?;
            } else {
                write!(f, "{}*{}", magnitude, m)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Symbolic {
        Symbolic::param("a")
    }

    fn b() -> Symbolic {
        Symbolic::param("b")
    }

    #[test]
    fn test_like_terms_cancel() {
        let p = a().add(&b()).sub(&a());
        assert_eq!(p, b());
        assert_eq!(p.num_terms(), 1);
    }

    #[test]
    fn test_mul_merges_exponents() {
        let p = a().mul(&a()).mul(&b());
        let (m, c) = p.terms().next().unwrap();
        assert_eq!(m.total_degree(), 3);
        assert!(c.is_one());
        assert_eq!(p.to_string(), "a^2*b");
    }

    #[test]
    fn test_pow_matches_repeated_mul() {
        let p = a().add(&Symbolic::constant(Number::from(-2)));
        assert_eq!(p.pow(3), p.mul(&p).mul(&p));
        assert_eq!(p.pow(0), Symbolic::constant(Number::one()));
    }

    #[test]
    fn test_binomial_square() {
        // (a - b)^2 = a^2 - 2ab + b^2
        let p = a().sub(&b()).pow(2);
        assert_eq!(p.num_terms(), 3);
        assert!(p.constant_part().is_zero());
        assert_eq!(p.params().len(), 2);
    }

    #[test]
    fn test_constant_detection() {
        let c = a().sub(&a()).add(&Symbolic::constant(Number::from(4)));
        assert!(c.is_constant());
        assert_eq!(c.constant_part(), Number::from(4));
    }

    #[test]
    fn test_display() {
        let p = a().scale(&Number::from(-2)).add(&Symbolic::constant(Number::from(3)));
        assert_eq!(p.to_string(), "-2*a + 3");
    }
}

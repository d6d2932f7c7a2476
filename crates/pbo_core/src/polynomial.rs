//! Sparse pseudo-boolean polynomial over a binary or spin domain.
//!
//! Representation: `BTreeMap<Term, Coefficient>` with the invariant that no
//! stored coefficient is zero. Every write goes through `add_canonical` or
//! `set_canonical`, which prune cancelled entries.
//!
//! The domain is a type parameter, so multiplication re-canonicalizes terms
//! with the right rule (`x*x = x` or `s*s = 1`) and mixing domains is a type
//! error rather than a runtime surprise.

use pbo_coeff::{Coefficient, Number};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::ancilla::AncillaTable;
use crate::domain::{Binary, Domain, DomainKind, Spin};
use crate::error::{PbError, Result};
use crate::label::{Label, Variable};
use crate::term::Term;
use crate::var_index::VariableIndex;

/// Values assigned to variables: {0, 1} or {1, -1} depending on the domain.
pub type Assignment<V = Label> = BTreeMap<V, i8>;

#[derive(Clone, Debug)]
pub struct Polynomial<D: Domain, V: Variable = Label> {
    terms: BTreeMap<Term<V>, Coefficient>,
    index: VariableIndex<V>,
    ancillas: AncillaTable<V>,
    _domain: PhantomData<D>,
}

/// Arbitrary-degree binary polynomial
pub type Pubo<V = Label> = Polynomial<Binary, V>;
/// Arbitrary-degree spin polynomial
pub type HIsing<V = Label> = Polynomial<Spin, V>;

impl<D: Domain, V: Variable> Default for Polynomial<D, V> {
    fn default() -> Self {
        Self {
            terms: BTreeMap::new(),
            index: VariableIndex::new(),
            ancillas: AncillaTable::new(),
            _domain: PhantomData,
        }
    }
}

// =============================================================================
// Construction and access
// =============================================================================

impl<D: Domain, V: Variable> Polynomial<D, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(raw term, coefficient)` pairs. Repeated or
    /// non-canonical keys accumulate.
    pub fn from_terms<I, T, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: IntoIterator,
        T::Item: Into<V>,
        C: Into<Coefficient>,
    {
        let mut p = Self::new();
        for (vars, c) in entries {
            p.add_term(vars, c);
        }
        p
    }

    /// The polynomial `v`
    pub fn var(label: impl Into<V>) -> Self {
        let mut p = Self::new();
        p.add_term([label.into()], 1);
        p
    }

    pub fn constant(c: impl Into<Coefficient>) -> Self {
        let mut p = Self::new();
        p.add_constant(c.into());
        p
    }

    /// Canonical term for a raw product in this domain.
    pub fn term<T>(vars: T) -> Term<V>
    where
        T: IntoIterator,
        T::Item: Into<V>,
    {
        D::canonicalize(vars.into_iter().map(Into::into))
    }

    /// Coefficient of a canonical term; zero when absent.
    pub fn get(&self, term: &Term<V>) -> Coefficient {
        self.terms.get(term).cloned().unwrap_or_else(Coefficient::zero)
    }

    /// Coefficient of a raw product, canonicalized first. Never inserts.
    pub fn coefficient<T>(&self, vars: T) -> Coefficient
    where
        T: IntoIterator,
        T::Item: Into<V>,
    {
        self.get(&Self::term(vars))
    }

    /// Overwrite the coefficient of a raw product.
    pub fn set<T, C>(&mut self, vars: T, c: C)
    where
        T: IntoIterator,
        T::Item: Into<V>,
        C: Into<Coefficient>,
    {
        let term = Self::term(vars);
        self.set_canonical(term, c.into());
    }

    /// Add `c` to the coefficient of a raw product.
    pub fn add_term<T, C>(&mut self, vars: T, c: C)
    where
        T: IntoIterator,
        T::Item: Into<V>,
        C: Into<Coefficient>,
    {
        let term = Self::term(vars);
        self.add_canonical(term, c.into());
    }

    pub fn add_constant(&mut self, c: Coefficient) {
        self.add_canonical(Term::empty(), c);
    }

    /// Dictionary-style update: every entry of `other` overwrites, in order.
    pub fn update(&mut self, other: &Self) {
        self.index.absorb(&other.index);
        self.ancillas.merge(&other.ancillas);
        for (t, c) in &other.terms {
            self.set_canonical(t.clone(), c.clone());
        }
    }

    /// `update` from raw entries, applied sequentially.
    pub fn update_entries<I, T, C>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (T, C)>,
        T: IntoIterator,
        T::Item: Into<V>,
        C: Into<Coefficient>,
    {
        for (vars, c) in entries {
            self.set(vars, c);
        }
    }

    pub(crate) fn add_canonical(&mut self, term: Term<V>, c: Coefficient) {
        if c.is_zero() {
            return;
        }
        for v in term.iter() {
            self.index.get_or_insert(v);
        }
        match self.terms.entry(term) {
            Entry::Occupied(mut e) => {
                let sum = e.get() + &c;
                if sum.is_zero() {
                    e.remove();
                } else {
                    *e.get_mut() = sum;
                }
            }
            Entry::Vacant(e) => {
                e.insert(c);
            }
        }
    }

    pub(crate) fn set_canonical(&mut self, term: Term<V>, c: Coefficient) {
        if c.is_zero() {
            self.terms.remove(&term);
            return;
        }
        for v in term.iter() {
            self.index.get_or_insert(v);
        }
        self.terms.insert(term, c);
    }

    /// Same variables, index and ancillas; no terms.
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            terms: BTreeMap::new(),
            index: self.index.clone(),
            ancillas: self.ancillas.clone(),
            _domain: PhantomData,
        }
    }

    pub(crate) fn from_parts(
        terms: BTreeMap<Term<V>, Coefficient>,
        index: VariableIndex<V>,
        ancillas: AncillaTable<V>,
    ) -> Self {
        let mut p = Self {
            terms: BTreeMap::new(),
            index,
            ancillas,
            _domain: PhantomData,
        };
        for (t, c) in terms {
            p.add_canonical(t, c);
        }
        p
    }

    pub(crate) fn ancillas_mut(&mut self) -> &mut AncillaTable<V> {
        &mut self.ancillas
    }
}

// =============================================================================
// Properties
// =============================================================================

impl<D: Domain, V: Variable> Polynomial<D, V> {
    pub fn kind(&self) -> DomainKind {
        D::KIND
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Term<V>, &Coefficient)> {
        self.terms.iter()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest term arity; 0 for constants and the empty polynomial.
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Term::degree).max().unwrap_or(0)
    }

    pub fn offset(&self) -> Coefficient {
        self.get(&Term::empty())
    }

    /// Variables occurring in at least one term
    pub fn variables(&self) -> BTreeSet<V> {
        self.terms.keys().flat_map(|t| t.iter().cloned()).collect()
    }

    /// Number of mapped variables
    pub fn num_binary_variables(&self) -> usize {
        self.index.len()
    }

    pub fn max_index(&self) -> Option<usize> {
        self.index.len().checked_sub(1)
    }

    pub fn index(&self) -> &VariableIndex<V> {
        &self.index
    }

    pub fn mapping(&self) -> BTreeMap<V, usize> {
        self.index.mapping()
    }

    pub fn reverse_mapping(&self) -> BTreeMap<usize, V> {
        self.index.reverse_mapping()
    }

    pub fn ancillas(&self) -> &AncillaTable<V> {
        &self.ancillas
    }

    /// Replace the label -> index assignment. The new mapping must be a
    /// bijection between the currently mapped labels and `0..n`.
    pub fn set_mapping<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (V, usize)>,
    {
        let index = VariableIndex::from_bijection(pairs)?;
        let current: BTreeSet<&V> = self.index.labels().iter().collect();
        let proposed: BTreeSet<&V> = index.labels().iter().collect();
        if current != proposed {
            return Err(PbError::MalformedInput(
                "mapping must cover exactly the variables of the polynomial".to_string(),
            ));
        }
        self.index = index;
        Ok(())
    }

    /// Numeric coefficients, or an error naming the unresolved parameters.
    pub fn numeric_terms(&self) -> Result<Vec<(&Term<V>, Number)>> {
        self.terms
            .iter()
            .map(|(t, c)| Ok((t, c.to_number()?)))
            .collect()
    }

    /// Lower and upper bound of the polynomial over the whole hypercube.
    pub fn bounds(&self) -> Result<(Number, Number)> {
        let mut lo = Number::zero();
        let mut hi = Number::zero();
        for (t, c) in self.numeric_terms()? {
            if t.is_empty() {
                lo = lo + &c;
                hi = hi + &c;
            } else {
                let (l, h) = D::term_range(&c);
                lo = lo + l;
                hi = hi + h;
            }
        }
        Ok((lo, hi))
    }
}

// =============================================================================
// Evaluation and coefficient transforms
// =============================================================================

impl<D: Domain, V: Variable> Polynomial<D, V> {
    /// Evaluate at a full assignment.
    pub fn value(&self, assignment: &Assignment<V>) -> Result<Coefficient> {
        let mut total = Coefficient::zero();
        for (term, c) in &self.terms {
            let mut product: i8 = 1;
            for v in term.iter() {
                let x = *assignment.get(v).ok_or_else(|| {
                    PbError::MalformedInput(format!("assignment has no value for {}", v))
                })?;
                if !D::KIND.contains(x) {
                    return Err(PbError::MalformedInput(format!(
                        "value {} of {} is outside the {} domain",
                        x, v, D::KIND
                    )));
                }
                product *= x;
            }
            match product {
                1 => total = total + c,
                -1 => total = total - c,
                _ => {}
            }
        }
        Ok(total)
    }

    /// `value` for numeric polynomials.
    pub fn value_number(&self, assignment: &Assignment<V>) -> Result<Number> {
        Ok(self.value(assignment)?.to_number()?)
    }

    /// A plain polynomial places no restriction on solutions.
    pub fn is_solution_valid(&self, _assignment: &Assignment<V>) -> bool {
        true
    }

    /// Round every coefficient to `digits` decimals.
    pub fn round(&self, digits: u32) -> Self {
        self.map_coefficients(|c| c.round_to(digits))
    }

    /// Divide through by the largest coefficient magnitude.
    pub fn normalize(&mut self) -> Result<()> {
        let numeric = self.numeric_terms()?;
        let Some(max) = Number::max_abs(numeric.iter().map(|(_, c)| c)) else {
            return Ok(());
        };
        self.div_scalar_assign(max)
    }

    pub fn subs(&self, name: &str, value: impl Into<Coefficient>) -> Self {
        let value = value.into();
        self.map_coefficients(|c| c.subs(name, &value))
    }

    pub fn subs_many(&self, values: &BTreeMap<String, Coefficient>) -> Self {
        self.map_coefficients(|c| c.subs_many(values))
    }

    /// Names of all free parameters in the coefficients
    pub fn params(&self) -> BTreeSet<String> {
        self.terms.values().flat_map(Coefficient::params).collect()
    }

    pub(crate) fn map_coefficients<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Coefficient) -> Coefficient,
    {
        let mut out = self.empty_like();
        for (t, c) in &self.terms {
            out.add_canonical(t.clone(), f(c));
        }
        out
    }

    /// Fallible coefficient map; `self` is untouched on error.
    fn try_map_coefficients_assign<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&Coefficient) -> Result<Coefficient>,
    {
        let mut terms = BTreeMap::new();
        for (t, c) in &self.terms {
            let r = f(c)?;
            if !r.is_zero() {
                terms.insert(t.clone(), r);
            }
        }
        self.terms = terms;
        Ok(())
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl<D: Domain, V: Variable> Polynomial<D, V> {
    fn add_poly_assign(&mut self, other: &Self, negate: bool) {
        self.index.absorb(&other.index);
        self.ancillas.merge(&other.ancillas);
        for (t, c) in &other.terms {
            let c = if negate { -c } else { c.clone() };
            self.add_canonical(t.clone(), c);
        }
    }

    fn mul_poly(&self, other: &Self) -> Self {
        let mut out = self.empty_like();
        out.index.absorb(&other.index);
        out.ancillas.merge(&other.ancillas);
        for (t1, c1) in &self.terms {
            for (t2, c2) in &other.terms {
                let term = D::canonicalize(t1.concat(t2));
                out.add_canonical(term, c1 * c2);
            }
        }
        out
    }

    pub fn scale(&self, k: &Coefficient) -> Self {
        self.map_coefficients(|c| c * k)
    }

    /// Binary exponentiation. `pow(0)` is the constant 1.
    pub fn pow(&self, exp: u32) -> Self {
        let mut result = self.empty_like();
        result.add_constant(Coefficient::one());
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul_poly(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul_poly(&base);
            }
        }
        result
    }

    pub fn pow_assign(&mut self, exp: u32) {
        *self = self.pow(exp);
    }

    /// Divide every coefficient by a nonzero numeric scalar.
    pub fn div_scalar(&self, divisor: impl Into<Coefficient>) -> Result<Self> {
        let mut out = self.clone();
        out.div_scalar_assign(divisor)?;
        Ok(out)
    }

    pub fn div_scalar_assign(&mut self, divisor: impl Into<Coefficient>) -> Result<()> {
        let divisor = divisor.into();
        if divisor.is_zero() {
            return Err(pbo_coeff::CoeffError::DivisionByZero.into());
        }
        self.try_map_coefficients_assign(|c| Ok(c.checked_div(&divisor)?))
    }

    /// Floor-divide every coefficient; coefficients must be numeric.
    pub fn floor_div_scalar(&self, divisor: impl Into<Coefficient>) -> Result<Self> {
        let mut out = self.clone();
        out.floor_div_scalar_assign(divisor)?;
        Ok(out)
    }

    pub fn floor_div_scalar_assign(&mut self, divisor: impl Into<Coefficient>) -> Result<()> {
        let divisor = divisor.into();
        if divisor.is_zero() {
            return Err(pbo_coeff::CoeffError::DivisionByZero.into());
        }
        self.try_map_coefficients_assign(|c| Ok(c.floor_div(&divisor)?))
    }
}

// =============================================================================
// Operators
// =============================================================================

impl<D: Domain, V: Variable> AddAssign<&Polynomial<D, V>> for Polynomial<D, V> {
    fn add_assign(&mut self, rhs: &Polynomial<D, V>) {
        self.add_poly_assign(rhs, false);
    }
}

impl<D: Domain, V: Variable> SubAssign<&Polynomial<D, V>> for Polynomial<D, V> {
    fn sub_assign(&mut self, rhs: &Polynomial<D, V>) {
        self.add_poly_assign(rhs, true);
    }
}

impl<D: Domain, V: Variable> MulAssign<&Polynomial<D, V>> for Polynomial<D, V> {
    fn mul_assign(&mut self, rhs: &Polynomial<D, V>) {
        *self = self.mul_poly(rhs);
    }
}

macro_rules! impl_poly_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign:ident) => {
        impl<D: Domain, V: Variable> $assign_trait<Polynomial<D, V>> for Polynomial<D, V> {
            fn $assign(&mut self, rhs: Polynomial<D, V>) {
                $assign_trait::$assign(self, &rhs);
            }
        }

        impl<D: Domain, V: Variable> $trait<&Polynomial<D, V>> for &Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn $method(self, rhs: &Polynomial<D, V>) -> Polynomial<D, V> {
                let mut out = self.clone();
                $assign_trait::$assign(&mut out, rhs);
                out
            }
        }

        impl<D: Domain, V: Variable> $trait<Polynomial<D, V>> for Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn $method(mut self, rhs: Polynomial<D, V>) -> Polynomial<D, V> {
                $assign_trait::$assign(&mut self, &rhs);
                self
            }
        }

        impl<D: Domain, V: Variable> $trait<&Polynomial<D, V>> for Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn $method(mut self, rhs: &Polynomial<D, V>) -> Polynomial<D, V> {
                $assign_trait::$assign(&mut self, rhs);
                self
            }
        }

        impl<D: Domain, V: Variable> $trait<Polynomial<D, V>> for &Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn $method(self, rhs: Polynomial<D, V>) -> Polynomial<D, V> {
                let mut out = self.clone();
                $assign_trait::$assign(&mut out, &rhs);
                out
            }
        }
    };
}

impl_poly_binop!(Add, add, AddAssign, add_assign);
impl_poly_binop!(Sub, sub, SubAssign, sub_assign);
impl_poly_binop!(Mul, mul, MulAssign, mul_assign);

impl<D: Domain, V: Variable> Neg for &Polynomial<D, V> {
    type Output = Polynomial<D, V>;
    fn neg(self) -> Polynomial<D, V> {
        self.map_coefficients(|c| -c)
    }
}

impl<D: Domain, V: Variable> Neg for Polynomial<D, V> {
    type Output = Polynomial<D, V>;
    fn neg(self) -> Polynomial<D, V> {
        -&self
    }
}

// Scalars act on the constant term (+, -) or on every coefficient (*).
macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {$(
        impl<D: Domain, V: Variable> AddAssign<$t> for Polynomial<D, V> {
            fn add_assign(&mut self, rhs: $t) {
                self.add_constant(Coefficient::from(rhs));
            }
        }

        impl<D: Domain, V: Variable> SubAssign<$t> for Polynomial<D, V> {
            fn sub_assign(&mut self, rhs: $t) {
                self.add_constant(-Coefficient::from(rhs));
            }
        }

        impl<D: Domain, V: Variable> MulAssign<$t> for Polynomial<D, V> {
            fn mul_assign(&mut self, rhs: $t) {
                *self = self.scale(&Coefficient::from(rhs));
            }
        }

        impl<D: Domain, V: Variable> Add<$t> for Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn add(mut self, rhs: $t) -> Polynomial<D, V> {
                self += rhs;
                self
            }
        }

        impl<D: Domain, V: Variable> Add<$t> for &Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn add(self, rhs: $t) -> Polynomial<D, V> {
                self.clone() + rhs
            }
        }

        impl<D: Domain, V: Variable> Sub<$t> for Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn sub(mut self, rhs: $t) -> Polynomial<D, V> {
                self -= rhs;
                self
            }
        }

        impl<D: Domain, V: Variable> Sub<$t> for &Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn sub(self, rhs: $t) -> Polynomial<D, V> {
                self.clone() - rhs
            }
        }

        impl<D: Domain, V: Variable> Mul<$t> for Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn mul(self, rhs: $t) -> Polynomial<D, V> {
                self.scale(&Coefficient::from(rhs))
            }
        }

        impl<D: Domain, V: Variable> Mul<$t> for &Polynomial<D, V> {
            type Output = Polynomial<D, V>;
            fn mul(self, rhs: $t) -> Polynomial<D, V> {
                self.scale(&Coefficient::from(rhs))
            }
        }

        impl<D: Domain, V: Variable> Add<Polynomial<D, V>> for $t {
            type Output = Polynomial<D, V>;
            fn add(self, rhs: Polynomial<D, V>) -> Polynomial<D, V> {
                rhs + self
            }
        }

        impl<D: Domain, V: Variable> Sub<Polynomial<D, V>> for $t {
            type Output = Polynomial<D, V>;
            fn sub(self, rhs: Polynomial<D, V>) -> Polynomial<D, V> {
                -rhs + self
            }
        }

        impl<D: Domain, V: Variable> Mul<Polynomial<D, V>> for $t {
            type Output = Polynomial<D, V>;
            fn mul(self, rhs: Polynomial<D, V>) -> Polynomial<D, V> {
                rhs * self
            }
        }
    )*};
}

impl_scalar_ops!(Coefficient, Number, i32, i64, f64);

// =============================================================================
// Comparison and display
// =============================================================================

/// Equality compares terms only; index order and ancilla records are ignored.
impl<D: Domain, V: Variable> PartialEq for Polynomial<D, V> {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl<D: Domain, V: Variable> fmt::Display for Polynomial<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (t, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", t, c)?;
        }
        write!(f, "}}")
    }
}

//! Polynomial coefficients: a plain number or a polynomial in free parameters.
//!
//! `Coefficient` is closed under `+ - *` and integer powers. Division is only
//! defined by a numeric divisor. A symbolic value with no parameters left is
//! always collapsed back to `Num`, so `is_zero`/equality are reliable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_rational::BigRational;

use crate::error::CoeffError;
use crate::number::Number;
use crate::symbolic::Symbolic;

/// Coefficient of a polynomial term.
#[derive(Clone, Debug)]
pub enum Coefficient {
    Num(Number),
    Sym(Symbolic),
}

impl Coefficient {
    pub fn zero() -> Self {
        Coefficient::Num(Number::zero())
    }

    pub fn one() -> Self {
        Coefficient::Num(Number::one())
    }

    /// Free parameter `name` with unit coefficient.
    pub fn param(name: &str) -> Self {
        Coefficient::Sym(Symbolic::param(name))
    }

    /// Wrap a symbolic value, collapsing it when no parameter remains.
    pub fn from_symbolic(s: Symbolic) -> Self {
        if s.is_constant() {
            Coefficient::Num(s.constant_part())
        } else {
            Coefficient::Sym(s)
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Num(n) => n.is_zero(),
            Coefficient::Sym(s) => s.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Coefficient::Num(n) if n.is_one())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Coefficient::Num(_))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Coefficient::Num(n) => Some(n),
            Coefficient::Sym(_) => None,
        }
    }

    /// Numeric value, or `Unresolved` listing the parameters still present.
    pub fn to_number(&self) -> Result<Number, CoeffError> {
        match self {
            Coefficient::Num(n) => Ok(n.clone()),
            Coefficient::Sym(s) => Err(CoeffError::Unresolved(s.params().into_iter().collect())),
        }
    }

    /// Parameters this coefficient depends on
    pub fn params(&self) -> BTreeSet<String> {
        match self {
            Coefficient::Num(_) => BTreeSet::new(),
            Coefficient::Sym(s) => s.params(),
        }
    }

    pub fn abs(&self) -> Result<Number, CoeffError> {
        Ok(self.to_number()?.abs())
    }

    fn to_symbolic(&self) -> Symbolic {
        match self {
            Coefficient::Num(n) => Symbolic::constant(n.clone()),
            Coefficient::Sym(s) => s.clone(),
        }
    }

    pub fn pow(&self, exp: u32) -> Self {
        match self {
            Coefficient::Num(n) => Coefficient::Num(n.pow(exp)),
            Coefficient::Sym(s) => Coefficient::from_symbolic(s.pow(exp)),
        }
    }

    /// `self / rhs`; the divisor must be a nonzero number.
    pub fn checked_div(&self, rhs: &Coefficient) -> Result<Self, CoeffError> {
        let divisor = match rhs {
            Coefficient::Num(n) => n,
            Coefficient::Sym(s) => return Err(CoeffError::SymbolicDivisor(s.to_string())),
        };
        match self {
            Coefficient::Num(n) => Ok(Coefficient::Num(n.checked_div(divisor)?)),
            Coefficient::Sym(s) => {
                let inv = divisor.recip()?;
                Ok(Coefficient::from_symbolic(s.scale(&inv)))
            }
        }
    }

    /// Floor of `self / rhs`. Both sides must be numeric.
    pub fn floor_div(&self, rhs: &Coefficient) -> Result<Self, CoeffError> {
        let divisor = match rhs {
            Coefficient::Num(n) => n,
            Coefficient::Sym(s) => return Err(CoeffError::SymbolicDivisor(s.to_string())),
        };
        Ok(Coefficient::Num(self.to_number()?.floor_div(divisor)?))
    }

    /// Round numeric parts to `digits` decimals.
    pub fn round_to(&self, digits: u32) -> Self {
        match self {
            Coefficient::Num(n) => Coefficient::Num(n.round_to(digits)),
            Coefficient::Sym(s) => Coefficient::from_symbolic(s.map_coefficients(|c| c.round_to(digits))),
        }
    }

    /// Replace parameter `name` by `value`.
    pub fn subs(&self, name: &str, value: &Coefficient) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.to_string(), value.clone());
        self.subs_many(&map)
    }

    /// Replace every parameter found in `values`; others stay free.
    pub fn subs_many(&self, values: &BTreeMap<String, Coefficient>) -> Self {
        let s = match self {
            Coefficient::Num(_) => return self.clone(),
            Coefficient::Sym(s) => s,
        };
        let mut out = Symbolic::zero();
        for (monomial, c) in s.terms() {
            let mut product = Symbolic::constant(c.clone());
            for (p, e) in monomial.iter() {
                let factor = match values.get(p) {
                    Some(v) => v.to_symbolic(),
                    None => Symbolic::param(p),
                };
                product = product.mul(&factor.pow(e));
            }
            out = out.add(&product);
        }
        Coefficient::from_symbolic(out)
    }
}

// =============================================================================
// Operators
// =============================================================================

fn add_coeff(a: &Coefficient, b: &Coefficient) -> Coefficient {
    match (a, b) {
        (Coefficient::Num(x), Coefficient::Num(y)) => Coefficient::Num(x + y),
        _ => Coefficient::from_symbolic(a.to_symbolic().add(&b.to_symbolic())),
    }
}

fn sub_coeff(a: &Coefficient, b: &Coefficient) -> Coefficient {
    match (a, b) {
        (Coefficient::Num(x), Coefficient::Num(y)) => Coefficient::Num(x - y),
        _ => Coefficient::from_symbolic(a.to_symbolic().sub(&b.to_symbolic())),
    }
}

fn mul_coeff(a: &Coefficient, b: &Coefficient) -> Coefficient {
    match (a, b) {
        (Coefficient::Num(x), Coefficient::Num(y)) => Coefficient::Num(x * y),
        (Coefficient::Sym(s), Coefficient::Num(k)) | (Coefficient::Num(k), Coefficient::Sym(s)) => {
            Coefficient::from_symbolic(s.scale(k))
        }
        (Coefficient::Sym(s), Coefficient::Sym(t)) => Coefficient::from_symbolic(s.mul(t)),
    }
}

macro_rules! impl_coeff_binop {
    ($trait:ident, $method:ident, $func:ident) => {
        impl $trait<&Coefficient> for &Coefficient {
            type Output = Coefficient;
            fn $method(self, rhs: &Coefficient) -> Coefficient {
                $func(self, rhs)
            }
        }

        impl $trait<Coefficient> for Coefficient {
            type Output = Coefficient;
            fn $method(self, rhs: Coefficient) -> Coefficient {
                $func(&self, &rhs)
            }
        }

        impl $trait<&Coefficient> for Coefficient {
            type Output = Coefficient;
            fn $method(self, rhs: &Coefficient) -> Coefficient {
                $func(&self, rhs)
            }
        }

        impl $trait<Coefficient> for &Coefficient {
            type Output = Coefficient;
            fn $method(self, rhs: Coefficient) -> Coefficient {
                $func(self, &rhs)
            }
        }
    };
}

impl_coeff_binop!(Add, add, add_coeff);
impl_coeff_binop!(Sub, sub, sub_coeff);
impl_coeff_binop!(Mul, mul, mul_coeff);

impl Neg for &Coefficient {
    type Output = Coefficient;
    fn neg(self) -> Coefficient {
        match self {
            Coefficient::Num(n) => Coefficient::Num(-n),
            Coefficient::Sym(s) => Coefficient::Sym(s.neg()),
        }
    }
}

impl Neg for Coefficient {
    type Output = Coefficient;
    fn neg(self) -> Coefficient {
        -&self
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coefficient::Num(a), Coefficient::Num(b)) => a == b,
            (Coefficient::Sym(a), Coefficient::Sym(b)) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::zero()
    }
}

impl From<Number> for Coefficient {
    fn from(n: Number) -> Self {
        Coefficient::Num(n)
    }
}

impl From<Symbolic> for Coefficient {
    fn from(s: Symbolic) -> Self {
        Coefficient::from_symbolic(s)
    }
}

impl From<BigRational> for Coefficient {
    fn from(r: BigRational) -> Self {
        Coefficient::Num(Number::Exact(r))
    }
}

impl From<i32> for Coefficient {
    fn from(n: i32) -> Self {
        Coefficient::Num(Number::from(n))
    }
}

impl From<i64> for Coefficient {
    fn from(n: i64) -> Self {
        Coefficient::Num(Number::from(n))
    }
}

impl From<u32> for Coefficient {
    fn from(n: u32) -> Self {
        Coefficient::Num(Number::from(n))
    }
}

impl From<f64> for Coefficient {
    fn from(x: f64) -> Self {
        Coefficient::Num(Number::from(x))
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Num(n) => write!(f, "{}", n),
            Coefficient::Sym(s) if s.num_terms() > 1 => write!(f, "({})", s),
            Coefficient::Sym(s) => write!(f, "{}", s),
        }
    }
}

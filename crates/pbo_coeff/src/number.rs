//! Plain numeric coefficients.
//!
//! `Number` keeps values exact (`BigRational`) for as long as every operand is
//! exact. As soon as a floating value takes part in an operation the result is
//! promoted to `f64`, so round trips are exact over rationals and accurate to
//! rounding error otherwise.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::CoeffError;

/// Exact rational or floating-point value.
#[derive(Clone, Debug)]
pub enum Number {
    Exact(BigRational),
    Float(f64),
}

impl Number {
    pub fn zero() -> Self {
        Number::Exact(BigRational::zero())
    }

    pub fn one() -> Self {
        Number::Exact(BigRational::one())
    }

    pub fn from_integer(n: i64) -> Self {
        Number::Exact(BigRational::from_integer(BigInt::from(n)))
    }

    /// Exact `numer / denom`. Panics on a zero denominator, like `BigRational::new`.
    pub fn ratio(numer: i64, denom: i64) -> Self {
        Number::Exact(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_zero(),
            Number::Float(x) => *x == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_one(),
            Number::Float(x) => *x == 1.0,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_integer(),
            Number::Float(x) => x.is_finite() && x.fract() == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_negative(),
            Number::Float(x) => *x < 0.0,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Float(x) => *x,
        }
    }

    /// Integer value, if this number is integral.
    pub fn to_integer(&self) -> Option<BigInt> {
        match self {
            Number::Exact(r) if r.is_integer() => Some(r.to_integer()),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                BigRational::from_float(*x).map(|r| r.to_integer())
            }
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer().and_then(|n| n.to_i64())
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(r.abs()),
            Number::Float(x) => Number::Float(x.abs()),
        }
    }

    pub fn floor(&self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(r.floor()),
            Number::Float(x) => Number::Float(x.floor()),
        }
    }

    /// Round to `digits` decimal places, halves away from zero.
    pub fn round_to(&self, digits: u32) -> Number {
        match self {
            Number::Exact(r) => {
                let scale = BigRational::from_integer(BigInt::from(10u32).pow(digits));
                Number::Exact((r * &scale).round() / scale)
            }
            Number::Float(x) => {
                let scale = 10f64.powi(digits as i32);
                Number::Float((x * scale).round() / scale)
            }
        }
    }

    pub fn pow(&self, exp: u32) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(num_traits::pow(r.clone(), exp as usize)),
            Number::Float(x) => Number::Float(x.powi(exp as i32)),
        }
    }

    pub fn recip(&self) -> Result<Number, CoeffError> {
        Number::one().checked_div(self)
    }

    pub fn checked_div(&self, rhs: &Number) -> Result<Number, CoeffError> {
        if rhs.is_zero() {
            return Err(CoeffError::DivisionByZero);
        }
        Ok(combine(self, rhs, |a, b| a / b, |a, b| a / b))
    }

    /// Floor of the quotient, as Python's `//`.
    pub fn floor_div(&self, rhs: &Number) -> Result<Number, CoeffError> {
        Ok(self.checked_div(rhs)?.floor())
    }

    pub fn max_abs<'a, I>(values: I) -> Option<Number>
    where
        I: IntoIterator<Item = &'a Number>,
    {
        values.into_iter().map(Number::abs).fold(None, |acc, v| match acc {
            Some(best) if best >= v => Some(best),
            _ => Some(v),
        })
    }
}

fn combine(
    a: &Number,
    b: &Number,
    exact: impl FnOnce(&BigRational, &BigRational) -> BigRational,
    float: impl FnOnce(f64, f64) -> f64,
) -> Number {
    match (a, b) {
        (Number::Exact(x), Number::Exact(y)) => Number::Exact(exact(x, y)),
        _ => Number::Float(float(a.to_f64(), b.to_f64())),
    }
}

// =============================================================================
// Operators
// =============================================================================

macro_rules! impl_number_binop {
    ($trait:ident, $method:ident, $exact:expr, $float:expr) => {
        impl $trait<&Number> for &Number {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                combine(self, rhs, $exact, $float)
            }
        }

        impl $trait<Number> for Number {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                <&Number as $trait<&Number>>::$method(&self, &rhs)
            }
        }

        impl $trait<&Number> for Number {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                <&Number as $trait<&Number>>::$method(&self, rhs)
            }
        }

        impl $trait<Number> for &Number {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                <&Number as $trait<&Number>>::$method(self, &rhs)
            }
        }
    };
}

impl_number_binop!(Add, add, |a, b| a + b, |a, b| a + b);
impl_number_binop!(Sub, sub, |a, b| a - b, |a, b| a - b);
impl_number_binop!(Mul, mul, |a, b| a * b, |a, b| a * b);

impl Neg for &Number {
    type Output = Number;
    fn neg(self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(-r),
            Number::Float(x) => Number::Float(-x),
        }
    }
}

impl Neg for Number {
    type Output = Number;
    fn neg(self) -> Number {
        -&self
    }
}

// =============================================================================
// Comparison
// =============================================================================

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a == b,
            _ => self.to_f64() == other.to_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(a.cmp(b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl Default for Number {
    fn default() -> Self {
        Number::zero()
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from_integer(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::from_integer(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::from_integer(n as i64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::Exact(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::Exact(BigRational::from_integer(n))
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::Exact(r)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(r) => write!(f, "{}", r),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

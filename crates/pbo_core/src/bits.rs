//! Integer <-> bit-string conversions and value mapping between domains.
//!
//! Bit strings are most significant bit first. Spin strings follow the domain
//! identity `s = 1 - 2x`, so binary 0 is spin 1 and binary 1 is spin -1.
//!
//! Some libraries pair binary 0 with spin -1 instead (`s = 2x - 1`); spin
//! strings produced under that convention are the negation of these, e.g.
//! `decimal_to_spin(10, Some(7))` is `[1, 1, 1, -1, 1, -1, 1]` here and
//! `[-1, -1, -1, 1, -1, 1, -1]` there.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use pbo_coeff::Number;

use crate::domain::DomainKind;
use crate::error::{PbError, Result};
use crate::label::Variable;
use crate::polynomial::Assignment;

/// Binary digits of a non-negative integer, left-padded to `width` if given.
pub fn decimal_to_binary(value: impl Into<Number>, width: Option<usize>) -> Result<Vec<i8>> {
    let value = value.into();
    let n = value
        .to_integer()
        .filter(|n| !n.is_negative())
        .ok_or_else(|| PbError::MalformedInput(format!("{} is not a non-negative integer", value)))?;

    let two = BigInt::from(2);
    let mut digits = Vec::new();
    let mut rest = n;
    while !rest.is_zero() {
        let (q, r) = rest.div_rem(&two);
        digits.push(if r.is_zero() { 0 } else { 1 });
        rest = q;
    }
    if digits.is_empty() {
        digits.push(0);
    }

    if let Some(width) = width {
        if digits.len() > width {
            return Err(PbError::MalformedInput(format!(
                "{} needs {} bits, more than the width {}",
                value,
                digits.len(),
                width
            )));
        }
        digits.resize(width, 0);
    }
    digits.reverse();
    Ok(digits)
}

pub fn decimal_to_spin(value: impl Into<Number>, width: Option<usize>) -> Result<Vec<i8>> {
    decimal_to_binary(value, width)?
        .into_iter()
        .map(binary_to_spin)
        .collect()
}

pub fn binary_to_decimal(bits: &[i8]) -> Result<BigInt> {
    let mut n = BigInt::zero();
    for &b in bits {
        let bit = DomainKind::Binary
            .bit_of(b)
            .ok_or_else(|| PbError::MalformedInput(format!("{} is not a binary value", b)))?;
        n = n * 2 + bit;
    }
    Ok(n)
}

pub fn spin_to_decimal(spins: &[i8]) -> Result<BigInt> {
    let bits = spins
        .iter()
        .map(|&s| spin_to_binary(s))
        .collect::<Result<Vec<i8>>>()?;
    binary_to_decimal(&bits)
}

fn convert(value: i8, from: DomainKind, to: DomainKind) -> Result<i8> {
    from.convert_value(value, to)
        .ok_or_else(|| PbError::MalformedInput(format!("{} is not a {} value", value, from)))
}

pub fn binary_to_spin(value: i8) -> Result<i8> {
    convert(value, DomainKind::Binary, DomainKind::Spin)
}

pub fn spin_to_binary(value: i8) -> Result<i8> {
    convert(value, DomainKind::Spin, DomainKind::Binary)
}

/// `binary_to_spin` applied to every value of an assignment.
pub fn binary_to_spin_map<V: Variable>(solution: &Assignment<V>) -> Result<Assignment<V>> {
    solution
        .iter()
        .map(|(v, &x)| Ok((v.clone(), binary_to_spin(x)?)))
        .collect()
}

pub fn spin_to_binary_map<V: Variable>(solution: &Assignment<V>) -> Result<Assignment<V>> {
    solution
        .iter()
        .map(|(v, &s)| Ok((v.clone(), spin_to_binary(s)?)))
        .collect()
}

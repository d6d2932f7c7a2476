//! Boolean gates as PUBOs.
//!
//! Every operand is a 0/1-valued binary polynomial and every gate returns one,
//! so gates compose. With no operands, `and`, `or` and `xor` are the constant
//! 1 and their negations are 0.

use crate::label::Variable;
use crate::polynomial::Pubo;

/// The literal `v`
pub fn one<V: Variable>(v: impl Into<V>) -> Pubo<V> {
    Pubo::<V>::var(v)
}

/// `1 - p`
pub fn not<V: Variable>(p: &Pubo<V>) -> Pubo<V> {
    1 - p.clone()
}

/// Product of the operands.
pub fn and<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    ps.iter().fold(Pubo::<V>::constant(1), |acc, p| acc * p)
}

pub fn nand<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    not(&and(ps))
}

/// `1 - prod(1 - p_i)`
pub fn or<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    if ps.is_empty() {
        return Pubo::<V>::constant(1);
    }
    not(&ps.iter().fold(Pubo::<V>::constant(1), |acc, p| acc * not(p)))
}

pub fn nor<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    not(&or(ps))
}

/// Parity, folded pairwise as `a + b - 2ab`.
pub fn xor<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    let Some((first, rest)) = ps.split_first() else {
        return Pubo::<V>::constant(1);
    };
    rest.iter().fold(first.clone(), |acc, p| {
        let both = &acc * p;
        acc + p - both * 2
    })
}

pub fn xnor<V: Variable>(ps: &[Pubo<V>]) -> Pubo<V> {
    not(&xor(ps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::decimal_to_binary;
    use crate::label::Label;
    use crate::poly;
    use crate::polynomial::Assignment;

    fn vars(labels: &[&str]) -> Vec<Pubo> {
        labels.iter().map(|l| one(*l)).collect()
    }

    #[test]
    fn literals() {
        let x: Pubo = one("x");
        assert_eq!(x, poly! { ["x"] => 1 });
        assert_eq!(not(&x), poly! { [] => 1, ["x"] => -1 });
    }

    #[test]
    fn empty_operands() {
        assert_eq!(and::<Label>(&[]), Pubo::<Label>::constant(1));
        assert!(nand::<Label>(&[]).is_empty());
        assert_eq!(or::<Label>(&[]), Pubo::<Label>::constant(1));
        assert!(nor::<Label>(&[]).is_empty());
        assert_eq!(xor::<Label>(&[]), Pubo::<Label>::constant(1));
        assert!(xnor::<Label>(&[]).is_empty());
    }

    #[test]
    fn two_literal_forms() {
        let xy = vars(&["x", "y"]);
        assert_eq!(and(&xy), poly! { ["x", "y"] => 1 });
        assert_eq!(nand(&xy), poly! { [] => 1, ["x", "y"] => -1 });
        assert_eq!(or(&xy), poly! { ["x"] => 1, ["y"] => 1, ["x", "y"] => -1 });
        assert_eq!(nor(&xy), poly! { [] => 1, ["x"] => -1, ["y"] => -1, ["x", "y"] => 1 });
        assert_eq!(xor(&xy), poly! { ["x"] => 1, ["y"] => 1, ["x", "y"] => -2 });
        assert_eq!(xnor(&xy), poly! { [] => 1, ["x"] => -1, ["y"] => -1, ["x", "y"] => 2 });
    }

    #[test]
    fn nested_operands() {
        let xy: Pubo = poly! { ["x", "y"] => 1 };
        let a: Pubo = one("a");
        assert_eq!(and(&[xy.clone(), a.clone()]), poly! { ["x", "y", "a"] => 1 });
        assert_eq!(
            or(&[xy.clone(), a.clone()]),
            poly! { ["x", "y"] => 1, ["a"] => 1, ["x", "y", "a"] => -1 }
        );
        assert_eq!(
            xor(&[xy, a]),
            poly! { ["x", "y"] => 1, ["a"] => 1, ["x", "y", "a"] => -2 }
        );
    }

    #[test]
    fn truth_tables() {
        for n in 1..5usize {
            let ps: Vec<Pubo<usize>> = (0..n).map(one).collect();
            let gates = [and(&ps), nand(&ps), or(&ps), nor(&ps), xor(&ps), xnor(&ps)];
            for i in 0..(1u32 << n) {
                let bits = decimal_to_binary(i, Some(n)).unwrap();
                let sol: Assignment<usize> = bits.iter().copied().enumerate().collect();
                let ones = bits.iter().filter(|&&b| b == 1).count();
                let expected = [
                    ones == n,
                    ones != n,
                    ones > 0,
                    ones == 0,
                    ones % 2 == 1,
                    ones % 2 == 0,
                ];
                for (gate, want) in gates.iter().zip(expected) {
                    let v = gate.value_number(&sol).unwrap();
                    assert_eq!(v, pbo_coeff::Number::from(want as i32), "n={} i={}", n, i);
                }
            }
        }
    }
}

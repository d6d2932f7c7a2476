//! Dense matrix views of a QUBO over indices `0..n`.

use pbo_coeff::{Coefficient, Number};

use crate::error::{PbError, Result};
use crate::polynomial::Pubo;
use crate::quadratic::Qubo;

/// Upper-triangular matrix `Q` with `x^T Q x` equal to the QUBO, or its
/// symmetric form with off-diagonal couplings split in half. A QUBO with an
/// offset has no matrix form.
pub fn qubo_to_matrix(qubo: &Qubo<usize>, symmetric: bool) -> Result<Vec<Vec<Number>>> {
    let Some(max) = qubo.variables().into_iter().max() else {
        return Err(PbError::MalformedInput("QUBO has no variables".to_string()));
    };
    if !qubo.offset().is_zero() {
        return Err(PbError::MalformedInput(format!(
            "QUBO has a nonzero offset {}",
            qubo.offset()
        )));
    }

    let n = max + 1;
    let mut matrix = vec![vec![Number::zero(); n]; n];
    let half = Number::ratio(1, 2);
    for (term, c) in qubo.numeric_terms()? {
        match *term.vars() {
            [i] => matrix[i][i] = c,
            [i, j] if symmetric => {
                let v = &c * &half;
                matrix[i][j] = v.clone();
                matrix[j][i] = v;
            }
            [i, j] => matrix[i][j] = c,
            _ => {}
        }
    }
    Ok(matrix)
}

/// QUBO `x^T M x` of a square matrix; `M[i][j]` and `M[j][i]` accumulate.
pub fn matrix_to_qubo<T>(matrix: &[Vec<T>]) -> Result<Qubo<usize>>
where
    T: Clone + Into<Coefficient>,
{
    let n = matrix.len();
    if let Some(row) = matrix.iter().position(|r| r.len() != n) {
        return Err(PbError::MalformedInput(format!(
            "matrix is not square: row {} has {} entries, expected {}",
            row,
            matrix[row].len(),
            n
        )));
    }

    let mut p = Pubo::<usize>::new();
    for (i, row) in matrix.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            p.add_term([i, j], value.clone());
        }
    }
    Qubo::<usize>::try_from(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Qubo<usize> {
        let mut p = Pubo::<usize>::new();
        p.add_term([0usize, 0], -3);
        p.add_term([0usize, 1], 1);
        p.add_term([1usize, 1], 2);
        Qubo::<usize>::try_from(p).unwrap()
    }

    fn numbers(rows: &[&[f64]]) -> Vec<Vec<Number>> {
        rows.iter().map(|r| r.iter().map(|&x| Number::from(x)).collect()).collect()
    }

    #[test]
    fn upper_triangular() {
        let m = qubo_to_matrix(&sample(), false).unwrap();
        assert_eq!(m, numbers(&[&[-3.0, 1.0], &[0.0, 2.0]]));
    }

    #[test]
    fn symmetric() {
        let m = qubo_to_matrix(&sample(), true).unwrap();
        assert_eq!(m, numbers(&[&[-3.0, 0.5], &[0.5, 2.0]]));
    }

    #[test]
    fn empty_or_offset_is_rejected() {
        assert!(qubo_to_matrix(&Qubo::<usize>::new(), false).is_err());
        let mut p = Pubo::<usize>::new();
        p.add_constant(Coefficient::from(1));
        p.add_term([0usize], -1);
        let q = Qubo::<usize>::try_from(p).unwrap();
        assert!(qubo_to_matrix(&q, false).is_err());
    }

    #[test]
    fn matrix_couplings_accumulate() {
        let q = matrix_to_qubo(&[vec![-3, 1], vec![-1, 2]]).unwrap();
        let mut expected = Pubo::<usize>::new();
        expected.add_term([0usize], -3);
        expected.add_term([1usize], 2);
        assert_eq!(q.into_inner(), expected);
    }

    #[test]
    fn non_square_is_rejected() {
        assert!(matrix_to_qubo(&[vec![1, 2, 3], vec![1, 0, 1]]).is_err());
    }

    #[test]
    fn matrix_round_trip() {
        let q = sample();
        let m = qubo_to_matrix(&q, false).unwrap();
        assert_eq!(matrix_to_qubo(&m).unwrap(), q);
    }
}

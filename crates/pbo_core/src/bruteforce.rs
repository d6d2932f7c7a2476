//! Exhaustive minimization, used as a correctness oracle.
//!
//! Terms are compiled to bit masks once; assignment `i` sets variable `j` to
//! `values()[bit j of i]`, so enumeration order is the binary counting order
//! over the variable list. Binary terms fire when all their bits are set,
//! spin terms flip sign on odd parity.

use pbo_coeff::Number;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::domain::{Domain, DomainKind};
use crate::error::{PbError, Result};
use crate::label::Variable;
use crate::polynomial::{Assignment, HIsing, Polynomial, Pubo};
use crate::quadratic::{Ising, Qubo};

/// Largest variable count the enumerator accepts.
pub const MAX_BRUTEFORCE_VARIABLES: usize = 63;

struct Compiled {
    offset: Number,
    terms: Vec<(u64, Number)>,
}

impl Compiled {
    fn new<D: Domain, V: Variable>(p: &Polynomial<D, V>, vars: &[V]) -> Result<Self> {
        let positions: FxHashMap<&V, usize> = vars.iter().enumerate().map(|(i, v)| (v, i)).collect();
        let mut offset = Number::zero();
        let mut terms = Vec::with_capacity(p.num_terms());
        for (t, c) in p.numeric_terms()? {
            if t.is_empty() {
                offset = offset + c;
                continue;
            }
            let mut mask = 0u64;
            for v in t.iter() {
                let pos = positions.get(v).ok_or_else(|| {
                    PbError::MalformedInput(format!("variable {} is not enumerated", v))
                })?;
                mask |= 1u64 << *pos;
            }
            terms.push((mask, c));
        }
        Ok(Self { offset, terms })
    }

    fn eval(&self, kind: DomainKind, bits: u64) -> Number {
        let mut total = self.offset.clone();
        for (mask, c) in &self.terms {
            match kind {
                DomainKind::Binary => {
                    if bits & mask == *mask {
                        total = total + c;
                    }
                }
                DomainKind::Spin => {
                    if (bits & mask).count_ones() % 2 == 1 {
                        total = total - c;
                    } else {
                        total = total + c;
                    }
                }
            }
        }
        total
    }
}

/// Admission test applied to decoded assignments before they compete.
pub(crate) type Feasible<'a, V> = &'a dyn Fn(&Assignment<V>) -> bool;

fn decode<V: Variable>(vars: &[V], values: [i8; 2], bits: u64) -> Assignment<V> {
    vars.iter()
        .enumerate()
        .map(|(j, v)| (v.clone(), values[((bits >> j) & 1) as usize]))
        .collect()
}

/// Minimum value and minimizers over `vars`, in enumeration order, among the
/// assignments `feasible` admits (all of them when `None`). With
/// `all == false` only the first minimizer is kept. The value is `None` when
/// nothing is admitted.
pub(crate) fn minimize_where<D: Domain, V: Variable>(
    p: &Polynomial<D, V>,
    vars: &[V],
    all: bool,
    feasible: Option<Feasible<'_, V>>,
) -> Result<(Option<Number>, Vec<Assignment<V>>)> {
    let n = vars.len();
    if n > MAX_BRUTEFORCE_VARIABLES {
        return Err(PbError::MalformedInput(format!(
            "brute force supports at most {} variables, got {}",
            MAX_BRUTEFORCE_VARIABLES, n
        )));
    }
    let compiled = Compiled::new(p, vars)?;
    let values = D::KIND.values();

    let mut best: Option<Number> = None;
    let mut winners: Vec<u64> = Vec::new();
    let mut rejected = 0u64;
    for bits in 0u64..(1u64 << n) {
        let value = compiled.eval(D::KIND, bits);
        let tie = match &best {
            Some(b) if value > *b => continue,
            Some(b) if value == *b => {
                if !all {
                    continue;
                }
                true
            }
            _ => false,
        };
        // decode only the candidates that would change the result
        if let Some(admit) = feasible {
            if !admit(&decode(vars, values, bits)) {
                rejected += 1;
                continue;
            }
        }
        if !tie {
            best = Some(value);
            winners.clear();
        }
        winners.push(bits);
    }

    let solutions: Vec<Assignment<V>> = winners
        .into_iter()
        .map(|bits| decode(vars, values, bits))
        .collect();

    debug!(
        target: "bruteforce",
        variables = n,
        minimizers = solutions.len(),
        rejected,
        "enumeration finished"
    );
    Ok((best, solutions))
}

fn minimize<D: Domain, V: Variable>(
    p: &Polynomial<D, V>,
    vars: &[V],
    all: bool,
) -> Result<(Number, Vec<Assignment<V>>)> {
    let (best, solutions) = minimize_where(p, vars, all, None)?;
    Ok((best.unwrap_or_else(Number::zero), solutions))
}

impl<D: Domain, V: Variable> Polynomial<D, V> {
    /// One minimizing assignment over every mapped variable. Recorded
    /// ancillas are left out.
    pub fn solve_bruteforce(&self) -> Result<Assignment<V>> {
        let (_, mut sols) = minimize(self, self.index().labels(), false)?;
        Ok(self.without_ancillas(sols.pop().unwrap_or_default()))
    }

    /// Every minimizing assignment, in enumeration order, without ancillas.
    pub fn solve_bruteforce_all(&self) -> Result<Vec<Assignment<V>>> {
        let (_, sols) = minimize(self, self.index().labels(), true)?;
        Ok(sols.into_iter().map(|s| self.without_ancillas(s)).collect())
    }

    fn without_ancillas(&self, mut solution: Assignment<V>) -> Assignment<V> {
        if !self.ancillas().is_empty() {
            solution.retain(|v, _| !self.ancillas().contains(v));
        }
        solution
    }

    /// Optimal value together with one minimizer, over the occurring
    /// variables. Ancillas stay in the minimizer so that it can be handed to
    /// `convert_solution` of the polynomial this one was reduced from.
    pub fn minimum(&self) -> Result<(Number, Assignment<V>)> {
        let vars: Vec<V> = self.variables().into_iter().collect();
        let (value, mut sols) = minimize(self, &vars, false)?;
        Ok((value, sols.pop().unwrap_or_default()))
    }

    /// Translate a solution of one of this polynomial's canonical forms back
    /// to labels and to this polynomial's domain. `from` is the domain the
    /// raw values are in. Indices past the variable index belong to
    /// reduction ancillas and are dropped.
    pub fn convert_solution(&self, raw: &Assignment<usize>, from: DomainKind) -> Result<Assignment<V>> {
        let mut out = Assignment::new();
        for (&i, &value) in raw {
            let Some(label) = self.index().label(i) else {
                continue;
            };
            let converted = from.convert_value(value, D::KIND).ok_or_else(|| {
                PbError::MalformedInput(format!("value {} of index {} is not {}", value, i, from))
            })?;
            out.insert(label.clone(), converted);
        }
        Ok(out)
    }
}

pub fn solve_pubo_bruteforce<V: Variable>(pubo: &Pubo<V>) -> Result<(Number, Assignment<V>)> {
    pubo.minimum()
}

pub fn solve_hising_bruteforce<V: Variable>(hising: &HIsing<V>) -> Result<(Number, Assignment<V>)> {
    hising.minimum()
}

pub fn solve_qubo_bruteforce<V: Variable>(qubo: &Qubo<V>) -> Result<(Number, Assignment<V>)> {
    qubo.minimum()
}

pub fn solve_ising_bruteforce<V: Variable>(ising: &Ising<V>) -> Result<(Number, Assignment<V>)> {
    ising.minimum()
}

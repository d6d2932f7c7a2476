//! Canonical terms: sorted, duplicate-free products of variables.
//!
//! A raw product such as `x*y*x` is canonicalized per domain:
//! binary collapses repeats (`x*x = x`), spin cancels them in pairs
//! (`s*s = 1`). The empty term is the constant.

use smallvec::SmallVec;
use std::fmt;

use crate::label::Variable;

/// Inline capacity covers the degree-2 and degree-3 terms that dominate in practice.
pub type TermVars<V> = SmallVec<[V; 4]>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term<V>(TermVars<V>);

impl<V: Variable> Term<V> {
    /// The constant term
    pub fn empty() -> Self {
        Term(SmallVec::new())
    }

    /// Canonicalize with binary idempotency.
    pub fn binary<I: IntoIterator<Item = V>>(vars: I) -> Self {
        let mut v: TermVars<V> = vars.into_iter().collect();
        v.sort();
        v.dedup();
        Term(v)
    }

    /// Canonicalize with spin involution: keep a variable iff it occurs an odd
    /// number of times.
    pub fn spin<I: IntoIterator<Item = V>>(vars: I) -> Self {
        let mut v: TermVars<V> = vars.into_iter().collect();
        v.sort();
        let mut out: TermVars<V> = SmallVec::with_capacity(v.len());
        for var in v {
            if out.last() == Some(&var) {
                out.pop();
            } else {
                out.push(var);
            }
        }
        Term(out)
    }

    /// Build from variables already known to be sorted and distinct.
    pub(crate) fn from_sorted(vars: TermVars<V>) -> Self {
        debug_assert!(vars.windows(2).all(|w| w[0] < w[1]));
        Term(vars)
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn vars(&self) -> &[V] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.0.iter()
    }

    pub fn contains(&self, v: &V) -> bool {
        self.0.binary_search(v).is_ok()
    }

    /// Raw concatenation; the caller re-canonicalizes under its domain.
    pub fn concat(&self, other: &Self) -> TermVars<V> {
        self.0.iter().chain(other.0.iter()).cloned().collect()
    }

    /// Every sub-term, in bitmask order (bit `i` selects the `i`-th variable).
    pub fn subsets(&self) -> impl Iterator<Item = Term<V>> + '_ {
        let n = self.0.len();
        (0u64..(1u64 << n)).map(move |mask| {
            let vars = self
                .0
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, v)| v.clone())
                .collect();
            Term(vars)
        })
    }
}

impl<V: Variable> fmt::Display for Term<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_collapses_repeats() {
        let t = Term::binary([2usize, 0, 2, 1, 0]);
        assert_eq!(t.vars(), &[0, 1, 2]);
    }

    #[test]
    fn spin_cancels_pairs() {
        assert!(Term::spin([0usize, 0]).is_empty());
        assert_eq!(Term::spin([1usize, 0, 1, 1]).vars(), &[0, 1]);
    }

    #[test]
    fn order_does_not_matter() {
        assert_eq!(Term::binary(["b", "a"]), Term::binary(["a", "b"]));
    }

    #[test]
    fn subsets_cover_power_set() {
        let t = Term::binary([0usize, 1, 2]);
        let subs: Vec<_> = t.subsets().collect();
        assert_eq!(subs.len(), 8);
        assert!(subs[0].is_empty());
        assert_eq!(subs[7], t);
    }

    #[test]
    fn display() {
        assert_eq!(Term::binary([1usize, 0]).to_string(), "(0, 1)");
        assert_eq!(Term::<usize>::empty().to_string(), "()");
    }
}

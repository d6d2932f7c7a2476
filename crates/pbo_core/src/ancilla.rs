//! Ancilla provenance.
//!
//! Every synthetic variable introduced by degree reduction or by slack
//! encoding is recorded together with where it came from. Solution recovery
//! drops exactly the labels found here.

use pbo_coeff::Number;
use std::collections::BTreeMap;
use std::fmt;

use crate::label::Variable;

#[derive(Clone, Debug, PartialEq)]
pub enum AncillaOrigin<V> {
    /// Stands for the product of two variables (quadratization)
    Product(V, V),
    /// Slack bit of a constraint, contributing `weight` when set
    Slack { constraint: usize, weight: Number },
}

impl<V: Variable> fmt::Display for AncillaOrigin<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AncillaOrigin::Product(a, b) => write!(f, "{}*{}", a, b),
            AncillaOrigin::Slack { constraint, weight } => {
                write!(f, "slack of constraint {} (weight {})", constraint, weight)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct AncillaTable<V> {
    entries: BTreeMap<V, AncillaOrigin<V>>,
}

impl<V> Default for AncillaTable<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Variable> AncillaTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: V, origin: AncillaOrigin<V>) {
        self.entries.insert(label, origin);
    }

    pub fn get(&self, label: &V) -> Option<&AncillaOrigin<V>> {
        self.entries.get(label)
    }

    pub fn contains(&self, label: &V) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, &AncillaOrigin<V>)> {
        self.entries.iter()
    }

    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    /// Rename every label; entries whose label has no image are dropped.
    pub fn relabel<W: Variable, F>(&self, mut f: F) -> AncillaTable<W>
    where
        F: FnMut(&V) -> Option<W>,
    {
        let mut out = AncillaTable::new();
        for (label, origin) in &self.entries {
            let Some(new_label) = f(label) else { continue };
            let mapped = match origin {
                AncillaOrigin::Product(a, b) => match (f(a), f(b)) {
                    (Some(a), Some(b)) => AncillaOrigin::Product(a, b),
                    _ => continue,
                },
                AncillaOrigin::Slack { constraint, weight } => AncillaOrigin::Slack {
                    constraint: *constraint,
                    weight: weight.clone(),
                },
            };
            out.record(new_label, mapped);
        }
        out
    }
}

//! Variable label <-> dense index mapping.
//!
//! Labels get the next free index the first time a term mentions them. The
//! index survives cancellation of every term using a label, so indices stay
//! stable for the lifetime of a polynomial unless `set_mapping` replaces them.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::error::{PbError, Result};
use crate::label::Variable;

#[derive(Clone, Debug)]
pub struct VariableIndex<V> {
    labels: Vec<V>,
    map: FxHashMap<V, usize>,
}

impl<V: Variable> Default for VariableIndex<V> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            map: FxHashMap::default(),
        }
    }
}

impl<V: Variable> VariableIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get index for a label, inserting if new
    pub fn get_or_insert(&mut self, label: &V) -> usize {
        if let Some(&idx) = self.map.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.clone());
        self.map.insert(label.clone(), idx);
        idx
    }

    pub fn index_of(&self, label: &V) -> Option<usize> {
        self.map.get(label).copied()
    }

    pub fn label(&self, idx: usize) -> Option<&V> {
        self.labels.get(idx)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in index order
    pub fn labels(&self) -> &[V] {
        &self.labels
    }

    pub fn mapping(&self) -> BTreeMap<V, usize> {
        self.map.iter().map(|(k, &v)| (k.clone(), v)).collect()
    }

    pub fn reverse_mapping(&self) -> BTreeMap<usize, V> {
        self.labels.iter().cloned().enumerate().collect()
    }

    /// Merge labels of `other` that are not known yet, keeping existing indices.
    pub fn absorb(&mut self, other: &Self) {
        for label in &other.labels {
            self.get_or_insert(label);
        }
    }

    /// Build from an explicit bijection onto `[0, n)`.
    ///
    /// Fails unless the indices are exactly `0..n` with no repeats.
    pub fn from_bijection<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, usize)>,
    {
        let pairs: Vec<(V, usize)> = pairs.into_iter().collect();
        let n = pairs.len();
        let mut slots: Vec<Option<V>> = vec![None; n];
        for (label, idx) in pairs {
            let slot = slots.get_mut(idx).ok_or_else(|| {
                PbError::MalformedInput(format!("index {} out of range for {} variables", idx, n))
            })?;
            if slot.is_some() {
                return Err(PbError::MalformedInput(format!(
                    "index {} assigned twice in mapping",
                    idx
                )));
            }
            *slot = Some(label);
        }
        let mut index = Self::new();
        for label in slots.into_iter().flatten() {
            if index.index_of(&label).is_some() {
                return Err(PbError::MalformedInput(format!(
                    "label {} mapped twice",
                    label
                )));
            }
            index.get_or_insert(&label);
        }
        Ok(index)
    }
}

impl VariableIndex<usize> {
    /// `i <-> i` for `i` in `0..n`
    pub fn identity(n: usize) -> Self {
        let mut index = Self::new();
        for i in 0..n {
            index.get_or_insert(&i);
        }
        index
    }
}

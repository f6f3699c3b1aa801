//! PairEntry: the (key, value) unit stored in a dictionary's raw list.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A key and a value, serialized as `{ key, value }`.
///
/// Conversions to and from `(K, V)` are available through `From`, but the
/// type is kept distinct from a bare tuple so raw entries read differently
/// from the dictionary's visible pairs at call sites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> PairEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn key_mut(&mut self) -> &mut K {
        &mut self.key
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Borrow the key and mutably borrow the value at the same time.
    pub fn split_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub fn set_key(&mut self, key: K) {
        self.key = key;
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn into_tuple(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for PairEntry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> From<PairEntry<K, V>> for (K, V) {
    fn from(entry: PairEntry<K, V>) -> Self {
        entry.into_tuple()
    }
}
